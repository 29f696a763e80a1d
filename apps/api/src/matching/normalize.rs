use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Canonicalizes a skill or certification name before it is embedded.
///
/// Lower-cases and decomposes (NFKD), then drops the combining marks so
/// `é` folds to `e` inside the word. Everything else outside `[a-z0-9.+]`
/// becomes a space and whitespace runs collapse.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mapped: String = lowered
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if is_kept(c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '+' || c.is_whitespace()
}
