//! Lenient clean-up of model output before it is handed to `serde_json`.

/// Characters that may legally follow a backslash in a JSON string.
const VALID_ESCAPES: &[char] = &['"', '\\', '/', 'b', 'f', 'n', 'r', 't', 'u'];

/// Extracts the JSON object from raw model output and removes invalid escapes.
///
/// 1. drops markdown code fences, with or without a `json` tag, anywhere in the text
/// 2. keeps the span from the first `{` to the last `}` when there is one
/// 3. rewrites `\xa0`, `\u202f`, `\ ` as a space and `\•` as `*`
/// 4. drops any other backslash that does not start a valid JSON escape
pub fn clean_json_output(raw: &str) -> String {
    let unfenced = strip_fences(raw.trim());

    let block = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced.as_str(),
    };

    let replaced = block
        .replace("\\xa0", " ")
        .replace("\\u202f", " ")
        .replace("\\ ", " ")
        .replace("\\•", "*");

    drop_invalid_escapes(&replaced)
}

fn strip_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        if rest.get(..4).map_or(false, |tag| tag.eq_ignore_ascii_case("json")) {
            rest = &rest[4..];
        }
    }
    out.push_str(rest);
    out
}

/// Keeps valid escape pairs intact (so `\\` stays one escaped backslash) and
/// removes lone backslashes.
fn drop_invalid_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(next) if VALID_ESCAPES.contains(next) => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            _ => {}
        }
    }
    out
}
