use async_trait::async_trait;

use super::{EmbeddingError, EmbeddingProvider};

pub const HASHED_EMBEDDING_DIM: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Local feature-hashing embedder.
///
/// Each text contributes its whole-word tokens and its space-padded character
/// trigrams, hashed (FNV-1a) into a fixed number of buckets, then the vector is
/// L2-normalized. Same text, same vector, on every platform and every run.
/// Lexical rather than semantic, but strings sharing most of their spelling
/// land close together.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self {
            dimension: HASHED_EMBEDDING_DIM,
        }
    }
}

impl HashedEmbedder {
    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in text.split_whitespace() {
            vector[self.bucket(b"w:", token.as_bytes())] += 1.0;
        }

        let padded: Vec<char> = format!(" {} ", text.trim()).chars().collect();
        if padded.len() > 2 {
            for window in padded.windows(3) {
                let gram: String = window.iter().collect();
                vector[self.bucket(b"g:", gram.as_bytes())] += 1.0;
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }

    fn bucket(&self, prefix: &[u8], feature: &[u8]) -> usize {
        (fnv1a(prefix.iter().chain(feature)) % self.dimension as u64) as usize
    }
}

fn fnv1a<'a>(bytes: impl IntoIterator<Item = &'a u8>) -> u64 {
    bytes.into_iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingProvider for HashedEmbedder {
    fn name(&self) -> &'static str {
        "hashed"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn semantic(&self) -> bool {
        false
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
