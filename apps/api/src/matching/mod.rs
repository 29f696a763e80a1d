// Matching engine: normalization, embedding, per-category matchers, aggregation.
// Handlers are the only part that knows about HTTP.

pub mod aggregate;
pub mod certifications;
pub mod embedding;
pub mod experience;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod skills;
