//! Mood-based movie recommendations by k-nearest-neighbour search.
//!
//! Every catalog entry is turned into an 11-slot [`MoodVector`]
//! (`[hue, intensity, pacing, 8 descriptor flags]`) and ranked against the
//! user's mood under either Euclidean distance or cosine similarity.

pub mod metrics;
pub mod params;
pub mod query;
pub mod ranker;
pub mod storage;
pub mod types;
pub mod vectorize;

pub use metrics::{cosine_similarity, euclidean_distance, DistanceMetric, Measure};
pub use params::{Params, DEFAULT_K};
pub use query::{MoodBoard, QueryError, UserQuery, ValidQuery};
pub use ranker::{rank, rank_by_mood, Catalog, RELATED_TAGS};
pub use types::{
    Descriptor, Metric, MoodMatch, MoodVector, MovieRecord, Recommendations, ScoredCandidate,
    MOOD_DIM,
};
pub use vectorize::vectorize;
