use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::metrics::DistanceMetric;
use crate::params::{Params, DEFAULT_K};
use crate::query::{MoodBoard, QueryError, UserQuery};
use crate::types::{
    Descriptor, Metric, MoodMatch, MoodVector, MovieRecord, Recommendations, ScoredCandidate,
};
use crate::vectorize::{hex_to_hue_degrees, hue_distance, is_valid_mood_vector, vectorize};

/// Catalog tags that count as a match for each descriptor, indexed by
/// [`Descriptor::index`].
pub const RELATED_TAGS: [[&str; 3]; Descriptor::COUNT] = [
    ["cozy", "romantic", "light"],
    ["melancholic", "introspective", "drama"],
    ["upbeat", "feel-good", "music"],
    ["mysterious", "noir", "thriller"],
    ["gritty", "crime", "noir"],
    ["surreal", "art-house", "dreamlike"],
    ["romantic", "cozy", "drama"],
    ["dark comedy", "surreal", "offbeat"],
];

const TAG_WEIGHT: f64 = 1.5;
const HUE_WEIGHT: f64 = 1.2;
const HALF_TURN: f64 = 180.0;

/// Scores every candidate against `query` and returns the `k` closest,
/// nearest first. A non-positive `k` means the default of 5. Candidates at
/// equal distance keep their input order.
pub fn rank(
    query: &MoodVector,
    candidates: &[MovieRecord],
    k: i64,
    metric: Metric,
) -> Vec<ScoredCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let k = usize::try_from(k)
        .ok()
        .filter(|&k| k > 0)
        .unwrap_or(DEFAULT_K);

    let mut results: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|movie| {
            let m = metric.measure(query.as_slice(), vectorize(movie).as_slice());
            ScoredCandidate {
                movie: movie.clone(),
                distance: m.distance,
                similarity: m.similarity,
                score: m.similarity * 100.0,
            }
        })
        .collect();
    // sort_by_key is stable
    results.sort_by_key(|r| OrderedFloat(r.distance));
    results.truncate(k);
    results
}

/// Scores the whole catalog against a mood board without building vectors
/// and returns it best first; equal scores keep catalog order.
///
/// Each chosen descriptor expands to its [`RELATED_TAGS`] (an unknown one
/// stands for itself) and every movie tag in that set adds 1.5. Colours add
/// up to 1.2 by mean angular hue distance, and intensity/pacing add up to 1
/// each by closeness to `edge`/`tempo`. Absent fields contribute nothing.
pub fn rank_by_mood(movies: &[MovieRecord], board: &MoodBoard) -> Vec<MoodMatch> {
    let wanted: HashSet<&str> = board
        .descriptors
        .iter()
        .flat_map(|d| match d.parse::<Descriptor>() {
            Ok(known) => RELATED_TAGS[known.index()].to_vec(),
            Err(()) => vec![d.as_str()],
        })
        .collect();
    let hues: Vec<f64> = board
        .colors
        .iter()
        .filter_map(|c| hex_to_hue_degrees(c))
        .collect();

    let mut matches: Vec<MoodMatch> = movies
        .iter()
        .map(|movie| {
            let overlap = movie
                .tags
                .iter()
                .filter(|t| wanted.contains(t.as_str()))
                .count();
            let mut score = overlap as f64 * TAG_WEIGHT;
            if let Some(hue) = movie.hue().filter(|_| !hues.is_empty()) {
                let mean = hues.iter().map(|&h| hue_distance(h, hue)).sum::<f64>()
                    / hues.len() as f64;
                score += (1.0 - mean / HALF_TURN) * HUE_WEIGHT;
            }
            if let Some(edge) = movie.edge() {
                score += 1.0 - (edge - board.intensity).abs();
            }
            if let Some(tempo) = movie.tempo() {
                score += 1.0 - (tempo - board.pacing).abs();
            }
            MoodMatch {
                movie: movie.clone(),
                score,
            }
        })
        .collect();
    matches.sort_by_key(|m| Reverse(OrderedFloat(m.score)));
    matches
}

/// Read-only snapshot of the movie catalog. Cloning is cheap and shares
/// the records, so a reload can swap in a new snapshot without touching
/// rankings already in flight.
#[derive(Clone, Debug)]
pub struct Catalog {
    movies: Arc<[MovieRecord]>,
    params: Params,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self::with_params(movies, Params::default())
    }

    pub fn with_params(movies: Vec<MovieRecord>, params: Params) -> Self {
        Self {
            movies: movies.into(),
            params,
        }
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn params(&self) -> Params {
        self.params
    }

    /// Entries whose mood vector leaves the 0..1 range, e.g. a hue above 360.
    /// They are still ranked as they are.
    pub fn out_of_range(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies
            .iter()
            .filter(|m| !is_valid_mood_vector(vectorize(m).as_slice()))
    }

    pub fn rank_by_mood(&self, board: &MoodBoard) -> Vec<MoodMatch> {
        rank_by_mood(&self.movies, board)
    }

    pub fn recommend(&self, query: &UserQuery) -> Result<Recommendations, QueryError> {
        let valid = query.validate_with(&self.params)?;
        let recommendations = rank(&valid.vector, &self.movies, valid.k, valid.metric);
        debug!(
            metric = %valid.metric,
            requested = valid.k,
            returned = recommendations.len(),
            candidates = self.movies.len(),
            "ranked catalog"
        );
        Ok(Recommendations {
            success: true,
            k: recommendations.len(),
            recommendations,
            distance_metric: valid.metric,
        })
    }

    /// Runs several queries in parallel. Results follow the input order;
    /// the first invalid query fails the whole batch.
    pub fn recommend_batch(
        &self,
        queries: &[UserQuery],
    ) -> Result<Vec<Recommendations>, QueryError> {
        queries.par_iter().map(|q| self.recommend(q)).collect()
    }
}
