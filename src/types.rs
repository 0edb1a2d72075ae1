use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::query::QueryError;

/// Slots 0..3 hold hue, intensity and pacing; the rest are descriptor flags.
pub const SCALAR_SLOTS: usize = 3;
pub const MOOD_DIM: usize = SCALAR_SLOTS + Descriptor::COUNT;

/// Fixed mood vocabulary. Declaration order is the vector slot order.
#[repr(u8)]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Descriptor {
    #[serde(rename = "cozy")]
    Cozy = 0,
    #[serde(rename = "melancholic")]
    Melancholic = 1,
    #[serde(rename = "upbeat")]
    Upbeat = 2,
    #[serde(rename = "mysterious")]
    Mysterious = 3,
    #[serde(rename = "gritty")]
    Gritty = 4,
    #[serde(rename = "surreal")]
    Surreal = 5,
    #[serde(rename = "romantic")]
    Romantic = 6,
    #[serde(rename = "dark comedy")]
    DarkComedy = 7,
}

impl Descriptor {
    pub const COUNT: usize = 8;

    pub const ALL: [Descriptor; Descriptor::COUNT] = [
        Descriptor::Cozy,
        Descriptor::Melancholic,
        Descriptor::Upbeat,
        Descriptor::Mysterious,
        Descriptor::Gritty,
        Descriptor::Surreal,
        Descriptor::Romantic,
        Descriptor::DarkComedy,
    ];

    /// Position within the descriptor block (0..8).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Position within the full mood vector (3..11).
    pub fn slot(self) -> usize {
        SCALAR_SLOTS + self.index()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Descriptor::Cozy => "cozy",
            Descriptor::Melancholic => "melancholic",
            Descriptor::Upbeat => "upbeat",
            Descriptor::Mysterious => "mysterious",
            Descriptor::Gritty => "gritty",
            Descriptor::Surreal => "surreal",
            Descriptor::Romantic => "romantic",
            Descriptor::DarkComedy => "dark comedy",
        }
    }
}

impl FromStr for Descriptor {
    type Err = ();

    /// Exact, case-sensitive match against the vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Descriptor::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Euclidean = 1,
    Cosine = 2,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Cosine => "cosine",
        }
    }
}

impl FromStr for Metric {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euclidean" => Ok(Metric::Euclidean),
            "cosine" => Ok(Metric::Cosine),
            other => Err(QueryError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An 11-slot mood vector: `[hue, intensity, pacing, cozy, ..., dark comedy]`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct MoodVector(pub [f64; MOOD_DIM]);

impl MoodVector {
    pub fn new(hue: f64, intensity: f64, pacing: f64, descriptors: [f64; Descriptor::COUNT]) -> Self {
        let mut slots = [0.0; MOOD_DIM];
        slots[0] = hue;
        slots[1] = intensity;
        slots[2] = pacing;
        slots[SCALAR_SLOTS..].copy_from_slice(&descriptors);
        Self(slots)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn hue(&self) -> f64 {
        self.0[0]
    }

    pub fn intensity(&self) -> f64 {
        self.0[1]
    }

    pub fn pacing(&self) -> f64 {
        self.0[2]
    }

    pub fn descriptors(&self) -> &[f64] {
        &self.0[SCALAR_SLOTS..]
    }
}

/// A catalog entry. The numeric mood fields are kept as raw JSON so that a
/// malformed entry still loads and is echoed back untouched in results.
/// Text fields and tags are read leniently for the same reason.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MovieRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub poster: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Strings pass through, numbers and booleans are rendered as text and
/// anything else (null, arrays, objects) becomes empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Keeps the string entries of a tag array; a non-array is no tags.
fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn finite(value: &Option<Value>) -> Option<f64> {
    value.as_ref()?.as_f64().filter(|v| v.is_finite())
}

impl MovieRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hue(mut self, hue: f64) -> Self {
        self.hue = Some(Value::from(hue));
        self
    }

    pub fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = Some(Value::from(tempo));
        self
    }

    pub fn with_edge(mut self, edge: f64) -> Self {
        self.edge = Some(Value::from(edge));
        self
    }

    /// Hue in degrees, if present and a finite number.
    pub fn hue(&self) -> Option<f64> {
        finite(&self.hue)
    }

    pub fn tempo(&self) -> Option<f64> {
        finite(&self.tempo)
    }

    pub fn edge(&self) -> Option<f64> {
        finite(&self.edge)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub movie: MovieRecord,
    pub distance: f64,
    pub similarity: f64,
    pub score: f64,
}

/// A catalog entry with its mood-board heuristic score (higher is better).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MoodMatch {
    #[serde(flatten)]
    pub movie: MovieRecord,
    pub score: f64,
}

/// Response envelope handed back to the serving layer.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Recommendations {
    pub success: bool,
    pub recommendations: Vec<ScoredCandidate>,
    /// Number of results actually returned.
    pub k: usize,
    pub distance_metric: Metric,
}
