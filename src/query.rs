//! User queries and their validation.
//!
//! Unlike catalog entries, a query is checked strictly: the three scalars
//! must lie in 0..=1, exactly eight descriptor flags are required and the
//! metric must be one of the known names. `k` is left signed because a
//! non-positive value is not an error, the ranker substitutes the default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::params::Params;
use crate::types::{Descriptor, Metric, MoodVector};
use crate::vectorize::{colors_to_normalized_hue, descriptor_flags, NEUTRAL};

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("{field} must be between 0 and 1, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("descriptors must be an array of 8 elements, got {0}")]
    DescriptorCount(usize),
    #[error("distance_metric must be \"euclidean\" or \"cosine\", got {0:?}")]
    UnknownMetric(String),
}

fn neutral() -> f64 {
    NEUTRAL
}

fn no_descriptors() -> Vec<f64> {
    vec![0.0; Descriptor::COUNT]
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default = "neutral")]
    pub color_hue: f64,
    #[serde(default = "neutral")]
    pub intensity: f64,
    #[serde(default = "neutral")]
    pub pacing: f64,
    #[serde(default = "no_descriptors")]
    pub descriptors: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<i64>,
    #[serde(default, alias = "distance_metric", skip_serializing_if = "Option::is_none")]
    pub distance_metric: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            color_hue: NEUTRAL,
            intensity: NEUTRAL,
            pacing: NEUTRAL,
            descriptors: no_descriptors(),
            k: None,
            distance_metric: None,
        }
    }
}

/// A query that passed validation and is ready to rank with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidQuery {
    pub vector: MoodVector,
    pub k: i64,
    pub metric: Metric,
}

fn unit_range(field: &'static str, value: f64) -> Result<f64, QueryError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(QueryError::OutOfRange { field, value })
    }
}

impl UserQuery {
    pub fn validate(&self) -> Result<ValidQuery, QueryError> {
        self.validate_with(&Params::default())
    }

    /// Validates the query, filling an absent `k` or metric from `params`.
    pub fn validate_with(&self, params: &Params) -> Result<ValidQuery, QueryError> {
        let hue = unit_range("colorHue", self.color_hue)?;
        let intensity = unit_range("intensity", self.intensity)?;
        let pacing = unit_range("pacing", self.pacing)?;
        let descriptors: [f64; Descriptor::COUNT] = self
            .descriptors
            .as_slice()
            .try_into()
            .map_err(|_| QueryError::DescriptorCount(self.descriptors.len()))?;
        let metric = match &self.distance_metric {
            Some(name) => name.parse::<Metric>()?,
            None => params.metric,
        };
        let k = self
            .k
            .unwrap_or_else(|| i64::try_from(params.k).unwrap_or(i64::MAX));
        Ok(ValidQuery {
            vector: MoodVector::new(hue, intensity, pacing, descriptors),
            k,
            metric,
        })
    }
}

/// Mood-board style input: picked colours and descriptors plus two sliders.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MoodBoard {
    #[serde(default)]
    pub colors: BTreeSet<String>,
    #[serde(default)]
    pub descriptors: BTreeSet<String>,
    #[serde(default = "neutral")]
    pub intensity: f64,
    #[serde(default = "neutral")]
    pub pacing: f64,
}

impl MoodBoard {
    pub fn to_query(&self, k: Option<i64>, metric: Option<Metric>) -> UserQuery {
        UserQuery {
            color_hue: colors_to_normalized_hue(&self.colors),
            intensity: self.intensity,
            pacing: self.pacing,
            descriptors: descriptor_flags(&self.descriptors).to_vec(),
            k,
            distance_metric: metric.map(|m| m.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_defaults() {
        let q: UserQuery = serde_json::from_value(json!({})).unwrap();
        let valid = q.validate().unwrap();
        assert_eq!(valid.k, 5);
        assert_eq!(valid.metric, Metric::Euclidean);
        assert_eq!(valid.vector.0, [0.5, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn accepts_both_metric_spellings() {
        let a: UserQuery = serde_json::from_value(json!({ "distanceMetric": "cosine" })).unwrap();
        let b: UserQuery = serde_json::from_value(json!({ "distance_metric": "cosine" })).unwrap();
        assert_eq!(a.validate().unwrap().metric, Metric::Cosine);
        assert_eq!(b.validate().unwrap().metric, Metric::Cosine);
    }

    #[test]
    fn rejects_out_of_range_scalars() {
        let q = UserQuery { pacing: 1.2, ..UserQuery::default() };
        assert_eq!(
            q.validate(),
            Err(QueryError::OutOfRange { field: "pacing", value: 1.2 })
        );
        let q = UserQuery { color_hue: f64::NAN, ..UserQuery::default() };
        assert!(matches!(
            q.validate(),
            Err(QueryError::OutOfRange { field: "colorHue", .. })
        ));
    }

    #[test]
    fn rejects_wrong_descriptor_count() {
        let q = UserQuery { descriptors: vec![1.0; 7], ..UserQuery::default() };
        assert_eq!(q.validate(), Err(QueryError::DescriptorCount(7)));
    }

    #[test]
    fn rejects_unknown_metric() {
        let q = UserQuery {
            distance_metric: Some("manhattan".into()),
            ..UserQuery::default()
        };
        let err = q.validate().unwrap_err();
        assert!(err.to_string().contains("euclidean"));
    }

    #[test]
    fn params_fill_missing_fields() {
        let params = Params { k: 3, metric: Metric::Cosine };
        let valid = UserQuery::default().validate_with(&params).unwrap();
        assert_eq!((valid.k, valid.metric), (3, Metric::Cosine));

        let q = UserQuery { k: Some(-2), ..UserQuery::default() };
        assert_eq!(q.validate_with(&params).unwrap().k, -2);
    }

    #[test]
    fn mood_board_to_query() {
        let board = MoodBoard {
            colors: ["#00ff00".to_string()].into(),
            descriptors: ["gritty".to_string(), "noir".to_string()].into(),
            intensity: 0.8,
            pacing: 0.2,
        };
        let q = board.to_query(Some(2), Some(Metric::Cosine));
        assert_eq!(q.color_hue, 120.0 / 360.0);
        assert_eq!(q.descriptors, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        let valid = q.validate().unwrap();
        assert_eq!(valid.metric, Metric::Cosine);
        assert_eq!(valid.k, 2);
    }
}
