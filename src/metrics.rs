use crate::types::Metric;

/// Distance and display similarity for one query/candidate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measure {
    pub distance: f64,
    pub similarity: f64,
}

pub trait DistanceMetric {
    fn measure(&self, a: &[f64], b: &[f64]) -> Measure;
}

#[derive(Clone, Copy)]
pub struct CosineMetric;

impl DistanceMetric for CosineMetric {
    fn measure(&self, a: &[f64], b: &[f64]) -> Measure {
        let similarity = cosine_similarity(a, b);
        Measure {
            distance: 1.0 - similarity,
            similarity,
        }
    }
}

#[derive(Clone, Copy)]
pub struct EuclideanMetric;

impl DistanceMetric for EuclideanMetric {
    fn measure(&self, a: &[f64], b: &[f64]) -> Measure {
        let distance = euclidean_distance(a, b);
        Measure {
            distance,
            similarity: 1.0 / (1.0 + distance),
        }
    }
}

impl DistanceMetric for Metric {
    fn measure(&self, a: &[f64], b: &[f64]) -> Measure {
        match self {
            Metric::Cosine => CosineMetric.measure(a, b),
            Metric::Euclidean => EuclideanMetric.measure(a, b),
        }
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    sum.sqrt()
}

/// Cosine of the angle between `a` and `b`; 0.0 when either has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}
