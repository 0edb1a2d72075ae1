//! Turns catalog entries and mood-board inputs into [`MoodVector`]s.
//!
//! Catalog data is treated leniently: a missing or non-numeric `hue`,
//! `tempo` or `edge` falls back to the neutral value 0.5 and unknown tags
//! are ignored, so every entry in a catalog can be ranked.

use crate::types::{Descriptor, MoodVector, MovieRecord, MOOD_DIM};

/// Neutral value used for any absent scalar.
pub const NEUTRAL: f64 = 0.5;

const FULL_TURN: f64 = 360.0;

pub fn vectorize(movie: &MovieRecord) -> MoodVector {
    let hue = movie.hue().map(|h| h / FULL_TURN).unwrap_or(NEUTRAL);
    let intensity = movie.edge().unwrap_or(NEUTRAL);
    let pacing = movie.tempo().unwrap_or(NEUTRAL);
    MoodVector::new(hue, intensity, pacing, descriptor_flags(&movie.tags))
}

/// One-hot flags for the tags that belong to the descriptor vocabulary.
pub fn descriptor_flags<I, S>(tags: I) -> [f64; Descriptor::COUNT]
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = [0.0; Descriptor::COUNT];
    for tag in tags {
        if let Ok(d) = tag.as_ref().parse::<Descriptor>() {
            flags[d.index()] = 1.0;
        }
    }
    flags
}

/// Hue of a `#RRGGBB` colour scaled to 0..1. The leading `#` is optional and
/// hex digits are case-insensitive; anything unparseable maps to 0.5.
pub fn hex_to_normalized_hue(hex: &str) -> f64 {
    hex_to_hue_degrees(hex)
        .map(|h| h / FULL_TURN)
        .unwrap_or(NEUTRAL)
}

/// Hue of a `#RRGGBB` colour in degrees, `None` if it does not parse.
pub fn hex_to_hue_degrees(hex: &str) -> Option<f64> {
    parse_rgb(hex).map(rgb_hue)
}

/// Angular distance between two hues in degrees, going the short way
/// round the colour wheel.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(FULL_TURN - diff)
}

/// Mean hue of a set of colours, or 0.5 when the set is empty.
pub fn colors_to_normalized_hue<I, S>(colors: I) -> f64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let hues: Vec<f64> = colors
        .into_iter()
        .map(|c| hex_to_normalized_hue(c.as_ref()))
        .filter(|h| !h.is_nan())
        .collect();
    if hues.is_empty() {
        return NEUTRAL;
    }
    hues.iter().sum::<f64>() / hues.len() as f64
}

/// True for an 11-slot vector whose every slot is a finite value in 0..=1.
pub fn is_valid_mood_vector(vector: &[f64]) -> bool {
    vector.len() == MOOD_DIM
        && vector
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
}

fn parse_rgb(hex: &str) -> Option<[f64; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|c| f64::from(c) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// HSL hue in degrees; greys have hue 0.
fn rgb_hue([r, g, b]: [f64; 3]) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta == 0.0 {
        0.0
    } else if max == r {
        (60.0 * ((g - b) / delta) + FULL_TURN) % FULL_TURN
    } else if max == g {
        60.0 * ((b - r) / delta) + 120.0
    } else {
        60.0 * ((r - g) / delta) + 240.0
    }
}
