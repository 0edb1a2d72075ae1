use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

use crate::params::Params;
use crate::ranker::Catalog;
use crate::types::MovieRecord;

/// Reads a catalog snapshot from a JSON array of movie records.
///
/// Only a file that is not a JSON array is an error. An element that is
/// not a movie object is skipped with a warning so the rest still loads.
pub fn load<P: AsRef<Path>>(path: P, params: Params) -> Result<Catalog> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let entries: Vec<Value> = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", path.display()))?;
    let movies = parse_entries(entries);
    let catalog = Catalog::with_params(movies, params);
    for movie in catalog.out_of_range() {
        warn!(id = %movie.id, "catalog entry has mood values outside 0..1");
    }
    info!(path = %path.display(), movies = catalog.len(), "loaded catalog");
    Ok(catalog)
}

fn parse_entries(entries: Vec<Value>) -> Vec<MovieRecord> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(movie) => Some(movie),
            Err(e) => {
                warn!(index = i, error = %e, "skipping catalog entry");
                None
            }
        })
        .collect()
}

/// Like [`load`], but a missing or unreadable file yields an empty catalog.
pub fn load_or_empty<P: AsRef<Path>>(path: P, params: Params) -> Catalog {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "catalog file not found, starting empty");
        return Catalog::with_params(Vec::new(), params);
    }
    match load(path, params) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "failed to load catalog, starting empty");
            Catalog::with_params(Vec::new(), params)
        }
    }
}
