use crate::error::Result;
use crate::particles::ParticleSet;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Source of the particle snapshot for a contact search.
pub trait ParticleProvider {
    fn load(&self) -> Result<ParticleSet>;
}

impl ParticleProvider for ParticleSet {
    fn load(&self) -> Result<ParticleSet> {
        Ok(self.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParticleDocument {
    #[serde(default)]
    overlap_tolerance: Option<f64>,
    particles: Vec<ParticleRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParticleRecord {
    center: [f64; 3],
    radius: f64,
    #[serde(default)]
    max_overlap: Option<f64>,
}

/// Reads particles from a JSON document:
///
/// ```json
/// {
///   "overlap_tolerance": 0.01,
///   "particles": [
///     { "center": [0.0, 0.0, 0.0], "radius": 1.0, "max_overlap": 0.002 }
///   ]
/// }
/// ```
///
/// When `overlap_tolerance` is missing it is derived from the largest
/// `max_overlap` value.
#[derive(Debug, Clone)]
pub struct JsonParticleSource {
    path: PathBuf,
}

impl JsonParticleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses a document from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<ParticleSet> {
        let document: ParticleDocument = serde_json::from_reader(reader)?;
        document_to_set(document)
    }

    /// Parses a document held in memory.
    pub fn from_json_str(json: &str) -> Result<ParticleSet> {
        let document: ParticleDocument = serde_json::from_str(json)?;
        document_to_set(document)
    }
}

impl ParticleProvider for JsonParticleSource {
    fn load(&self) -> Result<ParticleSet> {
        let file = File::open(&self.path)?;
        let set = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {} particles from {} (tolerance {})",
            set.len(),
            self.path.display(),
            set.overlap_tolerance()
        );
        Ok(set)
    }
}

fn document_to_set(document: ParticleDocument) -> Result<ParticleSet> {
    let tolerance = match document.overlap_tolerance {
        Some(tolerance) => tolerance,
        None => ParticleSet::tolerance_from_max_overlap(
            document.particles.iter().filter_map(|p| p.max_overlap),
        ),
    };
    let centers: Vec<[f64; 3]> = document.particles.iter().map(|p| p.center).collect();
    let radii: Vec<f64> = document.particles.iter().map(|p| p.radius).collect();
    ParticleSet::from_arrays(&centers, &radii, tolerance)
}
