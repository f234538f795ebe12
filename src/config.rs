// Settings for a contact search, loadable from TOML.
//
// Every field has a default, so an empty document is a valid configuration:
//
//     index = "grid"          # or "kd_tree"
//     strategy = "stratified" # or "flat"
//     parallel = true
//
//     [bound]
//     policy = "margin"       # or "tight"
//     factor = 2.5

use crate::contacts::pair_finder::{SearchBound, SearchStrategy};
use crate::error::{ContactError, Result};
use crate::spatial::kd_tree::DEFAULT_LEAF_SIZE;
use crate::spatial::{IndexKind, IndexParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default cap on radius classes for the stratified strategy.
pub const DEFAULT_MAX_RADIUS_CLASSES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactSearchConfig {
    /// Index structure built over particle centers.
    pub index: IndexKind,
    /// One flat index, or one index per radius class.
    pub strategy: SearchStrategy,
    /// Spread per-particle queries over the rayon thread pool.
    pub parallel: bool,
    /// Grid cell edge. When unset, twice the largest radius.
    pub grid_cell_size: Option<f64>,
    /// Maximum points per k-d tree leaf.
    pub leaf_size: usize,
    /// Maximum number of radius classes for the stratified strategy.
    pub max_radius_classes: usize,
    /// How each particle's query radius is derived.
    pub bound: SearchBound,
}

impl Default for ContactSearchConfig {
    fn default() -> Self {
        Self {
            index: IndexKind::default(),
            strategy: SearchStrategy::default(),
            parallel: false,
            grid_cell_size: None,
            leaf_size: DEFAULT_LEAF_SIZE,
            max_radius_classes: DEFAULT_MAX_RADIUS_CLASSES,
            bound: SearchBound::default(),
        }
    }
}

impl ContactSearchConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded contact search config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ContactError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if let SearchBound::Margin { factor } = self.bound {
            if !factor.is_finite() || factor < 1.0 {
                return Err(ContactError::InvalidConfig(format!(
                    "margin factor must be finite and >= 1, got {factor}"
                )));
            }
        }
        if let Some(cell_size) = self.grid_cell_size {
            if !cell_size.is_finite() || cell_size <= 0.0 {
                return Err(ContactError::InvalidConfig(format!(
                    "grid cell size must be finite and > 0, got {cell_size}"
                )));
            }
        }
        if self.leaf_size == 0 {
            return Err(ContactError::InvalidConfig("leaf size must be at least 1".to_string()));
        }
        if self.max_radius_classes == 0 {
            return Err(ContactError::InvalidConfig(
                "max radius classes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn index_params(&self) -> IndexParams {
        IndexParams {
            kind: self.index,
            cell_size: self.grid_cell_size,
            leaf_size: self.leaf_size,
        }
    }
}
