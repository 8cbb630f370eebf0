//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the pluck pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluckConfig {
    /// Geometry source configuration.
    pub source: SourceConfig,

    /// Spacing thresholds for text reconstruction.
    pub spacing: SpacingConfig,

    /// Line grouping configuration.
    pub reconstruct: ReconstructConfig,
}

/// Which geometry source backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Character-level geometry from the content streams.
    #[default]
    Geometry,
    /// Pre-tokenized plain text lines (no positional data).
    Plain,
}

/// Geometry source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Backend selection.
    pub kind: SourceKind,

    /// Apply regex spacing heuristics on the plain-text path.
    pub smart_spacing: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Geometry,
            smart_spacing: true,
        }
    }
}

/// Spacing thresholds, resolved once per document before reconstruction.
///
/// Ratio mode scales with the line's typical character spacing and is the
/// default; absolute mode is the legacy fixed-distance behavior. The two
/// modes are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpacingConfig {
    /// Thresholds as multiples of the median character spacing.
    Ratio {
        /// Center-distance ratio above which a missing space is inserted.
        add_space: f64,
        /// Center-distance ratio at or below which a literal space is dropped.
        min_space: f64,
    },
    /// Thresholds as fixed distances in page points.
    Absolute {
        add_space: f64,
        min_space: f64,
    },
}

impl Default for SpacingConfig {
    fn default() -> Self {
        // Empirically tested on problematic machine-generated PDFs.
        SpacingConfig::Ratio {
            add_space: 1.1,
            min_space: 1.3,
        }
    }
}

impl SpacingConfig {
    /// Legacy fixed-distance defaults (tuned for 12pt text).
    pub fn absolute_defaults() -> Self {
        SpacingConfig::Absolute {
            add_space: 5.3,
            min_space: 6.0,
        }
    }
}

/// Line grouping configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Vertical tolerance for same-line grouping, as a fraction of the
    /// character's font size.
    pub line_tolerance_ratio: f64,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            line_tolerance_ratio: 0.3,
        }
    }
}

impl PluckConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
