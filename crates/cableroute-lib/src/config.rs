//! Typed run configuration.
//!
//! A [`RunConfig`] is loaded once per run from JSON, validated, and then
//! passed by reference to every component that needs it.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{CableProduct, CableRule};
use crate::error::{Error, Result};

/// Default filename for the configuration inside the platform config dir.
const CONFIG_FILENAME: &str = "config.json";

/// Catalog id used when no topology rule matches and none is configured.
pub const DEFAULT_CATALOG_ID: &str = "distribution_std";

/// Default layer naming pattern for assigned cables.
pub const DEFAULT_LAYER_FORMAT: &str = "CABLE PRECONECT {type} SM ({length}M)";

/// Radii and snap step, all in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Quantization step used to merge network endpoints into one node.
    pub snap_tolerance: f64,
    /// Maximum distance from a segment endpoint to its equipment.
    pub equipment_snap_radius: f64,
    /// Maximum distance from an equipment to its network access node.
    pub network_access_radius: f64,
    /// Access distances below this are treated as zero.
    pub ignore_access_below: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            snap_tolerance: 0.1,
            equipment_snap_radius: 5.0,
            network_access_radius: 20.0,
            ignore_access_below: 1.0,
        }
    }
}

impl Tolerances {
    fn validate(&self) -> Result<()> {
        let fields = [
            (self.snap_tolerance, "snap_tolerance"),
            (self.equipment_snap_radius, "equipment_snap_radius"),
            (self.network_access_radius, "network_access_radius"),
            (self.ignore_access_below, "ignore_access_below"),
        ];

        for (value, field) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ConfigValidation {
                    message: format!("tolerances.{field} must be a finite positive number"),
                });
            }
        }
        Ok(())
    }
}

/// Named set of equipment block names sharing a semantic role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentGroup {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl EquipmentGroup {
    pub fn new(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Case-insensitive exact membership test.
    pub fn contains(&self, equipment_name: &str) -> bool {
        let wanted = equipment_name.to_uppercase();
        self.members
            .iter()
            .any(|member| member.to_uppercase() == wanted)
    }
}

/// Report and annotation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Target layer pattern; `{type}` and `{length}` are substituted.
    pub cable_layer_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            cable_layer_format: DEFAULT_LAYER_FORMAT.to_string(),
        }
    }
}

fn default_catalog_id() -> String {
    DEFAULT_CATALOG_ID.to_string()
}

/// Complete configuration for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub tolerances: Tolerances,
    #[serde(default)]
    pub groups: Vec<EquipmentGroup>,
    #[serde(default)]
    pub rules: Vec<CableRule>,
    #[serde(default = "default_catalog_id")]
    pub default_catalog_id: String,
    #[serde(default)]
    pub catalog: std::collections::BTreeMap<String, CableProduct>,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            groups: Vec::new(),
            rules: Vec::new(),
            default_catalog_id: default_catalog_id(),
            catalog: Default::default(),
            report: ReportConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading run configuration");
        let file = fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load and validate a configuration from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut config: RunConfig = serde_json::from_reader(reader)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_reader(json.as_bytes())
    }

    /// Sort every product's lengths ascending.
    pub fn normalize(&mut self) {
        for product in self.catalog.values_mut() {
            product
                .available_lengths
                .sort_by(|a, b| a.total_cmp(b));
        }
    }

    /// Structural validation. Missing catalog ids referenced by rules are not
    /// checked here; they surface as [`Error::MissingCableProduct`] when a
    /// segment actually needs them.
    pub fn validate(&self) -> Result<()> {
        self.tolerances.validate()?;

        if self.default_catalog_id.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "default_catalog_id must not be empty".to_string(),
            });
        }

        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "group name must not be empty".to_string(),
                });
            }
        }

        for (id, product) in &self.catalog {
            product.validate().map_err(|message| Error::ConfigValidation {
                message: format!("catalog.{id}: {message}"),
            })?;
        }

        Ok(())
    }
}

/// Resolve the default configuration location using platform-specific project directories.
pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "cableroute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.config_dir().join(CONFIG_FILENAME))
}
