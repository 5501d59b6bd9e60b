//! Cable product catalog and the rule engine that picks a product and length
//! for a routed distance.

use serde::{Deserialize, Serialize};

use crate::config::{ReportConfig, RunConfig};
use crate::error::{Error, Result};

/// Group name assigned to equipment that belongs to no configured group.
pub const UNKNOWN_GROUP: &str = "unknown";

/// Static lookup row matched by exact `(origin_group, destination_group)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableRule {
    pub origin_group: String,
    pub destination_group: String,
    pub catalog_id: String,
}

/// Purchasable cable family with its stocked lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableProduct {
    pub technical_name: String,
    /// Stocked lengths, normalised to ascending order on load.
    pub available_lengths: Vec<f64>,
    pub minimum_reserve: f64,
}

impl CableProduct {
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        if self.technical_name.trim().is_empty() {
            return Err("technical_name must not be empty".to_string());
        }
        if self.available_lengths.is_empty() {
            return Err("available_lengths must not be empty".to_string());
        }
        if self
            .available_lengths
            .iter()
            .any(|length| !length.is_finite() || *length <= 0.0)
        {
            return Err("available_lengths must be finite positive numbers".to_string());
        }
        if !self.minimum_reserve.is_finite() || self.minimum_reserve < 0.0 {
            return Err("minimum_reserve must be a finite non-negative number".to_string());
        }
        Ok(())
    }

    /// Pick the shortest stocked length leaving at least `minimum_reserve`
    /// over `distance`, or the longest one when none does.
    ///
    /// Returns `(length, reserve)`; the reserve may be negative. `None` when
    /// no lengths are stocked. The order of `available_lengths` is not relied
    /// on.
    pub fn select_length(&self, distance: f64) -> Option<(f64, f64)> {
        let lengths = self.available_lengths.iter().copied();
        let chosen = lengths
            .clone()
            .filter(|length| length - distance >= self.minimum_reserve)
            .min_by(|a, b| a.total_cmp(b))
            .or_else(|| lengths.max_by(|a, b| a.total_cmp(b)))?;
        Some((chosen, chosen - distance))
    }
}

/// How the selected length compares with the product's minimum reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveStatus {
    Sufficient,
    BelowMinimum,
    /// The longest stocked cable is shorter than the route.
    Insufficient,
}

impl ReserveStatus {
    /// Status column value used in reports and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            ReserveStatus::Sufficient => "OK",
            ReserveStatus::BelowMinimum => "LOW_RESERVE",
            ReserveStatus::Insufficient => "INSUFFICIENT",
        }
    }
}

/// Outcome of the selection rule for one routed segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CableSelection {
    pub catalog_id: String,
    pub technical_name: String,
    pub length: f64,
    pub reserve: f64,
    pub origin_group: String,
    pub destination_group: String,
    pub status: ReserveStatus,
}

impl CableSelection {
    /// Annotation text for the drawing label.
    pub fn label(&self, distance: f64) -> String {
        format!(
            "{} {}M | {:.1}m | Res: {:.1}m",
            self.technical_name.to_uppercase(),
            self.length,
            distance,
            self.reserve
        )
    }

    /// Drawing layer the segment should be moved to.
    pub fn target_layer(&self, report: &ReportConfig) -> String {
        report
            .cable_layer_format
            .replace("{type}", &self.technical_name.to_uppercase())
            .replace("{length}", &self.length.to_string())
    }
}

/// Rule engine classifying endpoints and choosing a catalog product.
#[derive(Debug, Clone, Copy)]
pub struct CableCatalogSelector<'a> {
    config: &'a RunConfig,
}

impl<'a> CableCatalogSelector<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// First configured group listing `equipment_name`, or [`UNKNOWN_GROUP`].
    pub fn classify(&self, equipment_name: &str) -> &'a str {
        self.config
            .groups
            .iter()
            .find(|group| group.contains(equipment_name))
            .map(|group| group.name.as_str())
            .unwrap_or(UNKNOWN_GROUP)
    }

    /// Catalog id for a pair of groups, falling back to the configured default.
    pub fn catalog_id_for(&self, origin_group: &str, destination_group: &str) -> &'a str {
        self.config
            .rules
            .iter()
            .find(|rule| {
                rule.origin_group == origin_group && rule.destination_group == destination_group
            })
            .map(|rule| rule.catalog_id.as_str())
            .unwrap_or(self.config.default_catalog_id.as_str())
    }

    /// Catalog lookup; a missing id is a configuration defect.
    pub fn product(&self, catalog_id: &str) -> Result<&'a CableProduct> {
        self.config
            .catalog
            .get(catalog_id)
            .ok_or_else(|| Error::MissingCableProduct {
                catalog_id: catalog_id.to_string(),
            })
    }

    /// Select product, length and reserve for a routed distance.
    pub fn select(
        &self,
        total_distance: f64,
        origin_name: &str,
        destination_name: &str,
    ) -> Result<CableSelection> {
        let origin_group = self.classify(origin_name);
        let destination_group = self.classify(destination_name);
        let catalog_id = self.catalog_id_for(origin_group, destination_group);
        let product = self.product(catalog_id)?;

        let (length, reserve) =
            product
                .select_length(total_distance)
                .ok_or_else(|| Error::ConfigValidation {
                    message: format!("catalog.{catalog_id}: available_lengths must not be empty"),
                })?;
        let status = if reserve >= product.minimum_reserve {
            ReserveStatus::Sufficient
        } else if reserve >= 0.0 {
            ReserveStatus::BelowMinimum
        } else {
            ReserveStatus::Insufficient
        };

        Ok(CableSelection {
            catalog_id: catalog_id.to_string(),
            technical_name: product.technical_name.clone(),
            length,
            reserve,
            origin_group: origin_group.to_string(),
            destination_group: destination_group.to_string(),
            status,
        })
    }
}
