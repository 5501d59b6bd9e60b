use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point2D;

/// Named equipment location extracted from the drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub position: Point2D,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Equipment {
    pub fn new(name: impl Into<String>, position: Point2D) -> Self {
        Self {
            name: name.into(),
            position,
            layer: String::new(),
            attributes: HashMap::new(),
        }
    }
}

/// Read-only collection of equipment records for one run.
#[derive(Debug, Clone, Default)]
pub struct EquipmentIndex {
    records: Vec<Equipment>,
}

impl EquipmentIndex {
    pub fn new(records: Vec<Equipment>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Equipment] {
        &self.records
    }

    /// Nearest equipment to `point` within `max_radius` (inclusive).
    ///
    /// Records are scanned in the order supplied; on equal distance the
    /// earlier record wins.
    pub fn find_nearest_equipment(
        &self,
        point: &Point2D,
        max_radius: f64,
    ) -> Option<(&Equipment, f64)> {
        let mut best: Option<(&Equipment, f64)> = None;
        for record in &self.records {
            if point.outside_box(&record.position, max_radius) {
                continue;
            }
            let distance = point.distance_to(&record.position);
            if distance > max_radius {
                continue;
            }
            if best.map_or(true, |(_, current)| distance < current) {
                best = Some((record, distance));
            }
        }

        if best.is_none() {
            debug!(?point, max_radius, "no equipment within radius");
        }
        best
    }

    /// Number of records per equipment name, ordered by name.
    pub fn inventory(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.name.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<Equipment> for EquipmentIndex {
    fn from_iter<I: IntoIterator<Item = Equipment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
