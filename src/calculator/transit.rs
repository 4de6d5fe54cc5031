//! Public transport modes and their combined emissions.

use std::collections::BTreeMap;

use super::clamp_distance;
use super::factors::{OTHER_PUBLIC_TRANSPORT, transit_factor};

/// A public transport mode with its own emission factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitMode {
    /// Light rail
    Lrt,
    /// Metro
    Mrt,
    /// Commuter rail
    Ktm,
    Monorail,
    Bus,
}

impl TransitMode {
    pub const ALL: [TransitMode; 5] = [
        TransitMode::Lrt,
        TransitMode::Mrt,
        TransitMode::Ktm,
        TransitMode::Monorail,
        TransitMode::Bus,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "lrt" => Some(TransitMode::Lrt),
            "mrt" => Some(TransitMode::Mrt),
            "ktm" => Some(TransitMode::Ktm),
            "monorail" => Some(TransitMode::Monorail),
            "bus" => Some(TransitMode::Bus),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransitMode::Lrt => "lrt",
            TransitMode::Mrt => "mrt",
            TransitMode::Ktm => "ktm",
            TransitMode::Monorail => "monorail",
            TransitMode::Bus => "bus",
        }
    }
}

/// Weekly passenger distances (km) by transit mode label, plus up to two
/// generic "other public transport" distances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitDistances {
    pub modes: BTreeMap<String, f64>,
    pub other: [f64; 2],
}

impl TransitDistances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, label: &str, distance: f64) -> Self {
        self.modes.insert(label.to_string(), distance);
        self
    }

    pub fn with_other(mut self, first: f64, second: f64) -> Self {
        self.other = [first, second];
        self
    }
}

/// Sums `distance * factor` over every mode with a known factor; unknown
/// labels are skipped. Each generic distance counts only when strictly positive.
pub fn transit_emission(distances: &TransitDistances) -> f64 {
    // fold from +0.0: an empty f64 sum is -0.0 and would format as "-0.00"
    let named = distances
        .modes
        .iter()
        .filter_map(|(label, distance)| {
            TransitMode::from_label(label).map(|mode| clamp_distance(*distance) * transit_factor(mode))
        })
        .fold(0.0, |acc, kg| acc + kg);

    let other = distances
        .other
        .iter()
        .filter(|d| **d > 0.0)
        .map(|d| clamp_distance(*d) * OTHER_PUBLIC_TRANSPORT)
        .fold(0.0, |acc, kg| acc + kg);

    named + other
}
