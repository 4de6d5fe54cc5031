//! Private vehicle categories and per-vehicle emissions.

use super::clamp_distance;
use super::factors::{car_factor, motorcycle_factor};

/// Size class of a car or motorcycle.
///
/// Anything that is not one of the three named classes maps to [`VehicleSize::Average`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleSize {
    Small,
    Medium,
    Large,
    Average,
}

impl VehicleSize {
    /// Labels match exactly; `"Small"` is not `"small"`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "small" => VehicleSize::Small,
            "medium" => VehicleSize::Medium,
            "large" => VehicleSize::Large,
            _ => VehicleSize::Average,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelType {
    Diesel,
    Petrol,
    Hybrid,
    Phev,
    Bev,
    Other,
}

impl FuelType {
    /// Case-insensitive; unknown labels become [`FuelType::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "diesel" => FuelType::Diesel,
            "petrol" => FuelType::Petrol,
            "hybrid" => FuelType::Hybrid,
            "phev" => FuelType::Phev,
            "bev" => FuelType::Bev,
            _ => FuelType::Other,
        }
    }
}

/// One car or motorcycle as entered by the user. Motorcycles ignore `fuel`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleEntry {
    pub distance: f64,
    pub size: VehicleSize,
    pub fuel: FuelType,
}

impl VehicleEntry {
    pub fn car(distance: f64, size: VehicleSize, fuel: FuelType) -> Self {
        Self {
            distance,
            size,
            fuel,
        }
    }

    pub fn motorcycle(distance: f64, size: VehicleSize) -> Self {
        Self {
            distance,
            size,
            fuel: FuelType::Other,
        }
    }
}

/// Weekly car emissions in kg CO2e. Not rounded.
pub fn car_emission(distance: f64, size: VehicleSize, fuel: FuelType) -> f64 {
    clamp_distance(distance) * car_factor(size, fuel)
}

/// Weekly motorcycle emissions in kg CO2e. Not rounded.
pub fn motorcycle_emission(distance: f64, size: VehicleSize) -> f64 {
    clamp_distance(distance) * motorcycle_factor(size)
}
