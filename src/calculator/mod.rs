//! Weekly transport emissions and the "Earths needed" index.
//!
//! Everything here is a pure function of its inputs except
//! [`compute_total_footprint`], which reads inputs from and writes results to
//! a [`KeyValueStore`](crate::store::KeyValueStore). No input makes these
//! functions fail: missing or malformed values fall back to zero distance, the
//! average size row and the petrol column.

pub mod earths;
pub mod factors;
pub mod footprint;
pub mod transit;
pub mod vehicle;

pub use earths::earths_needed;
pub use footprint::{FootprintInputs, FootprintResult, compute_footprint, compute_total_footprint};
pub use transit::{TransitDistances, TransitMode, transit_emission};
pub use vehicle::{FuelType, VehicleEntry, VehicleSize, car_emission, motorcycle_emission};

/// Negative, NaN and infinite distances count as 0 km.
pub(crate) fn clamp_distance(distance: f64) -> f64 {
    if distance.is_finite() && distance > 0.0 {
        distance
    } else {
        0.0
    }
}
