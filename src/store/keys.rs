//! Store keys read and written by the footprint calculation.

/// Number of car and motorcycle slots the client pages offer.
pub const MAX_VEHICLES: usize = 5;

pub const LRT_DISTANCE: &str = "lrt_distance";
pub const MRT_DISTANCE: &str = "mrt_distance";
pub const KTM_DISTANCE: &str = "ktm_distance";
pub const MONORAIL_DISTANCE: &str = "monorail_distance";
pub const BUS_DISTANCE: &str = "bus_distance";
pub const PUBLIC_TRANSPORT_DISTANCE: [&str; 2] =
    ["public_transport_distance_1", "public_transport_distance_2"];

pub const TOTAL_FOOTPRINT: &str = "total_footprint";
pub const EARTHS_NEEDED: &str = "earths_needed";
pub const CAR_FOOTPRINT: &str = "car_footprint";
pub const MOTORCYCLE_FOOTPRINT: &str = "motorcycle_footprint";
pub const PUBLIC_TRANSPORT_FOOTPRINT: &str = "public_transport_footprint";

// Slots are numbered from 1.
pub fn car_distance(slot: usize) -> String {
    format!("car_distance_{slot}")
}

pub fn car_size(slot: usize) -> String {
    format!("car_size_{slot}")
}

pub fn car_fuel(slot: usize) -> String {
    format!("car_fuel_{slot}")
}

pub fn motorcycle_distance(slot: usize) -> String {
    format!("motorcycle_distance_{slot}")
}

pub fn motorcycle_size(slot: usize) -> String {
    format!("motorcycle_size_{slot}")
}
