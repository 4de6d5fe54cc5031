//! Emission factor tables in kg CO2e per km (per passenger-km for transit).

use super::transit::TransitMode;
use super::vehicle::{FuelType, VehicleSize};

/// Factors for one car size row, indexed by fuel type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarFactorRow {
    pub diesel: f64,
    pub petrol: f64,
    pub hybrid: f64,
    pub phev: f64,
    pub bev: f64,
}

impl CarFactorRow {
    /// Selects the column for `fuel`. Unrecognised fuel uses the row's petrol factor.
    pub fn for_fuel(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Diesel => self.diesel,
            FuelType::Petrol => self.petrol,
            FuelType::Hybrid => self.hybrid,
            FuelType::Phev => self.phev,
            FuelType::Bev => self.bev,
            FuelType::Other => self.petrol,
        }
    }
}

pub const SMALL_CAR: CarFactorRow = CarFactorRow {
    diesel: 0.14340,
    petrol: 0.14308,
    hybrid: 0.11413,
    phev: 0.03008,
    bev: 0.00000,
};

pub const MEDIUM_CAR: CarFactorRow = CarFactorRow {
    diesel: 0.17174,
    petrol: 0.17474,
    hybrid: 0.11724,
    phev: 0.07789,
    bev: 0.00000,
};

pub const LARGE_CAR: CarFactorRow = CarFactorRow {
    diesel: 0.21007,
    petrol: 0.26828,
    hybrid: 0.15650,
    phev: 0.10033,
    bev: 0.00000,
};

pub const AVERAGE_CAR: CarFactorRow = CarFactorRow {
    diesel: 0.17304,
    petrol: 0.16272,
    hybrid: 0.12825,
    phev: 0.09167,
    bev: 0.00000,
};

/// Average factor applied to the two generic "other public transport" distances.
pub const OTHER_PUBLIC_TRANSPORT: f64 = 0.12597;

/// Two-level lookup: size picks the row (unknown size uses the average row),
/// then fuel picks the column (unknown fuel uses petrol).
pub fn car_factor(size: VehicleSize, fuel: FuelType) -> f64 {
    let row = match size {
        VehicleSize::Small => &SMALL_CAR,
        VehicleSize::Medium => &MEDIUM_CAR,
        VehicleSize::Large => &LARGE_CAR,
        VehicleSize::Average => &AVERAGE_CAR,
    };
    row.for_fuel(fuel)
}

pub fn motorcycle_factor(size: VehicleSize) -> f64 {
    match size {
        VehicleSize::Small => 0.08319,  // up to 125cc
        VehicleSize::Medium => 0.10107, // 125cc to 500cc
        VehicleSize::Large => 0.13252,  // over 500cc
        VehicleSize::Average => 0.11367,
    }
}

pub fn transit_factor(mode: TransitMode) -> f64 {
    match mode {
        TransitMode::Lrt => 0.10449,
        TransitMode::Mrt => 0.12694,
        TransitMode::Ktm => 0.18034,
        TransitMode::Monorail => 0.09211,
        TransitMode::Bus => 0.10385,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_factor_is_non_negative() {
        let sizes = [
            VehicleSize::Small,
            VehicleSize::Medium,
            VehicleSize::Large,
            VehicleSize::Average,
        ];
        let fuels = [
            FuelType::Diesel,
            FuelType::Petrol,
            FuelType::Hybrid,
            FuelType::Phev,
            FuelType::Bev,
            FuelType::Other,
        ];
        for size in sizes {
            assert!(motorcycle_factor(size) >= 0.0);
            for fuel in fuels {
                assert!(car_factor(size, fuel) >= 0.0);
            }
        }
        for mode in TransitMode::ALL {
            assert!(transit_factor(mode) >= 0.0);
        }
    }

    #[test]
    fn test_unknown_fuel_falls_back_to_row_petrol() {
        assert_eq!(car_factor(VehicleSize::Small, FuelType::Other), 0.14308);
        assert_eq!(car_factor(VehicleSize::Medium, FuelType::Other), 0.17474);
        assert_eq!(car_factor(VehicleSize::Large, FuelType::Other), 0.26828);
        assert_eq!(car_factor(VehicleSize::Average, FuelType::Other), 0.16272);
    }

    #[test]
    fn test_bev_is_zero_in_every_row() {
        for row in [SMALL_CAR, MEDIUM_CAR, LARGE_CAR, AVERAGE_CAR] {
            assert_eq!(row.for_fuel(FuelType::Bev), 0.0);
        }
    }

    #[test]
    fn test_motorcycle_factors() {
        assert_eq!(motorcycle_factor(VehicleSize::Small), 0.08319);
        assert_eq!(motorcycle_factor(VehicleSize::Medium), 0.10107);
        assert_eq!(motorcycle_factor(VehicleSize::Large), 0.13252);
        assert_eq!(motorcycle_factor(VehicleSize::Average), 0.11367);
    }
}
