use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::earths::earths_needed;
use super::transit::{TransitDistances, TransitMode, transit_emission};
use super::vehicle::{FuelType, VehicleEntry, VehicleSize, car_emission, motorcycle_emission};
use crate::store::{self, KeyValueStore, keys};

/// Everything a footprint calculation needs, already read out of the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FootprintInputs {
    /// At most [`keys::MAX_VEHICLES`] entries; extras are ignored.
    pub cars: Vec<VehicleEntry>,
    pub motorcycles: Vec<VehicleEntry>,
    pub transit: TransitDistances,
}

impl FootprintInputs {
    /// Reads car and motorcycle slots 1..=5, the five transit modes and the
    /// two generic transit distances.
    ///
    /// Slots whose distance is zero or absent are left out. A slot with a
    /// distance but no size reads as `medium`; no fuel reads as `petrol`.
    pub fn from_store<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut cars = Vec::new();
        let mut motorcycles = Vec::new();

        for slot in 1..=keys::MAX_VEHICLES {
            let distance = store::slider_value(store, &keys::car_distance(slot), 0.0);
            if distance > 0.0 {
                let size = store::label(store, &keys::car_size(slot))
                    .map(|s| VehicleSize::from_label(&s))
                    .unwrap_or(VehicleSize::Medium);
                let fuel = store::label(store, &keys::car_fuel(slot))
                    .map(|s| FuelType::from_label(&s))
                    .unwrap_or(FuelType::Petrol);
                cars.push(VehicleEntry::car(distance, size, fuel));
            }

            let distance = store::slider_value(store, &keys::motorcycle_distance(slot), 0.0);
            if distance > 0.0 {
                let size = store::label(store, &keys::motorcycle_size(slot))
                    .map(|s| VehicleSize::from_label(&s))
                    .unwrap_or(VehicleSize::Medium);
                motorcycles.push(VehicleEntry::motorcycle(distance, size));
            }
        }

        let mut transit = TransitDistances::new();
        for (mode, key) in TransitMode::ALL.into_iter().zip([
            keys::LRT_DISTANCE,
            keys::MRT_DISTANCE,
            keys::KTM_DISTANCE,
            keys::MONORAIL_DISTANCE,
            keys::BUS_DISTANCE,
        ]) {
            transit
                .modes
                .insert(mode.label().to_string(), store::slider_value(store, key, 0.0));
        }
        for (i, key) in keys::PUBLIC_TRANSPORT_DISTANCE.iter().enumerate() {
            transit.other[i] = store::slider_value(store, key, 0.0);
        }

        Self {
            cars,
            motorcycles,
            transit,
        }
    }
}

/// Weekly footprint in kg CO2 per category, plus the Earths-needed index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    pub car_footprint: f64,
    pub motorcycle_footprint: f64,
    pub public_transport_footprint: f64,
    pub total_footprint: f64,
    pub earths_needed: u32,
}

impl FootprintResult {
    /// Writes the five figures to the store: footprints as two-decimal
    /// strings, Earths as an integer.
    pub fn write_to<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> anyhow::Result<()> {
        store.set(keys::TOTAL_FOOTPRINT, &format!("{:.2}", self.total_footprint))?;
        store.set(keys::EARTHS_NEEDED, &self.earths_needed.to_string())?;
        store.set(keys::CAR_FOOTPRINT, &format!("{:.2}", self.car_footprint))?;
        store.set(
            keys::MOTORCYCLE_FOOTPRINT,
            &format!("{:.2}", self.motorcycle_footprint),
        )?;
        store.set(
            keys::PUBLIC_TRANSPORT_FOOTPRINT,
            &format!("{:.2}", self.public_transport_footprint),
        )?;
        Ok(())
    }

    /// Reads back a result previously written with [`FootprintResult::write_to`].
    /// Returns `None` if any of the five keys is missing or unparsable.
    pub fn read_from<S: KeyValueStore + ?Sized>(store: &S) -> Option<Self> {
        let number = |key: &str| store.get(key)?.trim().parse::<f64>().ok();
        Some(Self {
            car_footprint: number(keys::CAR_FOOTPRINT)?,
            motorcycle_footprint: number(keys::MOTORCYCLE_FOOTPRINT)?,
            public_transport_footprint: number(keys::PUBLIC_TRANSPORT_FOOTPRINT)?,
            total_footprint: number(keys::TOTAL_FOOTPRINT)?,
            earths_needed: store.get(keys::EARTHS_NEEDED)?.trim().parse().ok()?,
        })
    }
}

/// Pure calculation over already-collected inputs.
pub fn compute_footprint(inputs: &FootprintInputs) -> FootprintResult {
    // fold from +0.0: an empty f64 sum is -0.0 and would format as "-0.00"
    let car_footprint = inputs
        .cars
        .iter()
        .take(keys::MAX_VEHICLES)
        .map(|c| car_emission(c.distance, c.size, c.fuel))
        .fold(0.0, |acc, kg| acc + kg);

    let motorcycle_footprint = inputs
        .motorcycles
        .iter()
        .take(keys::MAX_VEHICLES)
        .map(|m| motorcycle_emission(m.distance, m.size))
        .fold(0.0, |acc, kg| acc + kg);

    let public_transport_footprint = transit_emission(&inputs.transit);

    let total_footprint = car_footprint + motorcycle_footprint + public_transport_footprint;

    FootprintResult {
        car_footprint,
        motorcycle_footprint,
        public_transport_footprint,
        total_footprint,
        earths_needed: earths_needed(total_footprint),
    }
}

/// Reads inputs from `store`, computes the footprint and writes the results
/// back. A failed write is logged; the computed result is returned either way.
#[tracing::instrument(skip_all)]
pub fn compute_total_footprint<S: KeyValueStore + ?Sized>(store: &mut S) -> FootprintResult {
    let inputs = FootprintInputs::from_store(&*store);
    debug!(
        cars = inputs.cars.len(),
        motorcycles = inputs.motorcycles.len(),
        ?inputs,
        "Footprint inputs read"
    );

    let result = compute_footprint(&inputs);

    if let Err(e) = result.write_to(store) {
        warn!(error = %e, "Failed to persist footprint results");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("store is read-only, cannot set '{key}'")
        }
    }

    #[test]
    fn test_empty_store() {
        let mut store = MemoryStore::new();
        let result = compute_total_footprint(&mut store);

        assert_eq!(result.total_footprint, 0.0);
        assert_eq!(result.earths_needed, 1);
        assert_eq!(store.get(keys::TOTAL_FOOTPRINT).as_deref(), Some("0.00"));
        assert_eq!(store.get(keys::EARTHS_NEEDED).as_deref(), Some("1"));
        assert_eq!(store.get(keys::CAR_FOOTPRINT).as_deref(), Some("0.00"));
        assert_eq!(store.get(keys::MOTORCYCLE_FOOTPRINT).as_deref(), Some("0.00"));
        assert_eq!(
            store.get(keys::PUBLIC_TRANSPORT_FOOTPRINT).as_deref(),
            Some("0.00")
        );
    }

    #[test]
    fn test_bus_only_writes_unsigned_zeros() {
        let mut store = MemoryStore::from_pairs([("bus_distance", "10")]);
        let result = compute_total_footprint(&mut store);

        assert!(result.car_footprint.is_sign_positive());
        assert!(result.motorcycle_footprint.is_sign_positive());
        assert!(approx_eq(result.public_transport_footprint, 1.0385));
        assert_eq!(store.get(keys::CAR_FOOTPRINT).as_deref(), Some("0.00"));
        assert_eq!(store.get(keys::MOTORCYCLE_FOOTPRINT).as_deref(), Some("0.00"));
        assert_eq!(
            store.get(keys::PUBLIC_TRANSPORT_FOOTPRINT).as_deref(),
            Some("1.04")
        );
        assert_eq!(store.get(keys::TOTAL_FOOTPRINT).as_deref(), Some("1.04"));
    }

    #[test]
    fn test_missing_size_and_fuel_default_to_medium_petrol() {
        let store = MemoryStore::from_pairs([("car_distance_1", "100")]);
        let inputs = FootprintInputs::from_store(&store);

        assert_eq!(
            inputs.cars,
            vec![VehicleEntry::car(100.0, VehicleSize::Medium, FuelType::Petrol)]
        );
        let result = compute_footprint(&inputs);
        assert!(approx_eq(result.car_footprint, 17.474));
    }

    #[test]
    fn test_zero_distance_slots_are_skipped() {
        let store = MemoryStore::from_pairs([
            ("car_distance_1", "0"),
            ("car_size_1", "large"),
            ("car_distance_3", "10"),
            ("car_size_3", "large"),
            ("car_fuel_3", "diesel"),
            ("motorcycle_distance_2", "bogus"),
        ]);
        let inputs = FootprintInputs::from_store(&store);

        assert_eq!(inputs.cars.len(), 1);
        assert!(inputs.motorcycles.is_empty());
        assert!(approx_eq(compute_footprint(&inputs).car_footprint, 2.1007));
    }

    #[test]
    fn test_slots_beyond_five_are_not_read() {
        let store = MemoryStore::from_pairs([("car_distance_6", "1000")]);
        let inputs = FootprintInputs::from_store(&store);
        assert!(inputs.cars.is_empty());
    }

    #[test]
    fn test_full_week() {
        let mut store = MemoryStore::from_pairs([
            ("car_distance_1", "100"),
            ("car_size_1", "small"),
            ("car_fuel_1", "PETROL"),
            ("car_distance_2", "10"),
            ("car_size_2", "xl"),
            ("car_fuel_2", "diesel"),
            ("motorcycle_distance_1", "50"),
            ("motorcycle_size_1", "large"),
            ("lrt_distance", "10"),
            ("bus_distance", "5"),
            ("public_transport_distance_1", "10"),
        ]);

        let result = compute_total_footprint(&mut store);

        // 14.308 + 1.7304
        assert!(approx_eq(result.car_footprint, 16.0384));
        assert!(approx_eq(result.motorcycle_footprint, 6.626));
        // 1.56415 + 1.2597
        assert!(approx_eq(result.public_transport_footprint, 2.82385));
        assert!(approx_eq(result.total_footprint, 25.48825));
        // 25.48825 * 52 / 1000 / 2 = 0.66
        assert_eq!(result.earths_needed, 1);

        assert_eq!(store.get(keys::CAR_FOOTPRINT).as_deref(), Some("16.04"));
        assert_eq!(store.get(keys::MOTORCYCLE_FOOTPRINT).as_deref(), Some("6.63"));
        assert_eq!(store.get(keys::TOTAL_FOOTPRINT).as_deref(), Some("25.49"));
    }

    #[test]
    fn test_heavy_driver_needs_several_earths() {
        let store = MemoryStore::from_pairs([
            ("car_distance_1", "400"),
            ("car_size_1", "large"),
            ("car_fuel_1", "petrol"),
        ]);
        let result = compute_footprint(&FootprintInputs::from_store(&store));

        // 400 * 0.26828 = 107.312 kg/week -> 2.79 earths
        assert!(approx_eq(result.total_footprint, 107.312));
        assert_eq!(result.earths_needed, 3);
    }

    #[test]
    fn test_result_survives_write_failure() {
        let mut store = ReadOnlyStore(MemoryStore::from_pairs([("mrt_distance", "10")]));
        let result = compute_total_footprint(&mut store);

        assert!(approx_eq(result.public_transport_footprint, 1.2694));
        assert_eq!(store.get(keys::TOTAL_FOOTPRINT), None);
    }

    #[test]
    fn test_written_strings_parse_back_within_rounding() {
        let mut store = MemoryStore::from_pairs([
            ("car_distance_1", "123"),
            ("car_size_1", "medium"),
            ("car_fuel_1", "hybrid"),
            ("ktm_distance", "77"),
            ("monorail_distance", "3"),
        ]);
        let result = compute_total_footprint(&mut store);
        let parsed = FootprintResult::read_from(&store).unwrap();

        assert!((parsed.car_footprint - result.car_footprint).abs() <= 0.005);
        assert!((parsed.motorcycle_footprint - result.motorcycle_footprint).abs() <= 0.005);
        assert!(
            (parsed.public_transport_footprint - result.public_transport_footprint).abs() <= 0.005
        );
        assert!((parsed.total_footprint - result.total_footprint).abs() <= 0.005);
        assert_eq!(parsed.earths_needed, result.earths_needed);
    }
}
