//! Collaborator key-value store.
//!
//! The calculator reads its inputs from, and writes its results to, a string
//! keyed store with string values. [`KeyValueStore`] is the seam; [`MemoryStore`]
//! keeps values in a `HashMap` and [`JsonFileStore`] persists them as a JSON
//! object on disk, standing in for browser local storage.

mod file;
pub mod keys;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use anyhow::Result;

/// String keyed storage of string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores a numeric slider position under `key`.
pub fn save_slider_value<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, value: f64) -> Result<()> {
    store.set(key, &value.to_string())
}

/// Reads a numeric slider position.
///
/// Returns `default` when the key is absent. A present value that does not
/// parse as a finite number, or is negative, reads as 0.
pub fn slider_value<S: KeyValueStore + ?Sized>(store: &S, key: &str, default: f64) -> f64 {
    match store.get(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            _ => 0.0,
        },
    }
}

/// Reads a category label, treating empty or whitespace-only values as absent.
pub fn label<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    store
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_value_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(slider_value(&store, "lrt_distance", 0.0), 0.0);
        assert_eq!(slider_value(&store, "lrt_distance", 7.0), 7.0);
    }

    #[test]
    fn test_slider_value_malformed_or_negative_is_zero() {
        let store = MemoryStore::from_pairs([
            ("a", "abc"),
            ("b", "-12"),
            ("c", "NaN"),
            ("d", " 42 "),
        ]);
        assert_eq!(slider_value(&store, "a", 5.0), 0.0);
        assert_eq!(slider_value(&store, "b", 5.0), 0.0);
        assert_eq!(slider_value(&store, "c", 5.0), 0.0);
        assert_eq!(slider_value(&store, "d", 5.0), 42.0);
    }

    #[test]
    fn test_save_then_read_slider() {
        let mut store = MemoryStore::new();
        save_slider_value(&mut store, "bus_distance", 35.0).unwrap();
        assert_eq!(store.get("bus_distance").as_deref(), Some("35"));
        assert_eq!(slider_value(&store, "bus_distance", 0.0), 35.0);
    }

    #[test]
    fn test_label_ignores_blank() {
        let store = MemoryStore::from_pairs([("car_size_1", "  "), ("car_fuel_1", "Diesel")]);
        assert_eq!(label(&store, "car_size_1"), None);
        assert_eq!(label(&store, "car_fuel_1").as_deref(), Some("Diesel"));
        assert_eq!(label(&store, "car_size_2"), None);
    }
}
