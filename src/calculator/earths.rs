/// Weeks used to extrapolate a weekly figure to a year.
pub const WEEKS_PER_YEAR: f64 = 52.0;

pub const KG_PER_TONNE: f64 = 1000.0;

/// Sustainable per-capita emissions, tonnes CO2 per year.
pub const SUSTAINABLE_TONNES_PER_YEAR: f64 = 2.0;

/// Converts weekly emissions (kg CO2) into the number of Earths needed if
/// everyone emitted at that rate. Rounded to the nearest integer, never below 1.
pub fn earths_needed(total_weekly_kg: f64) -> u32 {
    let annual_kg = total_weekly_kg * WEEKS_PER_YEAR;
    let annual_tonnes = annual_kg / KG_PER_TONNE;
    let raw = annual_tonnes / SUSTAINABLE_TONNES_PER_YEAR;

    // NaN.max(1.0) is 1.0
    raw.round().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_needs_one_earth() {
        assert_eq!(earths_needed(0.0), 1);
    }

    #[test]
    fn test_hundred_kg_per_week() {
        // 100 * 52 / 1000 / 2 = 2.6
        assert_eq!(earths_needed(100.0), 3);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 96.0 -> 2.496, 96.2 -> 2.5012
        assert_eq!(earths_needed(96.0), 2);
        assert_eq!(earths_needed(96.2), 3);
    }

    #[test]
    fn test_negative_and_nan_clamp_to_one() {
        assert_eq!(earths_needed(-500.0), 1);
        assert_eq!(earths_needed(f64::NAN), 1);
    }

    #[test]
    fn test_monotonic() {
        let mut last = earths_needed(0.0);
        let mut x = 0.0;
        while x < 2000.0 {
            let e = earths_needed(x);
            assert!(e >= last, "earths_needed({x}) = {e} < {last}");
            last = e;
            x += 3.7;
        }
    }
}
