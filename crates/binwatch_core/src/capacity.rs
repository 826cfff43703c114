//! Fill-capacity derivation from the two ultrasonic distance sensors.

/// Sensor-to-surface distance (cm) of an empty bin, calibrated
/// against the deployed module housings.
pub const EMPTY_DISTANCE_CM: f64 = 60.0;

pub const MAIN_NEAR_THRESHOLD_CM: f64 = 30.0;
pub const SUB_NEAR_THRESHOLD_CM: f64 = 17.0;

/// Fill percentage from the two ultrasonic readings (cm, smaller
/// distance means fuller). A reading at or below zero means the
/// sensor is out of range and the bin reports empty. The secondary
/// sensor takes over only when the main reads ≤ 30 cm and the
/// secondary ≤ 17 cm. Clamped to [0, 100], one decimal place.
pub fn fill_capacity(main_cm: f64, sub_cm: f64) -> f64 {
    if main_cm <= 0.0 || sub_cm <= 0.0 {
        return 0.0;
    }

    let active_cm = if main_cm <= MAIN_NEAR_THRESHOLD_CM && sub_cm <= SUB_NEAR_THRESHOLD_CM {
        sub_cm
    } else {
        main_cm
    };

    let raw = (1.0 - active_cm / EMPTY_DISTANCE_CM) * 100.0;
    round_one_decimal(raw.clamp(0.0, 100.0))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_reading_reports_empty() {
        assert_eq!(fill_capacity(0.0, 25.0), 0.0);
        assert_eq!(fill_capacity(25.0, 0.0), 0.0);
        assert_eq!(fill_capacity(-3.0, 25.0), 0.0);
        assert_eq!(fill_capacity(25.0, -3.0), 0.0);
    }

    #[test]
    fn both_negative_short_circuits_before_clamping() {
        // -5/-5 would clamp to 100.0 if the range clamp ran first.
        assert_eq!(fill_capacity(-5.0, -5.0), 0.0);
    }

    #[test]
    fn main_sensor_selected_when_sub_reads_far() {
        // main ≤ 30 and sub > 17: main reading drives the result.
        assert_eq!(fill_capacity(30.0, 20.0), 50.0);
    }

    #[test]
    fn sub_sensor_selected_when_both_read_near() {
        // main ≤ 30 and sub ≤ 17: the secondary reading takes over.
        assert_eq!(fill_capacity(30.0, 10.0), 83.3);
    }

    #[test]
    fn main_sensor_is_the_fallback_when_it_reads_far() {
        assert_eq!(fill_capacity(40.0, 5.0), 33.3);
    }

    #[test]
    fn result_is_clamped_and_rounded() {
        // Deeper than the calibrated empty distance clamps to 0.
        assert_eq!(fill_capacity(75.0, 40.0), 0.0);
        // Reading of exactly the empty distance is an empty bin.
        assert_eq!(fill_capacity(60.0, 40.0), 0.0);
        // Distances never round past one decimal place.
        assert_eq!(fill_capacity(41.0, 40.0), 31.7);
        assert_eq!(fill_capacity(1.0, 18.0), 98.3);
    }
}
