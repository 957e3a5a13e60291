//! Conversions between stored rows and wire records.
//!
//! Decoding goes through a `*Raw` struct per record kind, filled by sqlx from
//! the normalised select list. Encoding produces a `*Params` struct holding
//! every column the destination table needs, defaults included.

pub mod driving_event;
pub mod ferry_crossing;
pub mod trip_row;

pub use driving_event::DrivingEventRaw;
pub use ferry_crossing::FerryCrossingRaw;
pub use trip_row::TripRowRaw;

use tracing::warn;

use crate::error::CodecError;

/// GPS positions are stored as degrees multiplied by this factor.
pub const COORDINATE_SCALE: f64 = 1_000_000.0;

/// Vehicle class code the destination requires but the wire records do not carry.
pub const DEFAULT_VEHICLE_CLASS_CODE: &str = "001100";

/// Legacy stand-ins written when a wire code is not numeric.
pub const PLACEHOLDER_VEHICLE_CODE: i64 = 1;
pub const PLACEHOLDER_DRIVER_CODE: i64 = 0;

pub fn decode_coordinate(stored: Option<i64>) -> Option<f64> {
    stored.map(|v| v as f64 / COORDINATE_SCALE)
}

pub fn encode_coordinate(value: Option<f64>) -> Option<i64> {
    value
        .filter(|v| v.is_finite())
        .map(|v| (v * COORDINATE_SCALE).round() as i64)
}

/// Turns a string-exposed numeric code back into its stored integer.
pub fn encode_code(field: &'static str, value: &str, placeholder: i64) -> i64 {
    match value.trim().parse::<i64>() {
        Ok(code) => code,
        Err(_) => {
            if !value.is_empty() {
                warn!("{} '{}' is not numeric, writing placeholder {}", field, value, placeholder);
            }
            placeholder
        }
    }
}

pub(crate) fn non_negative_f64(field: &'static str, value: f64) -> Result<f64, CodecError> {
    if value < 0.0 || !value.is_finite() {
        return Err(CodecError::Negative {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

pub(crate) fn non_negative_i64(field: &'static str, value: i64) -> Result<i64, CodecError> {
    if value < 0 {
        return Err(CodecError::Negative {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_coordinate() {
        let lat = decode_coordinate(Some(35676200)).unwrap();
        assert!((lat - 35.6762).abs() < 1e-6);
        assert_eq!(decode_coordinate(None), None);
    }

    #[test]
    fn test_coordinate_round_trip_is_exact() {
        let samples = [
            0,
            1,
            -1,
            35676200,
            139650300,
            -33868820,
            90_000_000,
            -90_000_000,
            180_000_000,
            -180_000_000,
            123_456_789,
        ];
        for n in samples {
            assert_eq!(encode_coordinate(decode_coordinate(Some(n))), Some(n), "value {}", n);
        }
        for n in (-180_000_000i64..=180_000_000).step_by(9_999_991) {
            assert_eq!(encode_coordinate(decode_coordinate(Some(n))), Some(n));
        }
    }

    #[test]
    fn test_encode_skips_non_finite() {
        assert_eq!(encode_coordinate(Some(f64::NAN)), None);
        assert_eq!(encode_coordinate(None), None);
    }

    #[test]
    fn test_encode_code_keeps_real_codes() {
        assert_eq!(encode_code("vehicle_no", "101", PLACEHOLDER_VEHICLE_CODE), 101);
        assert_eq!(encode_code("vehicle_no", " 42 ", PLACEHOLDER_VEHICLE_CODE), 42);
        assert_eq!(encode_code("vehicle_no", "", PLACEHOLDER_VEHICLE_CODE), 1);
        assert_eq!(encode_code("driver_code", "driver-123", PLACEHOLDER_DRIVER_CODE), 0);
    }

    #[test]
    fn test_negative_measures_are_rejected() {
        assert!(non_negative_f64("distance", 0.0).is_ok());
        assert!(non_negative_f64("distance", -0.5).is_err());
        assert!(non_negative_f64("distance", f64::INFINITY).is_err());
        assert!(non_negative_i64("standard_fare", -1).is_err());
    }
}
