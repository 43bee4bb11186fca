//! Position fix and wire payload types.
//!
//! [`PositionFix`] is our own type, decoupled from both the positioning
//! daemon's datagram format and the receiver's wire contract. A fix is
//! created once per capture tick, is immutable, and is consumed exactly
//! once by the publisher; it is never persisted.

use serde::{Deserialize, Serialize};

/// Meters-per-second to kilometers-per-hour.
const MPS_TO_KMH: f64 = 3.6;

/// One instantaneous position reading with associated motion attributes.
///
/// Speed is carried in the source's native meters/second; the km/h
/// conversion happens only at the wire boundary in [`GpsPayload`].
/// Optional fields are `None` when the platform cannot determine them.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Ground speed in meters/second.
    pub speed_mps: Option<f64>,
    /// Heading in degrees, 0-360.
    pub heading_deg: Option<f64>,
    /// Horizontal accuracy in meters.
    pub accuracy_m: Option<f64>,
    /// Altitude in meters.
    pub altitude_m: Option<f64>,
    /// Capture time, milliseconds since the Unix epoch. Monotonically
    /// non-decreasing within one capture session.
    pub captured_at_epoch_ms: i64,
}

/// JSON body for `POST {receiver_url}/gps`.
///
/// The field names and units are fixed for receiver compatibility:
/// `speed` is km/h (or null), `timestamp` is the fix's capture time in
/// epoch milliseconds. Null fields stay null - never coerced to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsPayload {
    pub latitude: f64,
    pub longitude: f64,
    /// Speed in km/h, or null when the source could not determine it.
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub timestamp: i64,
}

impl From<&PositionFix> for GpsPayload {
    fn from(fix: &PositionFix) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            speed: fix.speed_mps.map(|mps| mps * MPS_TO_KMH),
            heading: fix.heading_deg,
            accuracy: fix.accuracy_m,
            altitude: fix.altitude_m,
            timestamp: fix.captured_at_epoch_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fix() -> PositionFix {
        PositionFix {
            latitude: 52.5200,
            longitude: 13.4050,
            speed_mps: Some(10.0),
            heading_deg: Some(90.0),
            accuracy_m: Some(5.0),
            altitude_m: Some(34.0),
            captured_at_epoch_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_payload_converts_speed_to_kmh() {
        let payload = GpsPayload::from(&sample_fix());
        let speed = payload.speed.unwrap();
        assert!((speed - 36.0).abs() < 1e-9, "10 m/s should be 36 km/h");
    }

    #[test]
    fn test_payload_preserves_null_speed() {
        let fix = PositionFix {
            speed_mps: None,
            ..sample_fix()
        };
        let payload = GpsPayload::from(&fix);
        assert_eq!(payload.speed, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["speed"].is_null(), "null speed must stay null on the wire");
    }

    #[test]
    fn test_payload_wire_field_names() {
        let json = serde_json::to_value(GpsPayload::from(&sample_fix())).unwrap();

        for key in [
            "latitude",
            "longitude",
            "speed",
            "heading",
            "accuracy",
            "altitude",
            "timestamp",
        ] {
            assert!(json.get(key).is_some(), "missing wire field {key}");
        }
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
    }

    #[test]
    fn test_payload_null_motion_attributes() {
        let fix = PositionFix {
            speed_mps: None,
            heading_deg: None,
            accuracy_m: None,
            altitude_m: None,
            ..sample_fix()
        };
        let json = serde_json::to_value(GpsPayload::from(&fix)).unwrap();
        assert!(json["heading"].is_null());
        assert!(json["accuracy"].is_null());
        assert!(json["altitude"].is_null());
    }
}
