// SPDX-License-Identifier: MIT

//! Encoded polyline decoding (Strava format, precision 5).
//!
//! Decoding is best-effort: an activity without a usable path is a normal
//! state, so malformed input yields an empty route instead of an error.

use crate::models::Coordinate;

/// Precision used by Strava's `summary_polyline`.
pub const STRAVA_PRECISION: u32 = 5;

/// Decode an encoded polyline into coordinates.
pub fn decode(encoded: &str) -> Vec<Coordinate> {
    decode_with_precision(encoded, STRAVA_PRECISION)
}

/// Decode an encoded polyline with a custom precision (digits after the
/// decimal point).
pub fn decode_with_precision(encoded: &str, precision: u32) -> Vec<Coordinate> {
    if encoded.is_empty() {
        return Vec::new();
    }

    match polyline::decode_polyline(encoded, precision) {
        Ok(line) => line.0.into_iter().map(Coordinate::from).collect(),
        Err(e) => {
            tracing::warn!(error = %e, len = encoded.len(), "Failed to decode polyline");
            Vec::new()
        }
    }
}

/// Encode coordinates as a polyline at Strava precision.
pub fn encode(coordinates: &[Coordinate]) -> Result<String, CodecError> {
    encode_with_precision(coordinates, STRAVA_PRECISION)
}

/// Encode coordinates as a polyline with a custom precision.
pub fn encode_with_precision(
    coordinates: &[Coordinate],
    precision: u32,
) -> Result<String, CodecError> {
    polyline::encode_coordinates(
        coordinates.iter().copied().map(geo::Coord::from),
        precision,
    )
    .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Errors from polyline encoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Failed to encode polyline: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference example from the polyline algorithm documentation.
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    fn assert_close(actual: &[Coordinate], expected: &[Coordinate]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a.lat - e.lat).abs() < 1e-5, "lat {} != {}", a.lat, e.lat);
            assert!((a.lng - e.lng).abs() < 1e-5, "lng {} != {}", a.lng, e.lng);
        }
    }

    #[test]
    fn test_decode_reference_polyline() {
        assert_close(&decode(REFERENCE), &reference_points());
    }

    #[test]
    fn test_round_trip_reference() {
        let decoded = decode(REFERENCE);
        assert_eq!(encode(&decoded).unwrap(), REFERENCE);
    }

    #[test]
    fn test_decode_empty_is_empty() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        // Characters below '?' are outside the encoding alphabet.
        assert!(decode("!!!!").is_empty());
        assert!(decode("_p~iF ~ps|U").is_empty());
    }

    #[test]
    fn test_decode_demo_route() {
        let coords = decode("a~l~Fjk~uOwHJy@P");
        assert_close(
            &coords,
            &[
                Coordinate::new(41.85073, -87.65126),
                Coordinate::new(41.85229, -87.65132),
                Coordinate::new(41.85258, -87.65141),
            ],
        );
    }

    #[test]
    fn test_precision_six() {
        let points = vec![Coordinate::new(47.123456, 8.654321)];
        let encoded = encode_with_precision(&points, 6).unwrap();
        assert_close(&decode_with_precision(&encoded, 6), &points);
    }
}
