//! Decoder for Valhalla's encoded polyline geometry.

use anyhow::{bail, Result};

use droproute_core::Point;

const PRECISION: f64 = 1e6;

/// Decode an encoded polyline with 1e-6 degree precision.
///
/// Valhalla emits leg shapes in this format, latitude first per pair. A
/// truncated or corrupt string yields an error rather than a partial path.
pub fn decode_polyline6(encoded: &str) -> Result<Vec<Point>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0usize;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while index < bytes.len() {
        let (dlat, next) = decode_value(bytes, index)?;
        let (dlon, after) = decode_value(bytes, next)?;
        index = after;
        lat += dlat;
        lon += dlon;
        points.push(Point::new(lon as f64 / PRECISION, lat as f64 / PRECISION));
    }
    Ok(points)
}

/// Decode one zigzag varint starting at `index`; returns the delta and the
/// offset just past it.
fn decode_value(bytes: &[u8], mut index: usize) -> Result<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&raw) = bytes.get(index) else {
            bail!("polyline truncated mid-value at byte {}", index);
        };
        if raw < 63 {
            bail!("polyline byte {} out of range at offset {}", raw, index);
        }
        if shift > 60 {
            bail!("polyline value overflow at offset {}", index);
        }
        index += 1;
        let chunk = (raw - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    let delta = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((delta, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_reference_polyline() {
        // Google's reference string; at 1e-6 precision the integers land
        // a factor of ten smaller than the documented 1e-5 coordinates.
        let points = decode_polyline6("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(points.len(), 3);
        assert!((points[0].lat - 3.85).abs() < 1e-9);
        assert!((points[0].lon - (-12.02)).abs() < 1e-9);
        assert!((points[1].lat - 4.07).abs() < 1e-9);
        assert!((points[1].lon - (-12.095)).abs() < 1e-9);
        assert!((points[2].lat - 4.3252).abs() < 1e-9);
        assert!((points[2].lon - (-12.6453)).abs() < 1e-9);
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert!(decode_polyline6("").unwrap().is_empty());
    }

    #[test]
    fn truncated_input_is_an_error() {
        // Latitude decodes but the longitude value is missing.
        assert!(decode_polyline6("_p~iF").is_err());
    }

    #[test]
    fn out_of_range_bytes_are_an_error() {
        assert!(decode_polyline6("abc\u{1}def").is_err());
    }
}
