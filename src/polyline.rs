//! Route waypoints for mapping and directions integrations.
//!
//! Points are kept decoded. Encoding to the compact polyline text format
//! happens only when handing a route to an outside service.

use serde::{Deserialize, Serialize};

use crate::model::GeoPoint;

/// Precision used by most directions services (1e-5 degrees).
pub const DEFAULT_PRECISION: u32 = 5;

/// Ordered stop coordinates of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Encode as an encoded-polyline string at `precision` decimal digits.
    pub fn encode(&self, precision: u32) -> String {
        let factor = 10f64.powi(precision as i32);
        let mut out = String::new();
        let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

        for point in &self.points {
            let lat = (point.lat * factor).round() as i64;
            let lng = (point.lng * factor).round() as i64;
            encode_value(lat - prev_lat, &mut out);
            encode_value(lng - prev_lng, &mut out);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }

    /// Decode an encoded-polyline string. None if it is malformed.
    pub fn decode(encoded: &str, precision: u32) -> Option<Self> {
        let factor = 10f64.powi(precision as i32);
        let mut bytes = encoded.bytes();
        let mut points = Vec::new();
        let (mut lat, mut lng) = (0i64, 0i64);

        loop {
            let Some(first) = bytes.next() else { break };
            lat += decode_value(first, &mut bytes)?;
            let second = bytes.next()?;
            lng += decode_value(second, &mut bytes)?;
            points.push(GeoPoint::new(lat as f64 / factor, lng as f64 / factor));
        }

        Some(Self { points })
    }
}

fn encode_value(delta: i64, out: &mut String) {
    let shifted = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut value = shifted as u64;
    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}

fn decode_value(first: u8, rest: &mut impl Iterator<Item = u8>) -> Option<i64> {
    let mut result: u64 = 0;
    let mut shift = 0;
    let mut byte = first;

    loop {
        let chunk = byte.checked_sub(63)? as u64;
        if shift > 60 {
            return None;
        }
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
        byte = rest.next()?;
    }

    let value = (result >> 1) as i64;
    Some(if result & 1 == 1 { !value } else { value })
}
