//! Geographic primitives: coordinates, map regions, viewboxes and distances.
//!
//! Coordinates follow the GeoJSON convention of longitude first wherever they
//! appear as a pair. Distances are great-circle distances on a sphere of radius
//! [`EARTH_RADIUS_KM`].

use crate::domain::error::{EventMapError, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Builds coordinates from a GeoJSON `[longitude, latitude]` position.
    ///
    /// Returns `None` when the position has fewer than two components.
    #[must_use]
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [longitude, latitude, ..] => Some(Self::new(*longitude, *latitude)),
            _ => None,
        }
    }

    /// Returns the GeoJSON `[longitude, latitude]` position.
    #[must_use]
    pub const fn to_position(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// A rectangular map extent: center plus latitude/longitude span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    /// Region centered on `center` with the same span on both axes.
    ///
    /// ```
    /// use eventmap::domain::{Coordinates, Region};
    ///
    /// let region = Region::around(Coordinates::new(13.4, 52.5), 0.1);
    /// assert_eq!(region.latitude, 52.5);
    /// assert_eq!(region.longitude_delta, 0.1);
    /// ```
    #[must_use]
    pub const fn around(center: Coordinates, span: f64) -> Self {
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            latitude_delta: span,
            longitude_delta: span,
        }
    }

    #[must_use]
    pub const fn center(&self) -> Coordinates {
        Coordinates::new(self.longitude, self.latitude)
    }
}

/// Bounding box used to bias geocoding results, in the order
/// `min_lon, min_lat, max_lon, max_lat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewbox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Viewbox {
    /// Box extending `half_span` degrees from `center` in every direction.
    #[must_use]
    pub fn around(center: Coordinates, half_span: f64) -> Self {
        Self {
            min_lon: center.longitude - half_span,
            min_lat: center.latitude - half_span,
            max_lon: center.longitude + half_span,
            max_lat: center.latitude + half_span,
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min_lon..=self.max_lon).contains(&point.longitude)
            && (self.min_lat..=self.max_lat).contains(&point.latitude)
    }
}

/// Great-circle distance in kilometres between two points.
///
/// ```
/// use eventmap::domain::{haversine_km, Coordinates};
///
/// let berlin = Coordinates::new(13.405, 52.52);
/// let paris = Coordinates::new(2.3522, 48.8566);
/// let d = haversine_km(berlin, paris);
/// assert!((d - 878.0).abs() < 5.0);
/// ```
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Parses a PostGIS point in either `POINT(lng lat)` or
/// `SRID=4326;POINT(lng lat)` form.
///
/// # Errors
///
/// Returns [`EventMapError::Geometry`] if the string has no `POINT(...)` body or
/// the body does not hold two numbers.
///
/// ```
/// use eventmap::domain::parse_postgis_point;
///
/// let p = parse_postgis_point("SRID=4326;POINT(10.45 51.16)").unwrap();
/// assert_eq!((p.longitude, p.latitude), (10.45, 51.16));
/// ```
pub fn parse_postgis_point(geometry: &str) -> Result<Coordinates> {
    let invalid = || EventMapError::Geometry(geometry.to_string());

    let start = geometry.find("POINT(").ok_or_else(invalid)? + "POINT(".len();
    let body = &geometry[start..];
    let end = body.find(')').ok_or_else(invalid)?;

    let mut parts = body[..end].split_whitespace();
    let longitude = parts.next().and_then(|s| s.parse::<f64>().ok()).ok_or_else(invalid)?;
    let latitude = parts.next().and_then(|s| s.parse::<f64>().ok()).ok_or_else(invalid)?;

    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok(Coordinates::new(longitude, latitude))
}

/// Formats coordinates as an SRID-tagged PostGIS point string.
#[must_use]
pub fn format_postgis_point(point: Coordinates) -> String {
    format!("SRID=4326;POINT({} {})", point.longitude, point.latitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_is_zero_for_identical_points() {
        let p = Coordinates::new(10.0, 51.0);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinates::new(10.0, 10.0);
        let b = Coordinates::new(-10.0, -10.0);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn parses_plain_and_srid_points() {
        let plain = parse_postgis_point("POINT(-3.7 40.4)").unwrap();
        assert_eq!(plain, Coordinates::new(-3.7, 40.4));

        let tagged = parse_postgis_point(&format_postgis_point(plain)).unwrap();
        assert_eq!(tagged, plain);
    }

    #[test]
    fn rejects_malformed_points() {
        for bad in ["", "POINT()", "POINT(1)", "POINT(a b)", "POINT(1 2 3)", "LINESTRING(1 2)"] {
            assert!(
                matches!(parse_postgis_point(bad), Err(EventMapError::Geometry(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn viewbox_contains_its_center_but_not_far_points() {
        let center = Coordinates::new(10.0, 50.0);
        let vb = Viewbox::around(center, 0.1);
        assert!(vb.contains(center));
        assert!(!vb.contains(Coordinates::new(10.5, 50.0)));
    }
}
