//! Local planar metric projection.
//!
//! All analysis stages work in a local azimuthal equirectangular
//! projection centered on the target point: `x` is meters east of the
//! target, `y` is meters north. Over analysis radii of at most 5 km the
//! distortion against a true UTM projection is negligible for the
//! distance and area thresholds used here, and the projection is exactly
//! invertible, which the elevation stage relies on for its round trip
//! back to geographic coordinates.

use geo::{Coord, MapCoords, MultiPolygon, Point, Polygon};

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// An invertible geographic <-> local-metric projection centered on the
/// analysis target.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin_lon: f64,
    origin_lat: f64,
    /// Meters per degree of longitude at the origin latitude.
    meters_per_lon_deg: f64,
    /// Meters per degree of latitude.
    meters_per_lat_deg: f64,
}

impl LocalProjection {
    /// Creates a projection centered on `(lat, lon)` in degrees.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        let meters_per_deg = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        Self {
            origin_lon: lon,
            origin_lat: lat,
            meters_per_lon_deg: meters_per_deg * lat.to_radians().cos(),
            meters_per_lat_deg: meters_per_deg,
        }
    }

    /// Projects a geographic coordinate (lon/lat degrees) to local meters.
    #[must_use]
    pub fn to_local(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (coord.x - self.origin_lon) * self.meters_per_lon_deg,
            y: (coord.y - self.origin_lat) * self.meters_per_lat_deg,
        }
    }

    /// Inverse of [`Self::to_local`].
    #[must_use]
    pub fn to_geographic(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.origin_lon + coord.x / self.meters_per_lon_deg,
            y: self.origin_lat + coord.y / self.meters_per_lat_deg,
        }
    }

    /// Projects a point from geographic to local meters.
    #[must_use]
    pub fn point_to_local(&self, point: Point<f64>) -> Point<f64> {
        Point(self.to_local(point.0))
    }

    /// Projects a point from local meters back to geographic.
    #[must_use]
    pub fn point_to_geographic(&self, point: Point<f64>) -> Point<f64> {
        Point(self.to_geographic(point.0))
    }

    /// Projects a polygon from geographic to local meters.
    #[must_use]
    pub fn polygon_to_local(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        polygon.map_coords(|c| self.to_local(c))
    }

    /// Projects a multi-polygon from geographic to local meters.
    #[must_use]
    pub fn multi_polygon_to_local(&self, mp: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        mp.map_coords(|c| self.to_local(c))
    }

    /// Projects a multi-polygon from local meters back to geographic.
    #[must_use]
    pub fn multi_polygon_to_geographic(&self, mp: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        mp.map_coords(|c| self.to_geographic(c))
    }
}
