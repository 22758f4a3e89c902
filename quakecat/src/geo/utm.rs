//! Conversion between geographic coordinates (WGS84 decimal degrees) and UTM
//! easting/northing in meters.
//!
//! The UTM zone is always selected independently for every point, so inputs
//! spanning several zones are converted without error. Points in different
//! zones end up in different planar reference frames; [`lonlat_to_utm`] logs
//! a warning when that happens so distorted inter-zone distances do not go
//! unnoticed.

use std::collections::HashMap;

use geodesy::prelude::*;

use crate::cartesian::Point2d;
use crate::error::QuakecatError;
use crate::geo::{GeoPoint, GeoPoint2d};

/// False northing applied to southern-hemisphere coordinates, in meters.
const SOUTHERN_FALSE_NORTHING: f64 = 10_000_000.0;

/// A UTM zone, identified by its number and hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtmZone {
    number: u8,
    southern: bool,
}

impl UtmZone {
    /// Selects the UTM zone containing the given geographic coordinate.
    ///
    /// Applies the standard zone exceptions for southern Norway (zone 32)
    /// and Svalbard (zones 31/33/35/37). Coordinates outside the UTM domain
    /// (latitude in [-80, 84], longitude in [-180, 180)) fail with
    /// [`QuakecatError::InvalidCoordinate`].
    pub fn for_lonlat(lon: f64, lat: f64) -> Result<Self, QuakecatError> {
        validate_lonlat(lon, lat)?;

        Ok(Self {
            number: zone_number(lon, lat),
            southern: lat < 0.0,
        })
    }

    /// Zone number, 1 through 60.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Whether the zone lies in the southern hemisphere.
    pub fn is_southern(&self) -> bool {
        self.southern
    }
}

fn validate_lonlat(lon: f64, lat: f64) -> Result<(), QuakecatError> {
    if !lon.is_finite()
        || !lat.is_finite()
        || !(-80.0..=84.0).contains(&lat)
        || !(-180.0..180.0).contains(&lon)
    {
        return Err(QuakecatError::InvalidCoordinate { lon, lat });
    }

    Ok(())
}

fn zone_number(lon: f64, lat: f64) -> u8 {
    // Southern Norway exception.
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }

    // Svalbard exceptions.
    if (72.0..=84.0).contains(&lat) {
        if (0.0..9.0).contains(&lon) {
            return 31;
        } else if (9.0..21.0).contains(&lon) {
            return 33;
        } else if (21.0..33.0).contains(&lon) {
            return 35;
        } else if (33.0..42.0).contains(&lon) {
            return 37;
        }
    }

    (((lon + 180.0) / 6.0) as u8 + 1).min(60)
}

/// Transverse-Mercator projection for a single UTM zone.
pub struct UtmProjection {
    zone: UtmZone,
    context: Minimal,
    op: OpHandle,
}

impl UtmProjection {
    /// Creates a projection operator for the given zone.
    pub fn new(zone: UtmZone) -> Result<Self, QuakecatError> {
        let mut context = Minimal::new();
        let definition = format!("utm zone={}", zone.number());
        let op = context
            .op(&definition)
            .map_err(|e| QuakecatError::Projection(e.to_string()))?;

        Ok(Self { zone, context, op })
    }

    /// The zone this operator projects into.
    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    /// Projects a geographic point into this zone's easting/northing plane.
    ///
    /// The point is projected with this operator's zone even if it lies in a
    /// different one; use [`lonlat_to_utm`] for per-point zone selection.
    pub fn project(&self, point: &impl GeoPoint<Num = f64>) -> Result<Point2d, QuakecatError> {
        validate_lonlat(point.lon(), point.lat())?;

        let mut data = [Coor2D::geo(point.lat(), point.lon())];
        self.context
            .apply(self.op, Fwd, &mut data)
            .map_err(|e| QuakecatError::Projection(e.to_string()))?;

        let easting = data[0].0[0];
        let mut northing = data[0].0[1];
        if !easting.is_finite() || !northing.is_finite() {
            return Err(QuakecatError::InvalidCoordinate {
                lon: point.lon(),
                lat: point.lat(),
            });
        }

        if self.zone.is_southern() {
            northing += SOUTHERN_FALSE_NORTHING;
        }

        Ok(Point2d::new(easting, northing))
    }

    /// Inverse projection: easting/northing in this zone back to geographic
    /// coordinates.
    pub fn unproject(&self, easting: f64, northing: f64) -> Result<GeoPoint2d, QuakecatError> {
        let northing = if self.zone.is_southern() {
            northing - SOUTHERN_FALSE_NORTHING
        } else {
            northing
        };

        let mut data = [Coor2D([easting, northing])];
        self.context
            .apply(self.op, Inv, &mut data)
            .map_err(|e| QuakecatError::Projection(e.to_string()))?;

        Ok(GeoPoint2d::latlon(
            data[0].0[1].to_degrees(),
            data[0].0[0].to_degrees(),
        ))
    }
}

/// Bulk conversion of longitudes/latitudes to UTM easting/northing.
///
/// The zone is selected independently for every point. Input order is
/// preserved; empty inputs yield empty outputs. Inputs of different lengths
/// fail with [`QuakecatError::MalformedInput`], coordinates outside the UTM
/// domain with [`QuakecatError::InvalidCoordinate`].
pub fn lonlat_to_utm(lons: &[f64], lats: &[f64]) -> Result<(Vec<f64>, Vec<f64>), QuakecatError> {
    if lons.len() != lats.len() {
        return Err(QuakecatError::MalformedInput {
            message: format!(
                "longitude and latitude counts differ: {} vs {}",
                lons.len(),
                lats.len()
            ),
        });
    }

    let mut eastings = Vec::with_capacity(lons.len());
    let mut northings = Vec::with_capacity(lats.len());
    let mut projections: HashMap<UtmZone, UtmProjection> = HashMap::new();

    for (&lon, &lat) in lons.iter().zip(lats) {
        let zone = UtmZone::for_lonlat(lon, lat)?;
        let projection = match projections.entry(zone) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(UtmProjection::new(zone)?)
            }
        };

        let point = projection.project(&GeoPoint2d::lonlat(lon, lat))?;
        eastings.push(point.x());
        northings.push(point.y());
    }

    if projections.len() > 1 {
        log::warn!(
            "input spans {} UTM zones; eastings/northings are not in a common reference frame",
            projections.len()
        );
    }

    Ok((eastings, northings))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn zone_selection() {
        // San Francisco.
        let zone = UtmZone::for_lonlat(-122.4194, 37.7749).expect("valid coordinate");
        assert_eq!(zone.number(), 10);
        assert!(!zone.is_southern());

        // Sydney.
        let zone = UtmZone::for_lonlat(151.2093, -33.8688).expect("valid coordinate");
        assert_eq!(zone.number(), 56);
        assert!(zone.is_southern());

        // Bergen falls in the widened zone 32, not the standard zone 31.
        let zone = UtmZone::for_lonlat(5.32, 60.39).expect("valid coordinate");
        assert_eq!(zone.number(), 32);

        // Svalbard skips the even zone numbers.
        let zone = UtmZone::for_lonlat(21.5, 78.0).expect("valid coordinate");
        assert_eq!(zone.number(), 35);
    }

    #[test]
    fn rejects_out_of_domain_coordinates() {
        assert_matches!(
            UtmZone::for_lonlat(0.0, 85.0),
            Err(QuakecatError::InvalidCoordinate { .. })
        );
        assert_matches!(
            UtmZone::for_lonlat(0.0, -80.5),
            Err(QuakecatError::InvalidCoordinate { .. })
        );
        assert_matches!(
            UtmZone::for_lonlat(180.0, 0.0),
            Err(QuakecatError::InvalidCoordinate { .. })
        );
        assert_matches!(
            UtmZone::for_lonlat(f64::NAN, 0.0),
            Err(QuakecatError::InvalidCoordinate { .. })
        );
    }

    #[test]
    fn projects_into_plausible_range() {
        let (eastings, northings) =
            lonlat_to_utm(&[-122.4194], &[37.7749]).expect("projection succeeds");

        // Zone 10 north: a bit east of the central meridian, ~4200 km from
        // the equator.
        assert!(eastings[0] > 500_000.0 && eastings[0] < 600_000.0);
        assert!(northings[0] > 4_000_000.0 && northings[0] < 4_300_000.0);
    }

    #[test]
    fn round_trip_northern_hemisphere() {
        let (lon, lat) = (-122.4194, 37.7749);
        let zone = UtmZone::for_lonlat(lon, lat).expect("valid coordinate");
        let projection = UtmProjection::new(zone).expect("operator");

        let projected = projection
            .project(&GeoPoint2d::lonlat(lon, lat))
            .expect("projection succeeds");
        let restored = projection
            .unproject(projected.x(), projected.y())
            .expect("inverse succeeds");

        assert_abs_diff_eq!(restored.lon(), lon, epsilon = 1e-6);
        assert_abs_diff_eq!(restored.lat(), lat, epsilon = 1e-6);
    }

    #[test]
    fn round_trip_southern_hemisphere() {
        let (lon, lat) = (151.2093, -33.8688);
        let zone = UtmZone::for_lonlat(lon, lat).expect("valid coordinate");
        let projection = UtmProjection::new(zone).expect("operator");

        let projected = projection
            .project(&GeoPoint2d::lonlat(lon, lat))
            .expect("projection succeeds");

        // The false northing keeps southern coordinates positive.
        assert!(projected.y() > 6_000_000.0 && projected.y() < 7_000_000.0);

        let restored = projection
            .unproject(projected.x(), projected.y())
            .expect("inverse succeeds");
        assert_abs_diff_eq!(restored.lon(), lon, epsilon = 1e-6);
        assert_abs_diff_eq!(restored.lat(), lat, epsilon = 1e-6);
    }

    #[test]
    fn bulk_conversion_preserves_length_and_order() {
        let lons = [-122.4194, -122.0, -121.5];
        let lats = [37.7749, 37.5, 37.0];

        let (eastings, northings) = lonlat_to_utm(&lons, &lats).expect("projection succeeds");
        assert_eq!(eastings.len(), 3);
        assert_eq!(northings.len(), 3);

        // Eastward input points must produce increasing eastings within one
        // zone.
        assert!(eastings[0] < eastings[1] && eastings[1] < eastings[2]);
    }

    #[test]
    fn bulk_conversion_of_empty_input() {
        let (eastings, northings) = lonlat_to_utm(&[], &[]).expect("empty input is valid");
        assert!(eastings.is_empty());
        assert!(northings.is_empty());
    }

    #[test]
    fn bulk_conversion_rejects_mismatched_lengths() {
        assert_matches!(
            lonlat_to_utm(&[0.0, 1.0], &[0.0]),
            Err(QuakecatError::MalformedInput { .. })
        );
    }
}
