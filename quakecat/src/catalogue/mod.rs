//! The earthquake catalogue container and its filtering operations.
//!
//! A [`Catalogue`] holds one event per row in five parallel columns: origin
//! time `t`, horizontal location `x`/`y`, depth `z` and magnitude `m`. Any
//! column may be absent, but all present columns always have the same
//! length, and every operation preserves row identity across them: row `k`
//! of a decimated catalogue holds the values that shared one row in the
//! source.
//!
//! The container also tracks which [`CoordinateSystem`] its `x`/`y` columns
//! are currently expressed in. The tag is authoritative: operations that
//! consume coordinates convert between the systems themselves instead of
//! trusting the caller to keep the polygon and the catalogue aligned.

mod csv;

pub use self::csv::{ColumnIndices, CsvOptions};

use serde::{Deserialize, Serialize};

use crate::cartesian::{Point2d, Polygon};
use crate::error::QuakecatError;
use crate::geo::utm::lonlat_to_utm;

/// Which coordinate system a catalogue's `x`/`y` columns are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// `x` is longitude and `y` is latitude, in decimal degrees (WGS84).
    Geographic,
    /// `x` is easting and `y` is northing, in meters (UTM).
    Projected,
}

/// Columnar input for [`Catalogue::from_columns`]. Absent columns stay
/// absent in the constructed catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    /// Event times.
    pub t: Option<Vec<f64>>,
    /// Horizontal locations, first coordinate.
    pub x: Option<Vec<f64>>,
    /// Horizontal locations, second coordinate.
    pub y: Option<Vec<f64>>,
    /// Depths.
    pub z: Option<Vec<f64>>,
    /// Magnitudes.
    pub m: Option<Vec<f64>>,
}

/// Row subset selector for [`Catalogue::decimate`].
#[derive(Debug, Clone, Copy)]
pub enum Selector<'a> {
    /// Keep the rows at these indices, in this order. Indices may repeat.
    Indices(&'a [usize]),
    /// Keep the rows marked `true`. The mask length must equal the catalogue
    /// length.
    Mask(&'a [bool]),
}

impl Selector<'_> {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, QuakecatError> {
        match self {
            Selector::Indices(indices) => {
                for &index in *indices {
                    if index >= len {
                        return Err(QuakecatError::IndexOutOfRange { index, len });
                    }
                }
                Ok(indices.to_vec())
            }
            Selector::Mask(mask) => {
                if mask.len() != len {
                    return Err(QuakecatError::IndexOutOfRange {
                        index: mask.len(),
                        len,
                    });
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(index, &keep)| keep.then_some(index))
                    .collect())
            }
        }
    }
}

impl<'a> From<&'a [usize]> for Selector<'a> {
    fn from(indices: &'a [usize]) -> Self {
        Selector::Indices(indices)
    }
}

impl<'a> From<&'a [bool]> for Selector<'a> {
    fn from(mask: &'a [bool]) -> Self {
        Selector::Mask(mask)
    }
}

/// An ordered collection of point-located, time-stamped events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    t: Option<Vec<f64>>,
    x: Option<Vec<f64>>,
    y: Option<Vec<f64>>,
    z: Option<Vec<f64>>,
    m: Option<Vec<f64>>,
    coordinate_system: CoordinateSystem,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        CoordinateSystem::Geographic
    }
}

impl Catalogue {
    /// Creates an empty catalogue with geographic coordinates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalogue from explicit columns.
    ///
    /// All present columns must have the same length; a mismatch fails with
    /// [`QuakecatError::MalformedInput`]. Columns of any length, including 0
    /// and 1, are stored uniformly.
    pub fn from_columns(
        columns: Columns,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self, QuakecatError> {
        let catalogue = Self {
            t: columns.t,
            x: columns.x,
            y: columns.y,
            z: columns.z,
            m: columns.m,
            coordinate_system,
        };
        catalogue.check_column_lengths()?;

        Ok(catalogue)
    }

    fn check_column_lengths(&self) -> Result<(), QuakecatError> {
        let mut expected: Option<(&'static str, usize)> = None;
        for (name, column) in self.columns() {
            let Some(column) = column else { continue };
            match expected {
                None => expected = Some((name, column.len())),
                Some((first, len)) if column.len() != len => {
                    return Err(QuakecatError::MalformedInput {
                        message: format!(
                            "column lengths differ: {first} has {len} values, {name} has {}",
                            column.len()
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    fn columns(&self) -> [(&'static str, Option<&Vec<f64>>); 5] {
        [
            ("t", self.t.as_ref()),
            ("x", self.x.as_ref()),
            ("y", self.y.as_ref()),
            ("z", self.z.as_ref()),
            ("m", self.m.as_ref()),
        ]
    }

    /// Number of events in the catalogue.
    pub fn len(&self) -> usize {
        self.columns()
            .iter()
            .find_map(|(_, column)| column.map(Vec::len))
            .unwrap_or(0)
    }

    /// Returns true if the catalogue contains no events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate system the `x`/`y` columns are currently expressed in.
    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    /// Event times, if present.
    pub fn t(&self) -> Option<&[f64]> {
        self.t.as_deref()
    }

    /// First horizontal coordinates (longitude or easting), if present.
    pub fn x(&self) -> Option<&[f64]> {
        self.x.as_deref()
    }

    /// Second horizontal coordinates (latitude or northing), if present.
    pub fn y(&self) -> Option<&[f64]> {
        self.y.as_deref()
    }

    /// Depths, if present.
    pub fn z(&self) -> Option<&[f64]> {
        self.z.as_deref()
    }

    /// Magnitudes, if present.
    pub fn m(&self) -> Option<&[f64]> {
        self.m.as_deref()
    }

    fn coordinate_columns(&self) -> Result<(&[f64], &[f64]), QuakecatError> {
        match (self.x.as_deref(), self.y.as_deref()) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(QuakecatError::MalformedInput {
                message: "catalogue has no x/y coordinate columns".to_string(),
            }),
        }
    }

    /// Returns a new catalogue containing the selected rows, in selector
    /// order. The coordinate system is copied unchanged and `self` is not
    /// modified.
    ///
    /// An index beyond the catalogue length, or a mask whose length does not
    /// match it, fails with [`QuakecatError::IndexOutOfRange`]. An empty
    /// selector yields a valid empty catalogue.
    pub fn decimate(&self, selector: Selector<'_>) -> Result<Catalogue, QuakecatError> {
        let picked = selector.resolve(self.len())?;
        let take = |column: &Option<Vec<f64>>| {
            column
                .as_ref()
                .map(|values| picked.iter().map(|&index| values[index]).collect())
        };

        Ok(Catalogue {
            t: take(&self.t),
            x: take(&self.x),
            y: take(&self.y),
            z: take(&self.z),
            m: take(&self.m),
            coordinate_system: self.coordinate_system,
        })
    }

    /// Same as [`Catalogue::decimate`], but replaces the contents of `self`.
    ///
    /// The subset is built first and swapped in only on success, so a failed
    /// call leaves the catalogue untouched.
    pub fn decimate_in_place(&mut self, selector: Selector<'_>) -> Result<(), QuakecatError> {
        *self = self.decimate(selector)?;
        Ok(())
    }

    /// Tests every event against a polygon, returning one boolean per event
    /// (`true` for events inside the polygon or on its boundary).
    ///
    /// `vertices` is the polygon's ring of at least 3 `(x, y)` pairs,
    /// implicitly closed, expressed in `vertex_system` coordinates. The
    /// vertices and the catalogue coordinates are both normalized to the
    /// projected plane before testing, so the two may use different systems;
    /// the catalogue itself is not modified.
    pub fn in_polygon(
        &self,
        vertices: &[(f64, f64)],
        vertex_system: CoordinateSystem,
    ) -> Result<Vec<bool>, QuakecatError> {
        if vertices.len() < 3 {
            return Err(QuakecatError::InvalidPolygon {
                vertices: vertices.len(),
            });
        }
        let (x, y) = self.coordinate_columns()?;

        let ring = match vertex_system {
            CoordinateSystem::Projected => vertices
                .iter()
                .map(|&(x, y)| Point2d::new(x, y))
                .collect::<Vec<_>>(),
            CoordinateSystem::Geographic => {
                let lons: Vec<f64> = vertices.iter().map(|&(lon, _)| lon).collect();
                let lats: Vec<f64> = vertices.iter().map(|&(_, lat)| lat).collect();
                let (eastings, northings) = lonlat_to_utm(&lons, &lats)?;
                eastings
                    .into_iter()
                    .zip(northings)
                    .map(|(e, n)| Point2d::new(e, n))
                    .collect()
            }
        };
        let polygon = Polygon::new(ring)?;

        let is_inside = match self.coordinate_system {
            CoordinateSystem::Projected => x
                .iter()
                .zip(y)
                .map(|(&x, &y)| polygon.contains_point(&Point2d::new(x, y)))
                .collect(),
            CoordinateSystem::Geographic => {
                let (eastings, northings) = lonlat_to_utm(x, y)?;
                eastings
                    .iter()
                    .zip(&northings)
                    .map(|(&e, &n)| polygon.contains_point(&Point2d::new(e, n)))
                    .collect()
            }
        };

        Ok(is_inside)
    }

    /// Converts a geographic catalogue's coordinates to UTM in place and
    /// retags it [`CoordinateSystem::Projected`]. Does nothing if the
    /// catalogue is already projected.
    ///
    /// The converted columns are built first and swapped in only on success.
    pub fn project_to_utm(&mut self) -> Result<(), QuakecatError> {
        if self.coordinate_system == CoordinateSystem::Projected {
            return Ok(());
        }

        if let (Some(x), Some(y)) = (self.x.as_deref(), self.y.as_deref()) {
            let (eastings, northings) = lonlat_to_utm(x, y)?;
            self.x = Some(eastings);
            self.y = Some(northings);
        }
        self.coordinate_system = CoordinateSystem::Projected;

        Ok(())
    }

    pub(crate) fn replace_columns(
        &mut self,
        columns: Columns,
        coordinate_system: CoordinateSystem,
    ) {
        self.t = columns.t;
        self.x = columns.x;
        self.y = columns.y;
        self.z = columns.z;
        self.m = columns.m;
        self.coordinate_system = coordinate_system;
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn projected_catalogue() -> Catalogue {
        Catalogue::from_columns(
            Columns {
                t: Some(vec![1.0, 2.0, 3.0, 4.0]),
                x: Some(vec![5.0, 15.0, 0.0, 7.0]),
                y: Some(vec![5.0, 15.0, 5.0, 3.0]),
                z: Some(vec![10.0, 12.0, 8.0, 6.0]),
                m: Some(vec![3.1, 4.2, 2.4, 5.0]),
            },
            CoordinateSystem::Projected,
        )
        .expect("valid columns")
    }

    #[test]
    fn empty_catalogue_is_valid() {
        let catalogue = Catalogue::new();
        assert_eq!(catalogue.len(), 0);
        assert!(catalogue.is_empty());
        assert_eq!(catalogue.coordinate_system(), CoordinateSystem::Geographic);
    }

    #[test]
    fn from_columns_rejects_mismatched_lengths() {
        let result = Catalogue::from_columns(
            Columns {
                t: Some(vec![1.0, 2.0, 3.0]),
                m: Some(vec![3.1, 4.2]),
                ..Default::default()
            },
            CoordinateSystem::Projected,
        );
        assert_matches!(result, Err(QuakecatError::MalformedInput { .. }));
    }

    #[test]
    fn from_columns_keeps_absent_columns_absent() {
        let catalogue = Catalogue::from_columns(
            Columns {
                x: Some(vec![1.0]),
                y: Some(vec![2.0]),
                ..Default::default()
            },
            CoordinateSystem::Projected,
        )
        .expect("valid columns");

        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.x(), Some(&[1.0][..]));
        assert!(catalogue.t().is_none());
        assert!(catalogue.z().is_none());
        assert!(catalogue.m().is_none());
    }

    #[test]
    fn decimate_preserves_row_identity() {
        let catalogue = projected_catalogue();
        let indices = [2usize, 0];

        let subset = catalogue
            .decimate(Selector::Indices(&indices))
            .expect("valid selector");

        assert_eq!(subset.len(), 2);
        for (original, decimated) in catalogue.columns().iter().zip(subset.columns()) {
            let original = original.1.expect("column present");
            let decimated = decimated.1.expect("column present");
            for (k, &index) in indices.iter().enumerate() {
                assert_eq!(decimated[k], original[index]);
            }
        }
        assert_eq!(subset.coordinate_system(), catalogue.coordinate_system());
    }

    #[test]
    fn decimate_all_is_identity() {
        let catalogue = projected_catalogue();
        let all: Vec<usize> = (0..catalogue.len()).collect();

        let subset = catalogue
            .decimate(Selector::Indices(&all))
            .expect("valid selector");
        assert_eq!(subset, catalogue);
    }

    #[test]
    fn decimate_with_empty_selector() {
        let subset = projected_catalogue()
            .decimate(Selector::Indices(&[]))
            .expect("empty selector is valid");
        assert_eq!(subset.len(), 0);
        assert!(subset.t().is_some());
    }

    #[test]
    fn decimate_rejects_out_of_range_index() {
        let catalogue = Catalogue::from_columns(
            Columns {
                t: Some(vec![1.0, 2.0, 3.0]),
                x: Some(vec![1.0, 2.0, 3.0]),
                y: Some(vec![1.0, 2.0, 3.0]),
                z: Some(vec![1.0, 2.0, 3.0]),
                m: Some(vec![1.0, 2.0, 3.0]),
            },
            CoordinateSystem::Projected,
        )
        .expect("valid columns");

        assert_matches!(
            catalogue.decimate(Selector::Indices(&[0, 1, 5])),
            Err(QuakecatError::IndexOutOfRange { index: 5, len: 3 })
        );
    }

    #[test]
    fn decimate_rejects_mismatched_mask() {
        let catalogue = projected_catalogue();
        assert_matches!(
            catalogue.decimate(Selector::Mask(&[true, false])),
            Err(QuakecatError::IndexOutOfRange { index: 2, len: 4 })
        );
    }

    #[test]
    fn decimate_by_mask() {
        let catalogue = projected_catalogue();
        let mask = [true, false, false, true];

        let subset = catalogue
            .decimate(Selector::Mask(&mask))
            .expect("valid mask");
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.t(), Some(&[1.0, 4.0][..]));
        assert_eq!(subset.m(), Some(&[3.1, 5.0][..]));
    }

    #[test]
    fn decimate_in_place() {
        let mut catalogue = projected_catalogue();
        catalogue
            .decimate_in_place(Selector::Indices(&[3]))
            .expect("valid selector");

        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.t(), Some(&[4.0][..]));
    }

    #[test]
    fn failed_decimate_in_place_leaves_catalogue_unchanged() {
        let mut catalogue = projected_catalogue();
        let before = catalogue.clone();

        let result = catalogue.decimate_in_place(Selector::Indices(&[10]));
        assert_matches!(result, Err(QuakecatError::IndexOutOfRange { .. }));
        assert_eq!(catalogue, before);
    }

    #[test]
    fn in_polygon_with_planar_square() {
        // Events at (5, 5) inside, (15, 15) outside, (0, 5) on the boundary,
        // (7, 3) inside.
        let catalogue = projected_catalogue();
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];

        let is_inside = catalogue
            .in_polygon(&square, CoordinateSystem::Projected)
            .expect("valid polygon");
        assert_eq!(is_inside, vec![true, false, true, true]);
    }

    #[test]
    fn in_polygon_output_length_matches_catalogue() {
        let catalogue = projected_catalogue();
        let triangle = [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)];

        let is_inside = catalogue
            .in_polygon(&triangle, CoordinateSystem::Projected)
            .expect("valid polygon");
        assert_eq!(is_inside.len(), catalogue.len());
    }

    #[test]
    fn in_polygon_rejects_degenerate_polygon() {
        let catalogue = projected_catalogue();
        assert_matches!(
            catalogue.in_polygon(&[(0.0, 0.0), (1.0, 1.0)], CoordinateSystem::Projected),
            Err(QuakecatError::InvalidPolygon { vertices: 2 })
        );
    }

    #[test]
    fn in_polygon_requires_coordinate_columns() {
        let catalogue = Catalogue::from_columns(
            Columns {
                t: Some(vec![1.0, 2.0]),
                ..Default::default()
            },
            CoordinateSystem::Projected,
        )
        .expect("valid columns");

        assert_matches!(
            catalogue.in_polygon(
                &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
                CoordinateSystem::Projected
            ),
            Err(QuakecatError::MalformedInput { .. })
        );
    }

    #[test]
    fn in_polygon_reconciles_coordinate_systems() {
        // Geographic catalogue, geographic polygon: one event inside the
        // ring, one well outside.
        let catalogue = Catalogue::from_columns(
            Columns {
                x: Some(vec![-122.4194, -120.0]),
                y: Some(vec![37.7749, 35.0]),
                ..Default::default()
            },
            CoordinateSystem::Geographic,
        )
        .expect("valid columns");

        let ring = [(-123.0, 37.0), (-122.0, 37.0), (-122.0, 38.5), (-123.0, 38.5)];
        let is_inside = catalogue
            .in_polygon(&ring, CoordinateSystem::Geographic)
            .expect("valid polygon");
        assert_eq!(is_inside, vec![true, false]);
    }

    #[test]
    fn project_to_utm_updates_tag_and_coordinates() {
        let mut catalogue = Catalogue::from_columns(
            Columns {
                x: Some(vec![-122.4194]),
                y: Some(vec![37.7749]),
                ..Default::default()
            },
            CoordinateSystem::Geographic,
        )
        .expect("valid columns");

        catalogue.project_to_utm().expect("projection succeeds");
        assert_eq!(catalogue.coordinate_system(), CoordinateSystem::Projected);
        let x = catalogue.x().expect("column present");
        assert!(x[0] > 500_000.0 && x[0] < 600_000.0);

        // Already projected: no-op.
        let before = catalogue.clone();
        catalogue.project_to_utm().expect("no-op succeeds");
        assert_eq!(catalogue, before);
    }
}
