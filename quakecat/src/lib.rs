//! Earthquake catalogue container with geometric filtering.
//!
//! The crate is built around the [`Catalogue`](catalogue::Catalogue) type: a
//! columnar container holding one time/location/depth/magnitude row per
//! event. A catalogue can be filtered by arbitrary polygon regions
//! ([`Catalogue::in_polygon`](catalogue::Catalogue::in_polygon)) and subset
//! by index list or boolean mask
//! ([`Catalogue::decimate`](catalogue::Catalogue::decimate)).
//!
//! Coordinates are either geographic (longitude/latitude in decimal degrees,
//! WGS84) or planar (UTM easting/northing in meters). The [`geo::utm`]
//! module converts between the two, selecting the UTM zone independently for
//! every point. Which representation a catalogue currently uses is tracked
//! by its [`CoordinateSystem`](catalogue::CoordinateSystem) tag, and every
//! operation that consumes coordinates reconciles the two systems
//! automatically, so a polygon drawn in geographic coordinates can be tested
//! against a projected catalogue directly.
//!
//! ```no_run
//! use quakecat::catalogue::{Catalogue, CoordinateSystem, CsvOptions, Selector};
//!
//! # fn main() -> Result<(), quakecat::error::QuakecatError> {
//! let catalogue = Catalogue::from_csv_path("catalogue.csv", &CsvOptions::default())?;
//! let region = [(-123.0, 37.0), (-121.0, 37.0), (-121.0, 38.5), (-123.0, 38.5)];
//! let inside = catalogue.in_polygon(&region, CoordinateSystem::Geographic)?;
//! let subset = catalogue.decimate(Selector::Mask(&inside))?;
//! # Ok(())
//! # }
//! ```

pub mod cartesian;
pub mod catalogue;
pub mod error;
pub mod geo;

pub use catalogue::{Catalogue, Columns, CoordinateSystem, CsvOptions, Selector};
pub use error::QuakecatError;
