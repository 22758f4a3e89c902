//! Types and functions on geographic (longitude/latitude) coordinates.

mod point;
pub mod utm;

pub use point::{GeoPoint, GeoPoint2d};
