//! Types and functions on geometries in planar cartesian coordinates.

mod orient;
mod point;
mod polygon;
mod segment;

pub use orient::Orientation;
pub use point::{CartesianPoint2d, Point2d};
pub use polygon::Polygon;
pub use segment::Segment;
