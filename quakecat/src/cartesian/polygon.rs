use num_traits::Zero;

use crate::cartesian::{CartesianPoint2d, Point2d, Segment};
use crate::error::QuakecatError;

/// A closed planar region bounded by a ring of vertices.
///
/// The ring is implicitly closed: the last vertex connects back to the first,
/// so the first vertex must not be repeated at the end. At least 3 vertices
/// are required.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<P> {
    vertices: Vec<P>,
}

impl<P: CartesianPoint2d> Polygon<P> {
    /// Creates a new polygon from an ordered ring of vertices.
    ///
    /// Returns [`QuakecatError::InvalidPolygon`] if fewer than 3 vertices are
    /// given.
    pub fn new(vertices: Vec<P>) -> Result<Self, QuakecatError> {
        if vertices.len() < 3 {
            return Err(QuakecatError::InvalidPolygon {
                vertices: vertices.len(),
            });
        }

        Ok(Self { vertices })
    }

    /// Vertices of the polygon's ring, without the closing vertex.
    pub fn vertices(&self) -> &[P] {
        &self.vertices
    }

    /// Iterates over the sides of the polygon, including the closing segment
    /// between the last and the first vertices.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, P>> {
        let closing = match (self.vertices.last(), self.vertices.first()) {
            (Some(last), Some(first)) => Some(Segment(last, first)),
            _ => None,
        };

        self.vertices
            .windows(2)
            .map(|pair| Segment(&pair[0], &pair[1]))
            .chain(closing)
    }

    /// Returns true if the `point` lies inside the polygon or on one of its
    /// sides.
    ///
    /// Interior membership is decided by the winding number of the ring
    /// around the point; boundary points are checked explicitly against each
    /// side, so the test is inclusive regardless of the ring's winding
    /// direction.
    pub fn contains_point<Point>(&self, point: &Point) -> bool
    where
        Point: CartesianPoint2d<Num = P::Num>,
    {
        if self
            .iter_segments()
            .any(|segment| segment.distance_to_point_sq(point) == P::Num::zero())
        {
            return true;
        }

        let mut wn = 0i64;
        let x = point.x();
        let y = point.y();

        for segment in self.iter_segments() {
            if segment.0.x() < x && segment.1.x() < x {
                continue;
            }

            let is_to_right = segment.0.x() > x && segment.1.x() > x || {
                let x_max = if segment.0.x() > segment.1.x() {
                    segment.0.x()
                } else {
                    segment.1.x()
                };
                let ray_p1 = Point2d::new(x, y);
                let ray_p2 = Point2d::new(x_max, y);
                let ray = Segment(&ray_p1, &ray_p2);

                segment.intersects(&ray)
            };

            if is_to_right {
                if segment.0.y() < y && segment.1.y() >= y {
                    wn += 1;
                } else if segment.0.y() > y && segment.1.y() <= y {
                    wn -= 1;
                }
            }
        }

        wn != 0
    }
}
