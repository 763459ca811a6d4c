// SPDX-License-Identifier: MIT

//! Bounding box and center of decoded routes, for map framing.
//!
//! Callers flatten every activity's coordinates into one slice and call
//! these once, rather than once per activity.

use crate::models::{BoundingBox, Coordinate};
use geo::{BoundingRect, Centroid, MultiPoint, Point};

fn to_multi_point(coords: &[Coordinate]) -> MultiPoint<f64> {
    coords
        .iter()
        .map(|c| Point::new(c.lng, c.lat))
        .collect::<Vec<_>>()
        .into()
}

/// Arithmetic mean of latitudes and longitudes. `None` for no points.
pub fn centroid(coords: &[Coordinate]) -> Option<Coordinate> {
    if coords.is_empty() {
        return None;
    }
    to_multi_point(coords)
        .centroid()
        .map(|p| Coordinate::new(p.y(), p.x()))
}

/// Smallest box enclosing all points. `None` for no points.
pub fn bounds(coords: &[Coordinate]) -> Option<BoundingBox> {
    let rect = to_multi_point(coords).bounding_rect()?;
    Some(BoundingBox {
        south_west: Coordinate::from(rect.min()),
        north_east: Coordinate::from(rect.max()),
    })
}
