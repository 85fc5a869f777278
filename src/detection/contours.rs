use image::GrayImage;
use imageproc::contours::{self, BorderType};
use imageproc::point::Point;
use tracing::debug;

use crate::models::{BorderKind, BoundingBox, Contour};

/// Find all borders in a binary edge image, keeping the full outer/hole hierarchy.
///
/// Every non-zero pixel is foreground. Contours come back in the order the
/// border following meets their starting pixel, with only the chain vertices
/// retained (see [`approximate_simple`]).
pub fn find_contours(edges: &GrayImage) -> Vec<Contour> {
    contours::find_contours::<i32>(edges)
        .into_iter()
        .map(|c| Contour {
            points: approximate_simple(&c.points),
            kind: match c.border_type {
                BorderType::Outer => BorderKind::Outer,
                BorderType::Hole => BorderKind::Hole,
            },
            parent: c.parent,
        })
        .collect()
}

/// Compress a closed chain of 8-connected points down to the points where
/// the step direction changes. Horizontal, vertical and diagonal runs collapse
/// to their end points.
pub fn approximate_simple(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |from: Point<i32>, to: Point<i32>| ((to.x - from.x).signum(), (to.y - from.y).signum());

    points
        .iter()
        .enumerate()
        .filter(|&(i, &p)| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, p) != step(p, next)
        })
        .map(|(_, &p)| p)
        .collect()
}

/// Bounding boxes of the shapes outlined by the edge map, in contour order.
///
/// A thin closed edge line yields an outer border plus a hole border that
/// retraces its inside. When the parent's box encloses the hole with every side
/// inset by at most `tolerance`, the pair is one outline. Its box is the region
/// the line encloses: the hole's box shrunk by the one pixel of the line itself.
/// Canny places the line just outside a solid shape, so that region is the
/// shape. Genuinely nested holes and open edge chains keep their own box.
pub fn outline_boxes(contours: &[Contour], tolerance: u32) -> Vec<BoundingBox> {
    let boxes: Vec<BoundingBox> = contours.iter().map(Contour::bounding_box).collect();

    let ring_parent = |i: usize| -> Option<usize> {
        let contour = &contours[i];
        if !contour.is_hole() {
            return None;
        }
        contour
            .parent
            .filter(|&parent| parent < boxes.len() && boxes[parent].tightly_encloses(&boxes[i], tolerance))
    };

    let mut interiors: Vec<Option<BoundingBox>> = vec![None; contours.len()];
    for i in 0..contours.len() {
        if let Some(parent) = ring_parent(i) {
            if interiors[parent].is_none() {
                interiors[parent] = boxes[i].inset(1);
            }
        }
    }

    let outlines: Vec<BoundingBox> = (0..contours.len())
        .filter(|&i| ring_parent(i).is_none())
        .map(|i| interiors[i].unwrap_or(boxes[i]))
        .collect();

    debug!(
        contours = contours.len(),
        outlines = outlines.len(),
        "merged edge-ring borders"
    );
    outlines
}
