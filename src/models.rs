use image::DynamicImage;
use imageproc::point::Point;

/// Axis-aligned box in original image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// The box shrunk by `px` on every side, or None if nothing is left
    pub fn inset(&self, px: u32) -> Option<BoundingBox> {
        if self.width <= 2 * px || self.height <= 2 * px {
            return None;
        }
        Some(BoundingBox::new(self.x + px, self.y + px, self.width - 2 * px, self.height - 2 * px))
    }

    /// True when `inner` lies inside this box and no side is inset by more than `tolerance`
    pub fn tightly_encloses(&self, inner: &BoundingBox, tolerance: u32) -> bool {
        if inner.x < self.x
            || inner.y < self.y
            || inner.right() > self.right()
            || inner.bottom() > self.bottom()
        {
            return false;
        }

        inner.x - self.x <= tolerance
            && inner.y - self.y <= tolerance
            && self.right() - inner.right() <= tolerance
            && self.bottom() - inner.bottom() <= tolerance
    }
}

/// Which side of a foreground region a border traces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

/// A traced border from the edge map, with its place in the contour hierarchy
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
    pub kind: BorderKind,
    pub parent: Option<usize>,
}

impl Contour {
    pub fn bounding_box(&self) -> BoundingBox {
        let Some(first) = self.points.first() else {
            return BoundingBox::new(0, 0, 0, 0);
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        BoundingBox {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x + 1).max(0) as u32,
            height: (max_y - min_y + 1).max(0) as u32,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.bounding_box().aspect_ratio()
    }

    pub fn is_hole(&self) -> bool {
        self.kind == BorderKind::Hole
    }
}

/// Crop `bbox` out of `img`, clamped to the image bounds.
/// Returns None when nothing of the box lies inside the image.
pub fn extract_roi(img: &DynamicImage, bbox: &BoundingBox) -> Option<DynamicImage> {
    if bbox.x >= img.width() || bbox.y >= img.height() {
        return None;
    }

    let width = bbox.width.min(img.width() - bbox.x);
    let height = bbox.height.min(img.height() - bbox.y);

    if width == 0 || height == 0 {
        return None;
    }

    Some(img.crop_imm(bbox.x, bbox.y, width, height))
}

/// A rectangular crop of the source image that may contain a plate
#[derive(Debug, Clone)]
pub struct CandidateRegion {
    pub bbox: BoundingBox,
    pub image: DynamicImage,
}

/// A candidate region paired with its recognized text (possibly empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateReading {
    pub bbox: BoundingBox,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(points: &[(i32, i32)]) -> Contour {
        Contour {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            kind: BorderKind::Outer,
            parent: None,
        }
    }

    #[test]
    fn bounding_box_is_inclusive_of_both_ends() {
        let c = contour(&[(10, 5), (129, 5), (129, 44), (10, 44)]);
        assert_eq!(c.bounding_box(), BoundingBox::new(10, 5, 120, 40));
        assert_eq!(c.aspect_ratio(), 3.0);
    }

    #[test]
    fn single_point_contour_is_one_pixel() {
        let c = contour(&[(3, 4)]);
        assert_eq!(c.bounding_box(), BoundingBox::new(3, 4, 1, 1));
    }

    #[test]
    fn zero_height_box_has_no_aspect_ratio() {
        assert_eq!(BoundingBox::new(0, 0, 10, 0).aspect_ratio(), 0.0);
    }

    #[test]
    fn tight_enclosure_respects_tolerance() {
        let outer = BoundingBox::new(99, 99, 122, 42);
        assert!(outer.tightly_encloses(&BoundingBox::new(101, 101, 118, 38), 3));
        assert!(!outer.tightly_encloses(&BoundingBox::new(110, 101, 100, 38), 3));
        assert!(!outer.tightly_encloses(&BoundingBox::new(98, 101, 118, 38), 3));
    }

    #[test]
    fn inset_shrinks_every_side() {
        let ring = BoundingBox::new(199, 149, 182, 32);
        assert_eq!(ring.inset(1), Some(BoundingBox::new(200, 150, 180, 30)));
        assert_eq!(BoundingBox::new(0, 0, 2, 10).inset(1), None);
    }

    #[test]
    fn roi_is_clamped_to_image() {
        let img = DynamicImage::new_rgb8(50, 40);
        let roi = extract_roi(&img, &BoundingBox::new(40, 30, 20, 20)).unwrap();
        assert_eq!((roi.width(), roi.height()), (10, 10));
        assert!(extract_roi(&img, &BoundingBox::new(50, 0, 5, 5)).is_none());
        assert!(extract_roi(&img, &BoundingBox::new(0, 0, 0, 5)).is_none());
    }
}
