use crate::config::PlateGeometry;
use crate::models::BoundingBox;

impl PlateGeometry {
    /// Strict bounds check on aspect ratio and area
    pub fn accepts(&self, bbox: &BoundingBox) -> bool {
        let aspect = bbox.aspect_ratio();
        let area = bbox.area();
        self.min_aspect < aspect
            && aspect < self.max_aspect
            && self.min_area < area
            && area < self.max_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_exclusive() {
        let geometry = PlateGeometry::default();
        // ratio exactly 2
        assert!(!geometry.accepts(&BoundingBox::new(0, 0, 60, 30)));
        // ratio exactly 6
        assert!(!geometry.accepts(&BoundingBox::new(0, 0, 120, 20)));
        // area exactly 1000
        assert!(!geometry.accepts(&BoundingBox::new(0, 0, 50, 20)));
        // area exactly 15000
        assert!(!geometry.accepts(&BoundingBox::new(0, 0, 250, 60)));
        assert!(geometry.accepts(&BoundingBox::new(0, 0, 120, 40)));
    }

    #[test]
    fn typical_plates_pass_and_squares_fail() {
        let geometry = PlateGeometry::default();
        assert!(geometry.accepts(&BoundingBox::new(10, 10, 150, 35)));
        assert!(!geometry.accepts(&BoundingBox::new(10, 10, 50, 40)));
        assert!(!geometry.accepts(&BoundingBox::new(10, 10, 45, 15)));
        assert!(!geometry.accepts(&BoundingBox::new(10, 10, 240, 80)));
    }
}
