/// Uniform scale plus centering offset mapping source-resolution
/// coordinates onto a widget area, the same "contain" fit the frame image
/// underneath the overlay uses, so a box lands exactly on the pixels it
/// was detected in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl FitTransform {
    /// Fit `source` (native frame resolution) into `area` (widget bounds).
    /// `None` when either rectangle is degenerate; nothing should draw.
    pub fn contain(source: (f32, f32), area: (f32, f32)) -> Option<Self> {
        let (sw, sh) = source;
        let (aw, ah) = area;
        if sw <= 0.0 || sh <= 0.0 || aw <= 0.0 || ah <= 0.0 {
            return None;
        }
        let scale = (aw / sw).min(ah / sh);
        Some(Self {
            scale,
            offset_x: (aw - sw * scale) / 2.0,
            offset_y: (ah - sh * scale) / 2.0,
        })
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    pub fn length(&self, len: f32) -> f32 {
        len * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_fit_is_identity() {
        let t = FitTransform::contain((640.0, 480.0), (640.0, 480.0)).unwrap();
        assert_relative_eq!(t.scale, 1.0);
        assert_relative_eq!(t.offset_x, 0.0);
        assert_relative_eq!(t.offset_y, 0.0);
    }

    #[test]
    fn test_wide_area_letterboxes_horizontally() {
        // 640x480 into 1280x480: scale 1, centered with 320 px side bars.
        let t = FitTransform::contain((640.0, 480.0), (1280.0, 480.0)).unwrap();
        assert_relative_eq!(t.scale, 1.0);
        assert_relative_eq!(t.offset_x, 320.0);
        assert_relative_eq!(t.offset_y, 0.0);
    }

    #[test]
    fn test_tall_area_letterboxes_vertically() {
        let t = FitTransform::contain((640.0, 480.0), (640.0, 960.0)).unwrap();
        assert_relative_eq!(t.scale, 1.0);
        assert_relative_eq!(t.offset_x, 0.0);
        assert_relative_eq!(t.offset_y, 240.0);
    }

    #[test]
    fn test_source_corners_map_onto_fitted_area() {
        // 1280x720 into a 400x400 widget: scale 400/1280, vertical bars.
        let t = FitTransform::contain((1280.0, 720.0), (400.0, 400.0)).unwrap();
        assert_relative_eq!(t.scale, 0.3125);

        let (x0, y0) = t.apply(0.0, 0.0);
        let (x1, y1) = t.apply(1280.0, 720.0);
        assert_relative_eq!(x0, 0.0);
        assert_relative_eq!(y0, (400.0 - 720.0 * 0.3125) / 2.0);
        assert_relative_eq!(x1, 400.0);
        assert_relative_eq!(y1 - y0, 720.0 * 0.3125);
    }

    #[test]
    fn test_lengths_scale_uniformly() {
        let t = FitTransform::contain((100.0, 100.0), (50.0, 50.0)).unwrap();
        assert_relative_eq!(t.length(20.0), 10.0);
    }

    #[test]
    fn test_degenerate_dimensions_yield_no_transform() {
        assert!(FitTransform::contain((0.0, 480.0), (640.0, 480.0)).is_none());
        assert!(FitTransform::contain((640.0, 480.0), (640.0, 0.0)).is_none());
        assert!(FitTransform::contain((-1.0, 480.0), (640.0, 480.0)).is_none());
    }
}
