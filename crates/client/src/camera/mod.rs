// Viewport - fits the logical field onto the drawing surface
//
// The field is shown whole at all times: uniform scale, centered, no
// follow or zoom.
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub field: Vec2,
    pub scale: f32,
    pub offset: Vec2,
}

impl Viewport {
    /// Largest uniform scale at which `field` fits in `surface`, centered.
    pub fn fit(field: Vec2, surface: Vec2) -> Self {
        let scale = if field.x > 0.0 && field.y > 0.0 {
            (surface.x / field.x).min(surface.y / field.y).max(0.0)
        } else {
            1.0
        };
        Self {
            field,
            scale,
            offset: (surface - field * scale) * 0.5,
        }
    }

    /// Convert field coordinates to surface coordinates.
    #[inline]
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        point * self.scale + self.offset
    }

    /// Scale a field-space length.
    #[inline]
    pub fn length(&self, value: f32) -> f32 {
        value * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_size_is_identity() {
        let viewport = Viewport::fit(Vec2::new(800.0, 600.0), Vec2::new(800.0, 600.0));
        assert_eq!(viewport.scale, 1.0);
        assert_eq!(viewport.to_screen(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_wide_surface_letterboxes_horizontally() {
        let viewport = Viewport::fit(Vec2::new(800.0, 600.0), Vec2::new(1600.0, 600.0));
        assert_eq!(viewport.scale, 1.0);
        assert_eq!(viewport.offset, Vec2::new(400.0, 0.0));
    }

    #[test]
    fn test_small_surface_scales_down() {
        let viewport = Viewport::fit(Vec2::new(800.0, 600.0), Vec2::new(400.0, 400.0));
        assert_eq!(viewport.scale, 0.5);
        assert_eq!(viewport.offset, Vec2::new(0.0, 50.0));
        assert_eq!(viewport.length(10.0), 5.0);
    }
}
