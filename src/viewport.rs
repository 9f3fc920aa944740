//! Drawable surface dimensions.
//!
//! [`Viewport`] is the CPU view of the surface size. The GPU side (surface
//! configuration, depth texture) is rebuilt in [`crate::context::Context::resize`],
//! which calls [`Viewport::resize`] first.

use crate::camera::Projection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Adopt a new size and update the projection's aspect ratio.
    ///
    /// Returns `false` and changes nothing for a zero-sized area (minimised
    /// window, collapsed container).
    pub fn resize(&mut self, width: u32, height: u32, projection: &mut Projection) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        projection.resize(width, height);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut projection = Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 1000.0);
        let mut viewport = Viewport::new(800, 600);
        assert!(!viewport.resize(0, 300, &mut projection));
        assert_eq!(viewport, Viewport::new(800, 600));
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
