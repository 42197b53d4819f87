//! Camera for ray generation.

use lumen_math::{Ray, Vec3};

/// Camera mapping normalized image-plane coordinates to world-space rays.
///
/// The viewport geometry is derived once at construction and immutable
/// thereafter: the camera sits at the origin looking down -Z, with the
/// viewport centered one focal length away.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    lower_left_corner: Vec3,
}

impl Camera {
    /// Create a camera from aspect ratio, viewport height, and focal length.
    pub fn new(aspect_ratio: f64, viewport_height: f64, focal_length: f64) -> Self {
        let viewport_width = aspect_ratio * viewport_height;

        let origin = Vec3::ZERO;
        let horizontal = Vec3::new(viewport_width, 0.0, 0.0);
        let vertical = Vec3::new(0.0, viewport_height, 0.0);
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - Vec3::new(0.0, 0.0, focal_length);

        Self {
            origin,
            horizontal,
            vertical,
            lower_left_corner,
        }
    }

    /// Generate the ray through viewport coordinates (u, v), each in [0, 1].
    ///
    /// (0, 0) is the viewport's lower-left corner, (1, 1) its upper-right.
    /// The mapping is affine; jittering for anti-aliasing is the render
    /// loop's job.
    pub fn get_ray(&self, u: f64, v: f64) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + u * self.horizontal + v * self.vertical - self.origin,
        )
    }
}

impl Default for Camera {
    /// 16:9 viewport of height 2.0 at focal length 1.0.
    fn default() -> Self {
        Self::new(16.0 / 9.0, 2.0, 1.0)
    }
}
