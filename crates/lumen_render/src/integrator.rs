//! Recursive light-transport integrator and the render loops driving it.
//!
//! The integrator estimates the color carried by a single ray; the render
//! loops accumulate jittered per-pixel samples, either scanline by scanline
//! on one thread or bucket by bucket in parallel.

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::material::Color;
use crate::sampling::gen_f64;
use crate::{Camera, Hittable};
use lumen_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed for the per-bucket rng streams of the parallel path
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces and multiplying
/// the attenuation of every scatter into the result.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Bounce budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    // The 0.001 lower bound skips re-hitting the surface the ray just left
    // ("shadow acne")
    if let Some(rec) = world.hit(ray, Interval::new(0.001, f64::INFINITY)) {
        return match rec.material.scatter(ray, &rec, rng) {
            Some(scatter) => {
                scatter.attenuation * ray_color(&scatter.scattered, world, depth - 1, rng)
            }
            None => Color::ZERO,
        };
    }

    sky_gradient(ray)
}

/// The implicit sky: a vertical white-to-blue gradient, the scene's only
/// light source.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let t = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - t) * white + t * blue
}

/// Sum of `samples_per_pixel` jittered estimates for pixel (x, y).
///
/// Row 0 is the image's top edge. The sum is left unaveraged; the color
/// encoder divides by the sample count.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let u = (x as f64 + gen_f64(rng)) / (config.image_width - 1) as f64;
        let v = ((config.image_height - 1 - y) as f64 + gen_f64(rng))
            / (config.image_height - 1) as f64;
        let ray = camera.get_ray(u, v);
        pixel += ray_color(&ray, world, config.max_depth, rng);
    }

    pixel
}

/// Image buffer holding per-pixel sample sums.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Sample count the pixel sums were accumulated over
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel sum at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }
}

/// Render the entire scene on the calling thread.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
    );

    for y in 0..config.image_height {
        log::trace!("scanlines remaining: {}", config.image_height - y);
        for x in 0..config.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    image
}

/// Render the scene with one rayon task per bucket.
///
/// Each bucket draws from its own rng stream seeded from `config.seed` and
/// the bucket index, so the output is reproducible for a fixed seed no
/// matter how the work is scheduled across threads.
pub fn render_parallel(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let buckets = generate_buckets(config.image_width, config.image_height, DEFAULT_BUCKET_SIZE);
    log::debug!(
        "rendering {} buckets of up to {}px",
        buckets.len(),
        DEFAULT_BUCKET_SIZE
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(
                config
                    .seed
                    .wrapping_add((bucket.index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            );
            let pixels = render_bucket(bucket, camera, world, config, &mut rng);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
    );
    for result in results {
        let bucket = result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                image.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};
    use crate::{HittableList, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn one_sphere_world() -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        )));
        world
    }

    #[test]
    fn test_depth_zero_is_black() {
        let world = one_sphere_world();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(ray_color(&ray, &world, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_miss_returns_gradient_endpoints() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);

        // Straight up: t = 1, the blue end of the gradient
        let up = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(ray_color(&up, &world, 10, &mut rng), Color::new(0.5, 0.7, 1.0));

        // Straight down: t = 0, white
        let down = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(ray_color(&down, &world, 10, &mut rng), Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_sky_gradient_midpoint() {
        let horizontal = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let color = sky_gradient(&horizontal);
        assert!((color - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_hit_color_is_attenuated() {
        let world = one_sphere_world();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);

        // One bounce off a 0.5-gray sphere cannot return more than half of
        // any sky value
        for _ in 0..50 {
            let color = ray_color(&ray, &world, 50, &mut rng);
            assert!(color.x <= 0.5 + 1e-12);
            assert!(color.y <= 0.5 + 1e-12);
            assert!(color.z <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn test_render_pixel_sums_samples() {
        let world = HittableList::new();
        let camera = Camera::default();
        let config = RenderConfig {
            image_width: 16,
            image_height: 9,
            samples_per_pixel: 4,
            max_depth: 5,
            seed: 0,
        };
        let mut rng = StdRng::seed_from_u64(42);

        // An empty world only sees the sky, so the sum of n samples is at
        // least n times the gradient's dimmest channel
        let pixel = render_pixel(&camera, &world, 8, 4, &config, &mut rng);
        assert!(pixel.x >= 4.0 * 0.5);
        assert!(pixel.z >= 4.0 * 0.999);
    }

    #[test]
    fn test_parallel_render_is_reproducible() {
        let world = one_sphere_world();
        let camera = Camera::default();
        let config = RenderConfig {
            image_width: 32,
            image_height: 18,
            samples_per_pixel: 2,
            max_depth: 5,
            seed: 7,
        };

        let a = render_parallel(&camera, &world, &config);
        let b = render_parallel(&camera, &world, &config);

        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_serial_and_parallel_agree_statistically() {
        let world = one_sphere_world();
        let camera = Camera::default();
        let config = RenderConfig {
            image_width: 16,
            image_height: 9,
            samples_per_pixel: 8,
            max_depth: 5,
            seed: 3,
        };

        let mut rng = StdRng::seed_from_u64(3);
        let serial = render(&camera, &world, &config, &mut rng);
        let parallel = render_parallel(&camera, &world, &config);

        // Different sample orderings draw different jitter, so compare the
        // per-channel image means with a loose tolerance
        let mean = |image: &ImageBuffer| {
            image.pixels.iter().copied().sum::<Color>()
                / (image.pixels.len() as f64 * config.samples_per_pixel as f64)
        };
        let diff = mean(&serial) - mean(&parallel);
        assert!(diff.abs().max_element() < 0.1);
    }
}
