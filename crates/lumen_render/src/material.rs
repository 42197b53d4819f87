//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use crate::sampling::{random_in_unit_sphere, random_unit_vector};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a successful scatter: the attenuation factor applied to the
/// light carried back along the scattered ray.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and the scattered ray, or None if the ray
    /// is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Unit normal plus a random unit vector approximates cosine-weighted
        // hemisphere sampling
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction (normal and sample cancel out)
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: the color of the metal
    /// - `fuzz`: roughness, 0.0 = perfect mirror, 1.0 = very rough; clamped
    ///   to [0, 1]
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // The perturbation can push the direction below the surface; the ray
        // is absorbed in that case
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// True if every component's magnitude is below 1e-8.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < 1e-8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn head_on_hit(material: &dyn Material) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::new(0.0, 0.0, -0.5),
            normal: Vec3::new(0.0, 0.0, 1.0),
            material,
            t: 0.5,
            front_face: true,
        }
    }

    #[test]
    fn test_lambertian_attenuation_and_origin() {
        let albedo = Color::new(0.7, 0.3, 0.3);
        let material = Lambertian::new(albedo);
        let rec = head_on_hit(&material);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(!near_zero(result.scattered.direction()));
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let rec = head_on_hit(&material);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(5);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.scattered.direction(), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(result.scattered.origin(), rec.p);
    }

    #[test]
    fn test_metal_grazing_ray_is_absorbed() {
        let material = Metal::new(Color::ONE, 0.0);
        // Incoming direction perpendicular to the normal: the reflection
        // satisfies dot(reflected, normal) == 0, which does not scatter
        let rec = HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::new(0.0, 1.0, 0.0),
            material: &material,
            t: 1.0,
            front_face: true,
        };
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(9);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let material = Metal::new(Color::ONE, 5.0);
        let rec = head_on_hit(&material);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(11);

        // With fuzz clamped to 1 the perturbation stays strictly inside the
        // unit ball around the mirror direction
        for _ in 0..200 {
            if let Some(result) = material.scatter(&ray, &rec, &mut rng) {
                let deviation = result.scattered.direction() - Vec3::new(0.0, 0.0, 1.0);
                assert!(deviation.length() < 1.0);
            }
        }
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(reflect(v, n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::splat(1e-9)));
        assert!(!near_zero(Vec3::new(1e-9, 1e-9, 1e-7)));
    }
}
