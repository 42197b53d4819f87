//! Stochastic sampling helpers.
//!
//! Every function takes an explicit generator handle so rendering is
//! reproducible under a seeded rng and each parallel worker can carry its
//! own stream.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform random f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}

/// Uniform random f64 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    rng.gen_range(min..max)
}

/// Vector with each component uniform in [min, max).
#[inline]
pub fn random_vec(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// Random point strictly inside the unit ball, by rejection sampling.
///
/// Draws from [-1, 1]^3 until the candidate lands inside the ball
/// (~2 draws expected). The loop is uncapped; termination is probabilistic.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random unit vector, uniform over the sphere's surface.
///
/// Normalizes a unit-ball sample. An exactly-zero sample would not survive
/// normalization, but that event has measure zero and is not guarded.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    random_in_unit_sphere(rng).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_range_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let x = gen_range(&mut rng, -1.0, 1.0);
            assert!((-1.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_unit_sphere_samples_inside() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let p = random_in_unit_sphere(&mut rng);
            assert!(p.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_random_unit_vector_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }
}
