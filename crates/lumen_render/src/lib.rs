//! lumen - CPU path tracing
//!
//! A small Monte Carlo path tracer for sphere scenes: sphere intersection,
//! diffuse and metal scattering, a recursive integrator under a sky
//! gradient, and serial/parallel render loops with PPM and PNG output.

mod bucket;
mod camera;
mod color;
mod hittable;
mod integrator;
mod material;
mod sampling;
mod scene;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use color::{encode_color, linear_to_gamma, save_png, save_ppm, write_ppm};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{
    ray_color, render, render_parallel, render_pixel, sky_gradient, ImageBuffer, RenderConfig,
};
pub use material::{near_zero, reflect, Color, Lambertian, Material, Metal, ScatterResult};
pub use sampling::{gen_f64, gen_range, random_in_unit_sphere, random_unit_vector, random_vec};
pub use scene::{
    CameraDesc, MaterialDesc, RenderDesc, SceneDescription, SceneError, SphereDesc,
};
pub use sphere::Sphere;

/// Re-export the math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3};
