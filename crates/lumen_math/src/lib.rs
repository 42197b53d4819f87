// Re-export the glam vector as our 3D type. Rendering runs in f64: the
// integrator accumulates products of many near-unit factors and the unit
// normals coming out of the intersection code are held to much tighter
// tolerances than f32 can express.
pub use glam::DVec3 as Vec3;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;
