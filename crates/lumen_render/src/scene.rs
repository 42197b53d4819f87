//! Scene description: a serde-deserializable world, camera, and render
//! settings, plus the built-in default scene.

use crate::camera::Camera;
use crate::hittable::HittableList;
use crate::integrator::RenderConfig;
use crate::material::{Color, Lambertian, Material, Metal};
use crate::sphere::Sphere;
use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors from loading a scene description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Description of a material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Diffuse {
        albedo: [f64; 3],
    },
    Metal {
        albedo: [f64; 3],
        #[serde(default)]
        fuzz: f64,
    },
}

impl MaterialDesc {
    fn build(&self) -> Arc<dyn Material> {
        match *self {
            MaterialDesc::Diffuse { albedo } => Arc::new(Lambertian::new(Color::from(albedo))),
            MaterialDesc::Metal { albedo, fuzz } => Arc::new(Metal::new(Color::from(albedo), fuzz)),
        }
    }
}

/// Description of a sphere primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: [f64; 3],
    pub radius: f64,
    pub material: MaterialDesc,
}

/// Camera settings. Aspect ratio comes from the render settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub viewport_height: f64,
    pub focal_length: f64,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            viewport_height: 2.0,
            focal_length: 1.0,
        }
    }
}

/// Image and sampling settings. Image height derives from the width and
/// aspect ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDesc {
    pub image_width: u32,
    pub aspect_ratio: f64,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: u64,
}

impl Default for RenderDesc {
    fn default() -> Self {
        Self {
            image_width: 400,
            aspect_ratio: 16.0 / 9.0,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
        }
    }
}

/// A complete scene description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub render: RenderDesc,
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub spheres: Vec<SphereDesc>,
}

impl SceneDescription {
    /// Load a scene description from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Parse a scene description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the world, camera, and render configuration.
    pub fn build(&self) -> (HittableList, Camera, RenderConfig) {
        let materials = shared_materials(&self.spheres);

        let mut world = HittableList::new();
        for (desc, material) in self.spheres.iter().zip(materials) {
            world.add(Box::new(Sphere::new(
                Vec3::from(desc.center),
                desc.radius,
                material,
            )));
        }

        let camera = Camera::new(
            self.render.aspect_ratio,
            self.camera.viewport_height,
            self.camera.focal_length,
        );

        let config = RenderConfig {
            image_width: self.render.image_width,
            image_height: (self.render.image_width as f64 / self.render.aspect_ratio) as u32,
            samples_per_pixel: self.render.samples_per_pixel,
            max_depth: self.render.max_depth,
            seed: self.render.seed,
        };

        (world, camera, config)
    }

    /// The built-in scene: a large ground sphere and three spheres at z = -1.
    pub fn default_scene() -> Self {
        Self {
            render: RenderDesc::default(),
            camera: CameraDesc::default(),
            spheres: vec![
                SphereDesc {
                    center: [0.0, -100.5, -1.0],
                    radius: 100.0,
                    material: MaterialDesc::Diffuse {
                        albedo: [0.8, 0.8, 0.0],
                    },
                },
                SphereDesc {
                    center: [0.0, 0.0, -1.0],
                    radius: 0.5,
                    material: MaterialDesc::Diffuse {
                        albedo: [0.7, 0.3, 0.3],
                    },
                },
                SphereDesc {
                    center: [-1.0, 0.0, -1.0],
                    radius: 0.5,
                    material: MaterialDesc::Metal {
                        albedo: [0.8, 0.8, 0.8],
                        fuzz: 0.3,
                    },
                },
                SphereDesc {
                    center: [1.0, 0.0, -1.0],
                    radius: 0.5,
                    material: MaterialDesc::Metal {
                        albedo: [0.8, 0.6, 0.2],
                        fuzz: 1.0,
                    },
                },
            ],
        }
    }
}

/// One material handle per sphere, with identical descriptions collapsed
/// onto a single shared `Arc`.
fn shared_materials(spheres: &[SphereDesc]) -> Vec<Arc<dyn Material>> {
    let mut cache: Vec<(MaterialDesc, Arc<dyn Material>)> = Vec::new();

    spheres
        .iter()
        .map(|sphere| {
            if let Some((_, material)) = cache.iter().find(|(desc, _)| *desc == sphere.material) {
                return Arc::clone(material);
            }
            let material = sphere.material.build();
            cache.push((sphere.material, Arc::clone(&material)));
            material
        })
        .collect()
}
