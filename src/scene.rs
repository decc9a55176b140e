use crate::algebra::{color_from_array, option_vec3_from_array, vec3_from_array, Color, Vec3};
use crate::light::PointLight;
use crate::material::{Material, MaterialKind};
use crate::mesh;
use crate::object::Entity;
use crate::plane::Plane;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to load mesh '{path}': {source}")]
    Mesh {
        path: String,
        #[source]
        source: tobj::LoadError,
    },
}

/// Global render options, all optional in the scene file.
#[derive(Deserialize, Clone, Copy, Debug)]
#[serde(default)]
pub struct SceneOptions {
    #[serde(deserialize_with = "vec3_from_array")]
    pub camera_position: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    pub camera_axis: Vec3,
    /// Roll around the forward axis, degrees.
    pub camera_angle: f32,
    pub aperture: f32,
    pub focal_length: f32,
    /// Sub-pixel grid side length.
    pub aa: u32,
    pub width: u32,
    pub height: u32,
    /// Lens samples per sub-pixel when depth of field is active.
    pub dof_samples: u32,
    pub seed: u64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            camera_position: Vec3::ZERO,
            camera_axis: Vec3(0.0, 0.0, 1.0),
            camera_angle: 0.0,
            aperture: 0.0,
            focal_length: 1.0,
            aa: 1,
            width: 640,
            height: 480,
            dof_samples: 50,
            seed: 0,
        }
    }
}

impl SceneOptions {
    /// Depth of field is requested once either lens parameter leaves its
    /// default; with both at defaults every lens sample would collapse to
    /// the primary ray anyway.
    pub fn depth_of_field(&self) -> bool {
        self.aperture != 0.0 || self.focal_length != 1.0
    }
}

#[derive(Deserialize)]
struct MaterialJson {
    rgb: [f32; 3],
    #[serde(rename = "type")]
    kind: MaterialKind,
    #[serde(default = "default_ior")]
    ior: f32,
}

fn default_ior() -> f32 {
    1.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectJson {
    Sphere { sphere: SphereDesc },
    Plane { plane: PlaneDesc },
    Triangle { triangle: TriangleDesc },
    Mesh { mesh: MeshDesc },
}

#[derive(Deserialize)]
struct SphereDesc {
    #[serde(deserialize_with = "vec3_from_array")]
    center: Vec3,
    radius: f32,
    mat: String,
}

#[derive(Deserialize)]
struct PlaneDesc {
    #[serde(deserialize_with = "vec3_from_array")]
    center: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    normal: Vec3,
    mat: String,
}

#[derive(Deserialize)]
struct TriangleDesc {
    #[serde(deserialize_with = "vec3_from_array")]
    v0: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    v1: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    v2: Vec3,
    mat: String,
}

#[derive(Deserialize)]
struct MeshDesc {
    #[serde(alias = "obj")]
    file: String,
    #[serde(default, deserialize_with = "option_vec3_from_array")]
    center: Option<Vec3>,
    #[serde(default)]
    scale: Option<f32>,
    mat: String,
}

#[derive(Deserialize)]
struct LightJson {
    #[serde(deserialize_with = "vec3_from_array")]
    position: Vec3,
    #[serde(deserialize_with = "color_from_array")]
    color: Color,
}

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    options: SceneOptions,
    materials: HashMap<String, MaterialJson>,
    objects: Vec<ObjectJson>,
    lights: Vec<LightJson>,
}

/// Loaded scene, read-only for the whole render.
pub struct Scene {
    pub options: SceneOptions,
    pub entities: Vec<Entity>,
    pub lights: Vec<PointLight>,
}

pub fn load(path: &str) -> Result<Scene, SceneError> {
    let data = std::fs::read_to_string(path)?;
    parse(&data)
}

pub fn parse(data: &str) -> Result<Scene, SceneError> {
    let file: SceneFile = serde_json::from_str(data)?;

    let materials: HashMap<String, Material> = file
        .materials
        .into_iter()
        .map(|(name, m)| {
            (
                name,
                Material {
                    color: m.rgb.into(),
                    kind: m.kind,
                    ior: m.ior,
                },
            )
        })
        .collect();

    let default_mat = Material {
        color: Color(1.0, 0.0, 1.0),
        kind: MaterialKind::Diffuse,
        ior: 1.0,
    };
    let lookup = |name: &str| {
        materials.get(name).copied().unwrap_or_else(|| {
            log::warn!("unknown material '{name}', using fallback");
            default_mat
        })
    };

    let mut entities = Vec::new();
    for o in file.objects {
        match o {
            ObjectJson::Sphere { sphere } => {
                entities.push(Entity::Sphere(Sphere {
                    center: sphere.center,
                    radius: sphere.radius,
                    material: lookup(&sphere.mat),
                }));
            }
            ObjectJson::Plane { plane } => {
                entities.push(Entity::Plane(Plane {
                    center: plane.center,
                    normal: plane.normal.normalize(),
                    material: lookup(&plane.mat),
                }));
            }
            ObjectJson::Triangle { triangle } => {
                entities.push(Entity::Triangle(Triangle {
                    v0: triangle.v0,
                    v1: triangle.v1,
                    v2: triangle.v2,
                    material: lookup(&triangle.mat),
                }));
            }
            ObjectJson::Mesh { mesh: desc } => {
                let material = lookup(&desc.mat);
                let tris = mesh::load_obj(&desc.file).map_err(|source| SceneError::Mesh {
                    path: desc.file.clone(),
                    source,
                })?;
                let scale = desc.scale.unwrap_or(1.0);
                for [mut v0, mut v1, mut v2] in tris {
                    v0 = v0 * scale;
                    v1 = v1 * scale;
                    v2 = v2 * scale;
                    if let Some(center) = desc.center {
                        v0 = v0 + center;
                        v1 = v1 + center;
                        v2 = v2 + center;
                    }
                    entities.push(Entity::Triangle(Triangle { v0, v1, v2, material }));
                }
            }
        }
    }

    let lights = file
        .lights
        .iter()
        .map(|l| PointLight {
            position: l.position,
            color: l.color,
        })
        .collect();

    Ok(Scene {
        options: file.options,
        entities,
        lights,
    })
}
