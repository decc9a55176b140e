use crate::algebra::Color;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Diffuse,
    Reflective,
    Refractive,
}

#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub color: Color,
    pub kind: MaterialKind,
    /// Index of refraction; meaningful for Refractive only.
    pub ior: f32,
}
