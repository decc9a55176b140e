use crate::algebra::{Color, Vec3};

/// Point emitter; intensity is encoded in the color magnitude.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
}
