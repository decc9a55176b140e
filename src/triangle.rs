use crate::algebra::{Ray, Vec3};
use crate::material::Material;
use crate::optics::RayHit;

/// Single triangle; the face normal follows the source winding order and is
/// never flipped toward the ray.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub material: Material,
}

impl Triangle {
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0).normalize()
    }

    /// Möller–Trumbore without back-face culling.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < 1e-6 {
            return None;
        }
        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = f * edge2.dot(q);
        if t <= 0.0 {
            return None;
        }

        Some(RayHit {
            position: ray.at(t),
            normal: self.normal(),
            incident: ray.direction,
            material: self.material,
        })
    }
}
