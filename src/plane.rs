use crate::algebra::{Ray, Vec3};
use crate::material::Material;
use crate::optics::RayHit;

/// Infinite plane through `center` with a unit normal fixed at construction.
/// The normal is never flipped toward the ray, so back-side hits are valid.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub center: Vec3,
    pub normal: Vec3,
    pub material: Material,
}

impl Plane {
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < f32::EPSILON {
            // ray parallel to the plane
            return None;
        }

        let t = (self.center - ray.origin).dot(self.normal) / denom;
        if t <= 0.0 {
            return None;
        }

        Some(RayHit {
            position: ray.at(t),
            normal: self.normal,
            incident: ray.direction,
            material: self.material,
        })
    }
}
