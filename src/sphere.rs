//! src/sphere.rs
//! -------------
//! Sphere with center and constant radius.

use crate::algebra::{Ray, Vec3};
use crate::material::Material;
use crate::optics::RayHit;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Closest positive intersection, via the geometric solve: no hit when
    /// the closest approach lies behind the origin or farther from the
    /// center than the radius, otherwise the smaller positive root.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        let l = self.center - ray.origin;
        let tca = l.dot(ray.direction);
        if tca < 0.0 {
            return None;
        }
        let d2 = l.length_squared() - tca * tca;
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }
        let thc = (r2 - d2).sqrt();
        let t = if tca - thc > 0.0 { tca - thc } else { tca + thc };
        if t <= 0.0 {
            return None;
        }

        let position = ray.at(t);
        Some(RayHit {
            position,
            normal: (position - self.center).normalize(),
            incident: ray.direction,
            material: self.material,
        })
    }
}
