use crate::algebra::Ray;
use crate::optics::RayHit;

/// Scene entity. New primitive kinds extend this enum and the match below.
#[derive(Clone, Copy, Debug)]
pub enum Entity {
    Sphere(crate::sphere::Sphere),
    Plane(crate::plane::Plane),
    Triangle(crate::triangle::Triangle),
}

impl Entity {
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        match self {
            Self::Sphere(s) => s.intersect(ray),
            Self::Plane(p) => p.intersect(ray),
            Self::Triangle(t) => t.intersect(ray),
        }
    }
}
