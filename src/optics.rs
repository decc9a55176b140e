//! src/optics.rs
//! -------------
//! Hit records and the surface optics derived from them.

use crate::algebra::Vec3;
use crate::material::Material;

pub fn reflect(v: Vec3, n: Vec3) -> Vec3 { v - n.scale(2.0 * v.dot(n)) }

/// Result of a successful ray-primitive intersection.
///
/// `normal` is unit length but oriented however the primitive produced it,
/// not necessarily toward the ray; planes and triangles keep their
/// construction/winding orientation.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub position: Vec3,
    pub normal: Vec3,
    pub incident: Vec3,
    pub material: Material,
}

impl RayHit {
    /// Mirror of the incident direction about the surface normal.
    pub fn reflection(&self) -> Vec3 {
        reflect(self.incident, self.normal).normalize()
    }

    /// Snell refraction of the incident direction, handling both the entering
    /// and the exiting case. Returns the zero vector when total internal
    /// reflection leaves no real refraction direction; callers must skip the
    /// refraction branch on that sentinel.
    pub fn refraction(&self) -> Vec3 {
        let cosi = self.incident.dot(self.normal).clamp(-1.0, 1.0);
        let ior = self.material.ior;
        let (eta, n, ci) = if cosi < 0.0 {
            (1.0 / ior, self.normal, -cosi)
        } else {
            (ior, -self.normal, cosi)
        };
        let k = 1.0 - eta * eta * (1.0 - ci * ci);
        if k < 0.0 {
            Vec3::ZERO
        } else {
            (self.incident.scale(eta) + n.scale(eta * ci - k.sqrt())).normalize()
        }
    }

    /// Dielectric Fresnel reflectance fraction in [0,1]; exactly 1 under
    /// total internal reflection. `1 - kr` is the transmitted fraction.
    pub fn fresnel(&self) -> f32 {
        let cosi = self.incident.dot(self.normal).clamp(-1.0, 1.0);
        let (etai, etat) = if cosi > 0.0 {
            (self.material.ior, 1.0)
        } else {
            (1.0, self.material.ior)
        };
        let sint = etai / etat * (1.0 - cosi * cosi).max(0.0).sqrt();
        if sint >= 1.0 {
            return 1.0;
        }
        let cost = (1.0 - sint * sint).max(0.0).sqrt();
        let cosi = cosi.abs();
        let rs = (etat * cosi - etai * cost) / (etat * cosi + etai * cost);
        let rp = (etai * cosi - etat * cost) / (etai * cosi + etat * cost);
        (rs * rs + rp * rp) / 2.0
    }
}
