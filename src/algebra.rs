use rand::Rng;
use serde::Deserialize;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3(pub f32, pub f32, pub f32);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3(0.0, 0.0, 0.0);

    pub fn scale(self, f: f32) -> Self { Self(self.0 * f, self.1 * f, self.2 * f) }
    pub fn dot(self, v: Self) -> f32 { self.0 * v.0 + self.1 * v.1 + self.2 * v.2 }
    pub fn cross(self, v: Self) -> Self {
        Self(self.1 * v.2 - self.2 * v.1, self.2 * v.0 - self.0 * v.2, self.0 * v.1 - self.1 * v.0)
    }
    pub fn length(self) -> f32 { self.dot(self).sqrt() }
    pub fn length_squared(self) -> f32 { self.dot(self) }
    pub fn is_zero(self) -> bool { self.0 == 0.0 && self.1 == 0.0 && self.2 == 0.0 }

    /// Unit vector, or the zero vector for a true zero input.
    /// Near-zero inputs are the caller's problem.
    pub fn normalize(self) -> Self {
        let n = self.length();
        if n == 0.0 { Self::ZERO } else { self.scale(1.0 / n) }
    }

    pub fn any_orthonormal(self) -> Vec3 {
        // Pick the smallest-magnitude component to avoid near-zero cross products
        if self.0.abs() < self.1.abs() && self.0.abs() < self.2.abs() {
            Vec3(0.0, -self.2, self.1)
        } else if self.1.abs() < self.2.abs() {
            Vec3(-self.2, 0.0, self.0)
        } else {
            Vec3(self.1, -self.0, 0.0)
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, v: Vec3) -> Vec3 { Vec3(self.0 + v.0, self.1 + v.1, self.2 + v.2) }
}
impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, v: Vec3) -> Vec3 { Vec3(self.0 - v.0, self.1 - v.1, self.2 - v.2) }
}
impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 { Vec3(-self.0, -self.1, -self.2) }
}
impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, f: f32) -> Vec3 { self.scale(f) }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self { Vec3(a[0], a[1], a[2]) }
}

/// RGB triple. Components live in [0,1] conceptually but are never clamped
/// by arithmetic; clamping happens once, at the framebuffer write-out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0);

    pub fn scale(self, f: f32) -> Self { Self(self.0 * f, self.1 * f, self.2 * f) }
    /// Component-wise product.
    pub fn mul(self, c: Self) -> Self { Self(self.0 * c.0, self.1 * c.1, self.2 * c.2) }
    pub fn is_finite(self) -> bool { self.0.is_finite() && self.1.is_finite() && self.2.is_finite() }
}

impl Add for Color {
    type Output = Color;
    fn add(self, c: Color) -> Color { Color(self.0 + c.0, self.1 + c.1, self.2 + c.2) }
}

impl From<[f32; 3]> for Color {
    fn from(a: [f32; 3]) -> Self { Color(a[0], a[1], a[2]) }
}

/// Origin plus unit direction; every producer normalizes the direction.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(self, t: f32) -> Vec3 {
        self.origin + self.direction.scale(t)
    }
}

/* Custom helpers so Serde turns JSON arrays into Vec3 / Color */
pub fn vec3_from_array<'de, D>(d: D) -> Result<Vec3, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = <[f32; 3]>::deserialize(d)?;
    Ok(arr.into())
}

pub fn option_vec3_from_array<'de, D>(d: D) -> Result<Option<Vec3>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = <Option<[f32; 3]>>::deserialize(d)?;
    Ok(arr.map(Vec3::from))
}

pub fn color_from_array<'de, D>(d: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = <[f32; 3]>::deserialize(d)?;
    Ok(arr.into())
}

/// Uniform sample of the unit disk by rejection: draw (dx, dy) in [-1,1]²,
/// keep the first pair inside the disk.
pub fn sample_unit_disk(rng: &mut impl Rng) -> (f32, f32) {
    loop {
        let dx = rng.gen::<f32>() * 2.0 - 1.0;
        let dy = rng.gen::<f32>() * 2.0 - 1.0;
        if dx * dx + dy * dy < 1.0 {
            return (dx, dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn cross_follows_right_hand_rule() {
        let z = Vec3(1.0, 0.0, 0.0).cross(Vec3(0.0, 1.0, 0.0));
        assert_eq!(z, Vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn normalize_yields_unit_length() {
        let v = Vec3(3.0, -4.0, 12.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_returns_zero_sentinel() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn any_orthonormal_is_orthogonal() {
        for v in [Vec3(0.0, 1.0, 0.0), Vec3(1.0, 2.0, 3.0), Vec3(-5.0, 0.1, 0.0)] {
            assert!(v.dot(v.any_orthonormal()).abs() < 1e-6);
        }
    }

    #[test]
    fn ray_at_walks_along_direction() {
        let r = Ray::new(Vec3(1.0, 0.0, 0.0), Vec3(0.0, 0.0, 1.0));
        assert_eq!(r.at(2.5), Vec3(1.0, 0.0, 2.5));
    }

    #[test]
    fn disk_samples_stay_inside_unit_disk() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (dx, dy) = sample_unit_disk(&mut rng);
            assert!(dx * dx + dy * dy < 1.0);
        }
    }
}
