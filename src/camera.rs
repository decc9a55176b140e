use crate::algebra::{sample_unit_disk, Ray, Vec3};
use crate::scene::SceneOptions;
use rand::Rng;

/// Horizontal field of view, degrees.
const FOV_DEGREES: f32 = 90.0;

/// Pinhole camera with an optional thin-lens aperture. Converts pixel and
/// sub-pixel coordinates into world-space rays through a precomputed image
/// plane one unit along the forward axis.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    bottom_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    width: u32,
    height: u32,
    aa: u32,
    aperture: f32,
}

impl Camera {
    pub fn new(opts: &SceneOptions) -> Self {
        let forward = {
            let f = opts.camera_axis.normalize();
            if f.is_zero() { Vec3(0.0, 0.0, 1.0) } else { f }
        };

        // Up vector rotated by the roll angle, then crossed into the basis.
        let roll = opts.camera_angle.to_radians();
        let tilt = Vec3(roll.sin(), roll.cos(), 0.0);
        let r = tilt.cross(forward);
        let right = if r.length_squared() < 1e-12 {
            // axis parallel to the tilted up vector
            forward.any_orthonormal().normalize()
        } else {
            r.normalize()
        };
        let up = forward.cross(right);

        let aspect = opts.width as f32 / opts.height as f32;
        let half_width = (FOV_DEGREES.to_radians() * 0.5).tan();
        let half_height = half_width / aspect;
        let origin = opts.camera_position;

        Self {
            origin,
            right,
            up,
            forward,
            bottom_left: origin - right.scale(half_width) - up.scale(half_height) + forward,
            horizontal: right.scale(2.0 * half_width),
            vertical: up.scale(2.0 * half_height),
            width: opts.width,
            height: opts.height,
            aa: opts.aa.max(1),
            aperture: opts.aperture,
        }
    }

    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.right, self.up, self.forward)
    }

    /// Ray through the (sub_i, sub_j) cell of pixel (px, py), on a centered
    /// aa × aa grid. Plane coordinates run from the bottom-left corner, so
    /// the pixel row is flipped.
    pub fn primary_ray(&self, px: u32, py: u32, sub_i: u32, sub_j: u32) -> Ray {
        let aa = self.aa as f32;
        let u = (px as f32 + (sub_i as f32 + 0.5) / aa) / self.width as f32;
        let v = 1.0 - (py as f32 + (sub_j as f32 + 0.5) / aa) / self.height as f32;
        let point = self.bottom_left + self.horizontal.scale(u) + self.vertical.scale(v);
        Ray::new(self.origin, (point - self.origin).normalize())
    }

    /// Aperture-perturbed ray toward a focal point: the origin moves by a
    /// disk sample scaled to the aperture radius, along the camera's right
    /// and up axes.
    pub fn lens_ray(&self, origin: Vec3, focal_point: Vec3, rng: &mut impl Rng) -> Ray {
        let (dx, dy) = sample_unit_disk(rng);
        let origin = origin
            + self.right.scale(dx * self.aperture)
            + self.up.scale(dy * self.aperture);
        Ray::new(origin, (focal_point - origin).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn options(axis: Vec3, angle: f32) -> SceneOptions {
        SceneOptions {
            camera_axis: axis,
            camera_angle: angle,
            width: 101,
            height: 101,
            ..Default::default()
        }
    }

    #[test]
    fn default_axis_gives_canonical_basis() {
        let cam = Camera::new(&options(Vec3(0.0, 0.0, 1.0), 0.0));
        let (right, up, forward) = cam.basis();
        assert!((right - Vec3(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((up - Vec3(0.0, 1.0, 0.0)).length() < 1e-6);
        assert!((forward - Vec3(0.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn basis_is_orthonormal_for_any_axis_and_roll() {
        let cases = [
            (Vec3(0.0, 0.0, 1.0), 0.0),
            (Vec3(1.0, 2.0, -3.0), 30.0),
            (Vec3(0.0, 1.0, 0.0), 0.0), // axis parallel to the tilt vector
            (Vec3(-1.0, 0.5, 0.25), 123.0),
            (Vec3(0.2, -0.9, 0.4), -45.0),
        ];
        for (axis, angle) in cases {
            let (right, up, forward) = Camera::new(&options(axis, angle)).basis();
            for v in [right, up, forward] {
                assert!((v.length() - 1.0).abs() < 1e-6, "axis {axis:?} angle {angle}");
            }
            assert!(right.dot(up).abs() < 1e-6);
            assert!(right.dot(forward).abs() < 1e-6);
            assert!(up.dot(forward).abs() < 1e-6);
        }
    }

    #[test]
    fn center_pixel_ray_points_forward() {
        // 101 px wide: the center sub-cell maps to u = v = 0.5 exactly.
        let cam = Camera::new(&options(Vec3(0.0, 0.0, 1.0), 0.0));
        let ray = cam.primary_ray(50, 50, 0, 0);
        assert!((ray.direction - Vec3(0.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn rays_are_unit_length() {
        let cam = Camera::new(&options(Vec3(0.3, -0.2, 1.0), 15.0));
        for (px, py) in [(0, 0), (100, 0), (0, 100), (33, 67)] {
            let ray = cam.primary_ray(px, py, 0, 0);
            assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_aperture_lens_ray_collapses_to_primary() {
        let cam = Camera::new(&options(Vec3(0.0, 0.0, 1.0), 0.0));
        let ray = cam.primary_ray(20, 30, 0, 0);
        let focal_point = ray.origin + ray.direction.scale(5.0);
        let mut rng = StdRng::seed_from_u64(3);
        let lens = cam.lens_ray(ray.origin, focal_point, &mut rng);
        assert_eq!(lens.origin, ray.origin);
        assert!((lens.direction - ray.direction).length() < 1e-6);
    }
}
