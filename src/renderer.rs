use crate::algebra::{Color, Ray};
use crate::camera::Camera;
use crate::light::PointLight;
use crate::material::MaterialKind;
use crate::optics::RayHit;
use crate::scene::Scene;
use rand::Rng;

/// Recursion cap; mutually reflective surfaces bottom out to black here.
pub const MAX_DEPTH: u32 = 10;
/// Secondary-ray origin offset along the normal, against self-intersection.
const BIAS: f32 = 1e-4;

/// Shade one pixel: an aa × aa sub-pixel grid, each cell either traced
/// directly or averaged over lens samples when depth of field is active.
/// Pure in (x, y, scene, camera, rng state), so rows parallelize freely.
pub fn pixel_color(x: u32, y: u32, scene: &Scene, camera: &Camera, rng: &mut impl Rng) -> Color {
    let opts = &scene.options;
    let aa = opts.aa.max(1);
    let mut col = Color::BLACK;

    for i in 0..aa {
        for j in 0..aa {
            let ray = camera.primary_ray(x, y, i, j);
            if !opts.depth_of_field() {
                col = col + cast_ray(scene, &ray, 1);
                continue;
            }

            let focal_point = ray.origin + ray.direction.scale(opts.focal_length.max(0.0));
            let samples = opts.dof_samples.max(1);
            let mut acc = Color::BLACK;
            for _ in 0..samples {
                let lens = camera.lens_ray(ray.origin, focal_point, rng);
                acc = acc + cast_ray(scene, &lens, 1);
            }
            col = col + acc.scale(1.0 / samples as f32);
        }
    }

    col.scale(1.0 / (aa * aa) as f32)
}

/// Recursive Whitted shading; `depth` starts at 1 for primary rays.
pub fn cast_ray(scene: &Scene, ray: &Ray, depth: u32) -> Color {
    if depth > MAX_DEPTH {
        return Color::BLACK;
    }

    let hit = match nearest_hit(scene, ray) {
        Some(h) => h,
        None => return Color::BLACK,
    };

    match hit.material.kind {
        MaterialKind::Diffuse => shade_diffuse(scene, &hit),
        MaterialKind::Reflective => {
            let origin = hit.position + hit.normal.scale(BIAS);
            cast_ray(scene, &Ray::new(origin, hit.reflection()), depth + 1)
        }
        MaterialKind::Refractive => {
            let kr = hit.fresnel();
            let entering = hit.incident.dot(hit.normal) < 0.0;
            let offset = hit.normal.scale(BIAS);
            let (near, far) = if entering {
                (hit.position + offset, hit.position - offset)
            } else {
                (hit.position - offset, hit.position + offset)
            };
            let refracted = if kr < 1.0 {
                cast_ray(scene, &Ray::new(far, hit.refraction()), depth + 1)
            } else {
                // total internal reflection, nothing transmitted
                Color::BLACK
            };
            let reflected = cast_ray(scene, &Ray::new(near, hit.reflection()), depth + 1);
            reflected.scale(kr) + refracted.scale(1.0 - kr)
        }
    }
}

/// Nearest intersection over all entities by squared distance. Back-facing
/// hits are skipped unless the surface is refractive; glass is legitimately
/// hit from the inside on the way out.
fn nearest_hit(scene: &Scene, ray: &Ray) -> Option<RayHit> {
    scene
        .entities
        .iter()
        .filter_map(|e| e.intersect(ray))
        .filter(|h| {
            h.normal.dot(ray.direction) <= 0.0 || h.material.kind == MaterialKind::Refractive
        })
        .min_by(|a, b| {
            let da = (a.position - ray.origin).length_squared();
            let db = (b.position - ray.origin).length_squared();
            da.total_cmp(&db)
        })
}

fn shade_diffuse(scene: &Scene, hit: &RayHit) -> Color {
    let mut col = Color::BLACK;
    for light in &scene.lights {
        if cast_shadow(scene, hit, light) {
            continue;
        }
        let light_dir = (light.position - hit.position).normalize();
        let lambert = hit.normal.dot(light_dir).max(0.0);
        col = col + hit.material.color.mul(light.color).scale(lambert);
    }
    col
}

/// True when any entity blocks the segment between the hit point and the
/// light: the occluder's parameter along the unit shadow ray must satisfy
/// 0 < t < t_light.
pub fn cast_shadow(scene: &Scene, hit: &RayHit, light: &PointLight) -> bool {
    let origin = hit.position + hit.normal.scale(BIAS);
    let to_light = light.position - origin;
    let t_light = to_light.length();
    if t_light == 0.0 {
        return false;
    }
    let ray = Ray::new(origin, to_light.scale(1.0 / t_light));

    scene.entities.iter().any(|e| {
        e.intersect(&ray)
            .map_or(false, |h| (h.position - origin).length() < t_light)
    })
}

/// Output path for a finished render, unique per invocation.
pub fn render_image_name(w: u32, h: u32, aa: u32) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("renders/render_{w}x{h}_aa{aa}_{suffix}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Vec3;
    use crate::material::Material;
    use crate::object::Entity;
    use crate::plane::Plane;
    use crate::scene::SceneOptions;
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn material(kind: MaterialKind, color: Color) -> Material {
        Material { color, kind, ior: 1.5 }
    }

    fn sphere(center: Vec3, radius: f32, mat: Material) -> Entity {
        Entity::Sphere(Sphere { center, radius, material: mat })
    }

    fn scene(entities: Vec<Entity>, lights: Vec<PointLight>, options: SceneOptions) -> Scene {
        Scene { options, entities, lights }
    }

    fn white() -> Color {
        Color(1.0, 1.0, 1.0)
    }

    #[test]
    fn miss_shades_black() {
        let s = scene(vec![], vec![], SceneOptions::default());
        let ray = Ray::new(Vec3::ZERO, Vec3(0.0, 0.0, 1.0));
        assert_eq!(cast_ray(&s, &ray, 1), Color::BLACK);
    }

    #[test]
    fn diffuse_surface_collects_lambertian_light() {
        let red = material(MaterialKind::Diffuse, Color(1.0, 0.2, 0.1));
        let s = scene(
            vec![sphere(Vec3::ZERO, 1.0, red)],
            vec![PointLight { position: Vec3(0.0, 5.0, 0.0), color: white() }],
            SceneOptions::default(),
        );
        // Straight down onto the sphere's top; the light sits directly above.
        let ray = Ray::new(Vec3(0.0, 3.0, 0.0), Vec3(0.0, -1.0, 0.0));
        let col = cast_ray(&s, &ray, 1);
        assert!((col.0 - 1.0).abs() < 1e-4);
        assert!((col.1 - 0.2).abs() < 1e-4);
        assert!((col.2 - 0.1).abs() < 1e-4);
    }

    #[test]
    fn facing_mirror_planes_terminate_at_depth_cap() {
        let mirror = material(MaterialKind::Reflective, white());
        let s = scene(
            vec![
                Entity::Plane(Plane {
                    center: Vec3::ZERO,
                    normal: Vec3(0.0, 0.0, 1.0),
                    material: mirror,
                }),
                Entity::Plane(Plane {
                    center: Vec3(0.0, 0.0, 10.0),
                    normal: Vec3(0.0, 0.0, -1.0),
                    material: mirror,
                }),
            ],
            vec![PointLight { position: Vec3(0.0, 0.0, 5.0), color: white() }],
            SceneOptions::default(),
        );
        let ray = Ray::new(Vec3(0.0, 0.0, 5.0), Vec3(0.0, 0.0, 1.0));
        let col = cast_ray(&s, &ray, 1);
        assert!(col.is_finite());
        // Every path ends at the depth cap, and mirrors carry no local color.
        assert_eq!(col, Color::BLACK);
    }

    #[test]
    fn back_facing_hits_are_skipped_unless_refractive() {
        let inside = Ray::new(Vec3::ZERO, Vec3(0.0, 0.0, 1.0));

        let opaque = scene(
            vec![sphere(Vec3::ZERO, 1.0, material(MaterialKind::Diffuse, white()))],
            vec![],
            SceneOptions::default(),
        );
        assert!(nearest_hit(&opaque, &inside).is_none());

        let glass = scene(
            vec![sphere(Vec3::ZERO, 1.0, material(MaterialKind::Refractive, white()))],
            vec![],
            SceneOptions::default(),
        );
        let hit = nearest_hit(&glass, &inside).unwrap();
        assert!(hit.normal.dot(inside.direction) > 0.0);
    }

    #[test]
    fn nearest_hit_picks_closest_entity() {
        let red = material(MaterialKind::Diffuse, Color(1.0, 0.0, 0.0));
        let blue = material(MaterialKind::Diffuse, Color(0.0, 0.0, 1.0));
        let s = scene(
            vec![
                sphere(Vec3(0.0, 0.0, 8.0), 1.0, blue),
                sphere(Vec3(0.0, 0.0, 4.0), 1.0, red),
            ],
            vec![],
            SceneOptions::default(),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3(0.0, 0.0, 1.0));
        let hit = nearest_hit(&s, &ray).unwrap();
        assert!((hit.position.2 - 3.0).abs() < 1e-4);
        assert_eq!(hit.material.color, Color(1.0, 0.0, 0.0));
    }

    #[test]
    fn occluder_between_point_and_light_casts_shadow() {
        let blocker = sphere(Vec3(0.0, 2.0, 0.0), 0.5, material(MaterialKind::Diffuse, white()));
        let hit = RayHit {
            position: Vec3::ZERO,
            normal: Vec3(0.0, 1.0, 0.0),
            incident: Vec3(0.0, -1.0, 0.0),
            material: material(MaterialKind::Diffuse, white()),
        };

        let s = scene(vec![blocker], vec![], SceneOptions::default());
        let near_light = PointLight { position: Vec3(0.0, 4.0, 0.0), color: white() };
        assert!(cast_shadow(&s, &hit, &near_light));

        // Same occluder, but the light sits in front of it.
        let close_light = PointLight { position: Vec3(0.0, 1.0, 0.0), color: white() };
        assert!(!cast_shadow(&s, &hit, &close_light));
    }

    #[test]
    fn shadowed_light_contributes_nothing() {
        let red = material(MaterialKind::Diffuse, Color(1.0, 0.0, 0.0));
        let blocker = material(MaterialKind::Diffuse, white());
        let s = scene(
            vec![
                sphere(Vec3::ZERO, 1.0, red),
                sphere(Vec3(0.0, 3.0, 0.0), 0.5, blocker),
            ],
            vec![PointLight { position: Vec3(0.0, 5.0, 0.0), color: white() }],
            SceneOptions::default(),
        );
        let ray = Ray::new(Vec3(3.0, 1.0, 0.0), Vec3(-1.0, 0.0, 0.0));
        // The ray grazes the sphere top from the side; the blocker shadows
        // the only light, so nothing reaches the surface.
        let col = cast_ray(&s, &ray, 1);
        assert_eq!(col, Color::BLACK);
    }

    #[test]
    fn zero_aperture_dof_matches_pinhole_result() {
        let red = material(MaterialKind::Diffuse, Color(1.0, 0.2, 0.1));
        let entities = vec![sphere(Vec3::ZERO, 1.0, red)];
        let lights = vec![PointLight { position: Vec3(0.0, 5.0, -5.0), color: white() }];

        let pinhole = SceneOptions {
            camera_position: Vec3(0.0, 0.0, -5.0),
            width: 101,
            height: 101,
            ..Default::default()
        };
        // focal_length away from its default forces the lens path; aperture 0
        // keeps every lens sample on the primary ray.
        let dof = SceneOptions { focal_length: 5.0, dof_samples: 8, ..pinhole };

        let s1 = scene(entities.clone(), lights.clone(), pinhole);
        let s2 = scene(entities, lights, dof);
        let cam1 = Camera::new(&s1.options);
        let cam2 = Camera::new(&s2.options);

        let mut rng = StdRng::seed_from_u64(11);
        let a = pixel_color(50, 50, &s1, &cam1, &mut rng);
        let b = pixel_color(50, 50, &s2, &cam2, &mut rng);
        assert!((a.0 - b.0).abs() < 1e-4);
        assert!((a.1 - b.1).abs() < 1e-4);
        assert!((a.2 - b.2).abs() < 1e-4);
    }

    #[test]
    fn fixed_seed_reproduces_pixels() {
        let glass = material(MaterialKind::Refractive, white());
        let s = scene(
            vec![
                sphere(Vec3::ZERO, 1.0, glass),
                Entity::Plane(Plane {
                    center: Vec3(0.0, -2.0, 0.0),
                    normal: Vec3(0.0, 1.0, 0.0),
                    material: material(MaterialKind::Diffuse, Color(0.9, 0.9, 0.2)),
                }),
            ],
            vec![PointLight { position: Vec3(3.0, 4.0, -3.0), color: white() }],
            SceneOptions {
                camera_position: Vec3(0.0, 0.0, -4.0),
                aperture: 0.2,
                focal_length: 4.0,
                dof_samples: 4,
                width: 32,
                height: 32,
                ..Default::default()
            },
        );
        let cam = Camera::new(&s.options);
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        assert_eq!(
            pixel_color(7, 9, &s, &cam, &mut rng1),
            pixel_color(7, 9, &s, &cam, &mut rng2)
        );
    }
}
