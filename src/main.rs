mod algebra;
mod camera;
mod framebuffer;
mod light;
mod material;
mod mesh;
mod object;
mod optics;
mod plane;
mod renderer;
mod scene;
mod sphere;
mod triangle;

use std::path::Path;
use std::{env, fs, process};

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::framebuffer::Framebuffer;
use crate::renderer::render_image_name;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let quiet_mode = args.contains(&"--quiet".to_string()) || args.contains(&"-q".to_string());
    let scene_path = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .map(String::as_str)
        .unwrap_or("scene.json");

    let scene = match scene::load(scene_path) {
        Ok(s) => s,
        Err(e) => {
            error!("{scene_path}: {e}");
            process::exit(1);
        }
    };

    let opts = scene.options;
    let camera = Camera::new(&opts);

    info!(
        "camera at {:?}, axis {:?}, roll {:.1}°, aperture {:.3}, focal length {:.2}",
        opts.camera_position, opts.camera_axis, opts.camera_angle, opts.aperture, opts.focal_length
    );
    info!(
        "{} entities, {} lights, {}x{} at aa {} (seed {})",
        scene.entities.len(),
        scene.lights.len(),
        opts.width,
        opts.height,
        opts.aa,
        opts.seed
    );

    let bar = if !quiet_mode {
        let pb = ProgressBar::new(opts.height as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} rows | {elapsed_precise} | ETA: {eta}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    // One seeded generator per row keeps the render reproducible no matter
    // how rayon schedules the rows.
    let rows: Vec<_> = (0..opts.height)
        .into_par_iter()
        .map(|y| {
            let mut rng = StdRng::seed_from_u64(opts.seed.wrapping_add(y as u64));
            let row: Vec<_> = (0..opts.width)
                .map(|x| renderer::pixel_color(x, y, &scene, &camera, &mut rng))
                .collect();
            if let Some(b) = &bar {
                b.inc(1);
            }
            (y, row)
        })
        .collect();

    if let Some(b) = bar {
        b.finish_with_message("Rendering complete");
    }

    let mut fb = Framebuffer::new(opts.width, opts.height);
    for (y, row) in rows {
        for (x, col) in row.into_iter().enumerate() {
            fb.set_pixel(x as u32, y, col);
        }
    }

    let name = render_image_name(opts.width, opts.height, opts.aa);
    if let Some(dir) = Path::new(&name).parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            error!("creating {}: {e}", dir.display());
            process::exit(1);
        }
    }
    if let Err(e) = fb.into_image().save(&name) {
        error!("saving {name}: {e}");
        process::exit(1);
    }
    println!("Saved → {name}");
}
