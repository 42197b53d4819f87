//! Render driver: load a scene description, render it in parallel, and
//! write the image as PPM or PNG.

use anyhow::{bail, Context, Result};
use lumen_render::{render_parallel, save_png, save_ppm, SceneDescription};
use std::path::PathBuf;
use std::time::Instant;

struct Args {
    scene: Option<PathBuf>,
    output: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut scene = None;
    let mut output = PathBuf::from("render.ppm");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                output = PathBuf::from(args.next().context("missing value for -o")?);
            }
            "-h" | "--help" => {
                eprintln!("usage: lumen [scene.json] [-o out.ppm|out.png]");
                std::process::exit(0);
            }
            _ if arg.starts_with('-') => bail!("unknown option: {arg}"),
            _ => {
                if scene.replace(PathBuf::from(&arg)).is_some() {
                    bail!("more than one scene file given");
                }
            }
        }
    }

    Ok(Args { scene, output })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let description = match &args.scene {
        Some(path) => SceneDescription::from_path(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => SceneDescription::default_scene(),
    };

    let (world, camera, config) = description.build();
    log::info!(
        "rendering {} spheres at {}x{}, {} samples per pixel, depth {}",
        world.len(),
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth
    );

    let start = Instant::now();
    let image = render_parallel(&camera, &world, &config);
    log::info!("rendered in {:.2?}", start.elapsed());

    match args.output.extension().and_then(|ext| ext.to_str()) {
        Some("png") => save_png(&image, &args.output)
            .with_context(|| format!("failed to write {}", args.output.display()))?,
        _ => save_ppm(&image, &args.output)
            .with_context(|| format!("failed to write {}", args.output.display()))?,
    }
    log::info!("wrote {}", args.output.display());

    Ok(())
}
