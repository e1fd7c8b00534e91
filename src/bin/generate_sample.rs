use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbImage;
use ndarray_npy::{write_npy, WritableElement};

use quicklook::data::generate::{
    easter_egg, egg_array, parse_dimension, pretty_pattern, static_grid_seeded,
};
use quicklook::{normalize, DisplayOptions};

#[derive(Parser, Debug)]
#[command(about = "Write the example arrays to .npy files")]
struct Args {
    /// Directory to write into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Side length of the square patterns
    #[arg(long, default_value = "201", value_parser = dimension_arg)]
    size: usize,

    /// Width of the static grid
    #[arg(long, default_value = "100", value_parser = dimension_arg)]
    width: usize,

    /// Height of the static grid
    #[arg(long, default_value = "100", value_parser = dimension_arg)]
    height: usize,

    /// Seed for the static grid
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn dimension_arg(text: &str) -> std::result::Result<usize, String> {
    parse_dimension(text).map_err(|e| e.to_string())
}

fn save_npy<A, D>(dir: &Path, name: &str, array: &ndarray::Array<A, D>) -> Result<PathBuf>
where
    A: WritableElement,
    D: ndarray::Dimension,
{
    let path = dir.join(format!("{name}.npy"));
    write_npy(&path, array).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let pattern = pretty_pattern(args.size);
    let written = [
        save_npy(
            &args.out_dir,
            "static",
            &static_grid_seeded(args.width, args.height, args.seed),
        )?,
        save_npy(&args.out_dir, "pretty_pattern", &pattern)?,
        save_npy(&args.out_dir, "egg", &egg_array(args.size))?,
        save_npy(&args.out_dir, "easter_egg", &easter_egg(args.size))?,
    ];

    // Also as a PNG, to try the image loader.
    let display = normalize(&pattern, &DisplayOptions::default())?;
    let (height, width) = (display.shape()[0] as u32, display.shape()[1] as u32);
    let bytes: Vec<u8> = display.values().iter().map(|&v| v as u8).collect();
    let png_path = args.out_dir.join("pretty_pattern.png");
    RgbImage::from_raw(width, height, bytes)
        .context("pattern does not fill an RGB image")?
        .save(&png_path)
        .with_context(|| format!("writing {}", png_path.display()))?;

    for path in written.iter().chain([&png_path]) {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
