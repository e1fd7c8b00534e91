use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use quicklook::data::generate::static_grid;
use quicklook::options::parse_clip;
use quicklook::{load, show, DisplayOptions, NumericGrid};

#[derive(Parser, Debug)]
#[command(author, version, about = "Take a quick look at an image or array file")]
struct Args {
    /// The file path of the image to look at
    filepath: Option<PathBuf>,

    /// The title for the display window (defaults to the file name)
    #[arg(long)]
    title: Option<String>,

    /// The percentile clip to remove from edges of the pixel value distribution
    #[arg(long, value_parser = clip_arg)]
    clip: Option<f64>,

    /// Name of colormap to use for 2D arrays (ignored for colour images)
    #[arg(long)]
    cmap: Option<String>,

    /// Window size in inches
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    figsize: Option<Vec<f32>>,

    /// JSON file with display options; flags given here take precedence
    #[arg(long)]
    options: Option<PathBuf>,
}

fn clip_arg(text: &str) -> std::result::Result<f64, String> {
    parse_clip(text).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut options = match &args.options {
        Some(path) => DisplayOptions::from_json_file(path).context("reading display options")?,
        None => DisplayOptions::default(),
    };
    if let Some(clip) = args.clip {
        options.clip_percentile = Some(clip);
    }
    if let Some(cmap) = args.cmap {
        options.colormap = cmap;
    }
    if let Some(size) = args.figsize.as_deref() {
        if let [width, height] = *size {
            options.figure_size = (width, height);
        }
    }
    if let Some(title) = args.title {
        options.title = title;
    }

    let grid = match &args.filepath {
        None => {
            println!(
                "
      No filepath given, to load file from path:

      quicklook path/to/file.png"
            );
            NumericGrid::from_array(&static_grid(100, 100))
        }
        Some(path) => {
            let grid = load(path)?;
            if options.title.is_empty() {
                if let Some(stem) = path.file_stem() {
                    options.title = stem.to_string_lossy().into_owned();
                }
            }
            grid
        }
    };

    show(grid, &options)?;
    Ok(())
}
