use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use tile_meld_core::{level_from_env, MeldIoError, MeldParams, StableMeld, TileBox};

mod crop;
mod report;

use report::{MeldInput, MeldReport};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    MeldIo(#[from] MeldIoError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("threshold must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),
    #[error("crop buffer does not match {width}x{height}")]
    CropBuffer { width: u32, height: u32 },
}

#[derive(Parser, Debug)]
#[command(name = "tile-meld", version, about = "Meld adjacent tile boxes")]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace). Defaults to
    /// `TILE_MELD_LOG`, then `warn`.
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Meld boxes/contours read from a JSON file and print a JSON report.
    Meld(MeldArgs),
    /// Print the shortest distance between two boxes given as `x,y,w,h`.
    Distance(DistanceArgs),
}

#[derive(Args, Debug)]
struct MeldArgs {
    /// JSON file with `boxes` and/or `contours`.
    #[arg(long)]
    input: PathBuf,
    /// JSON file with `MeldParams`; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Meld boxes closer than this many pixels.
    #[arg(long, value_parser = parse_threshold)]
    threshold: Option<f64>,
    /// Repeat melding until no more melds are made.
    #[arg(long)]
    until_stable: bool,
    /// Pass limit for `--until-stable`.
    #[arg(long)]
    max_passes: Option<usize>,
    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Image the boxes were detected in; enables cropping.
    #[arg(long, requires = "crop_dir")]
    image: Option<PathBuf>,
    /// Directory for padded meld crops.
    #[arg(long, requires = "image")]
    crop_dir: Option<PathBuf>,
    /// Padding around each crop in pixels.
    #[arg(long)]
    padding: Option<i32>,
}

#[derive(Args, Debug)]
struct DistanceArgs {
    /// First box as `x,y,width,height`.
    #[arg(long, value_parser = parse_box, allow_hyphen_values = true)]
    first: TileBox,
    /// Second box as `x,y,width,height`.
    #[arg(long, value_parser = parse_box, allow_hyphen_values = true)]
    second: TileBox,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(s).map_err(|_| format!("unknown log level '{s}'"))
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("threshold must be finite and non-negative, got {s}"));
    }
    Ok(v)
}

fn parse_box(s: &str) -> Result<TileBox, String> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("'{s}': {e}"))?;
    let &[x, y, w, h] = parts.as_slice() else {
        return Err(format!("'{s}': expected x,y,width,height"));
    };
    TileBox::new(x, y, w, h).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = cli
        .log_level
        .unwrap_or_else(|| level_from_env(LevelFilter::Warn));

    #[cfg(not(feature = "tracing"))]
    tile_meld_core::init_with_level(level)?;
    #[cfg(feature = "tracing")]
    tile_meld_core::init_tracing(false, level);

    match cli.command {
        Command::Meld(args) => run_meld(&args)?,
        Command::Distance(args) => run_distance(&args),
    }
    Ok(())
}

fn build_params(args: &MeldArgs) -> Result<MeldParams, CliError> {
    let mut params = match &args.config {
        Some(path) => MeldParams::load_json(path)?,
        None => MeldParams::default(),
    };
    if let Some(threshold) = args.threshold {
        params.threshold = threshold;
    }
    if args.until_stable {
        params.until_stable = true;
    }
    if let Some(max_passes) = args.max_passes {
        params.max_passes = max_passes;
    }
    if let Some(padding) = args.padding {
        params.crop_padding = padding;
    }
    if !params.threshold.is_finite() || params.threshold < 0.0 {
        return Err(CliError::InvalidThreshold(params.threshold));
    }
    Ok(params)
}

fn run_meld(args: &MeldArgs) -> Result<(), CliError> {
    let params = build_params(args)?;

    let input = MeldInput::load_json(&args.input)?;
    let num_contours = input.contours.len();
    let boxes = input.into_boxes(&params.contour_filter);
    info!("{} boxes ({num_contours} contours)", boxes.len());

    let StableMeld { result, passes } = params.run(&boxes);
    info!(
        "{} melds after {passes} pass(es), did_meld={}",
        result.melds.len(),
        result.did_meld
    );

    let crops = match (&args.image, &args.crop_dir) {
        (Some(image_path), Some(dir)) => {
            let img = crop::load_gray(image_path)?;
            crop::write_crops(&img, &result.melds, params.crop_padding, dir)?
        }
        _ => Vec::new(),
    };

    let report = MeldReport {
        input_path: args.input.to_string_lossy().into_owned(),
        config_path: args
            .config
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        threshold: params.threshold,
        num_contours,
        num_input_boxes: boxes.len(),
        passes,
        did_meld: result.did_meld,
        melds: result.melds,
        crops: crops
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect(),
    };

    match &args.output {
        Some(path) => {
            report.write_json(path)?;
            info!("wrote report JSON to {}", path.display());
        }
        None => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn run_distance(args: &DistanceArgs) {
    let d = args.first.shortest_distance(&args.second);
    println!(
        "distance={d:.3} overlap={}",
        args.first.overlap(&args.second)
    );
}
