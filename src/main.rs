use clap::{Parser, Subcommand};
use img_resize::imaging::{self, Filter, ImageHandle, Mime, Quality, ResizeSpec};
use img_resize::{config, output};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "img-resize")]
#[command(about = "Orientation-aware image resizing")]
#[command(long_about = "\
Orientation-aware image resizing

Decodes JPEG, PNG, GIF or WebP, turns the image upright from its EXIF
orientation, resizes it and encodes the result.

Fit policy when both -W and -H are given:

  letterbox (default)  whole image visible, transparent padding
  --crop               target box covered, overflow cut off

With only one of -W / -H the other follows the source aspect ratio.
With neither, the image is re-encoded at its own size.

Settings are read from img-resize.toml when present; flags override it.
Run 'img-resize gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (a missing file means stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Source image
    input: PathBuf,

    /// Destination file (omit to write the encoded bytes to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Target height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Cover the target box and crop the overflow instead of letterboxing
    #[arg(long)]
    crop: bool,

    /// Output format: jpeg, png, gif, webp (or image/...)
    #[arg(long)]
    format: Option<Mime>,

    /// JPEG quality, 1-100
    #[arg(long)]
    quality: Option<u32>,

    /// Resampling filter: triangle, catmull-rom, gaussian, lanczos3
    #[arg(long)]
    filter: Option<Filter>,

    /// Watermark image stamped bottom-left before resizing
    #[arg(long)]
    watermark: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Resize an image
    Resize(ResizeArgs),
    /// Show format, size, colour mode and orientation of an image
    Info {
        /// Image to inspect
        input: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a stock img-resize.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Resize(args) => {
            let tool_config = config::load_config(&cli.config)?;
            run_resize(&tool_config, &args)?;
        }
        Command::Info { input, json } => {
            let handle = ImageHandle::open(&input)?;
            let info = output::ImageInfo::from(handle.image());
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                output::print_info(&input, &info);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_resize(
    tool_config: &config::ToolConfig,
    args: &ResizeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = build_spec(tool_config, args);
    let mut handle = ImageHandle::open(&args.input)?;
    let from = (handle.width(), handle.height());

    let watermark = args
        .watermark
        .as_deref()
        .or(tool_config.watermark.file.as_deref())
        .map(|path| (path, handle.apply_watermark_with(path, spec.filter)));

    let to = imaging::complete_dimensions(from, spec.width, spec.height).unwrap_or(from);
    let bytes = handle.save(args.output.as_deref(), &spec)?;
    if let Some(bytes) = bytes {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
    }

    output::print_resize(&output::ResizeSummary {
        source: &args.input,
        destination: args.output.as_deref(),
        from,
        to,
        extend: spec.extend,
        watermark,
    });
    Ok(())
}

/// Config file values with command-line flags layered on top.
fn build_spec(tool_config: &config::ToolConfig, args: &ResizeArgs) -> ResizeSpec {
    let base = tool_config.resize_spec();
    ResizeSpec {
        width: args.width,
        height: args.height,
        extend: base.extend && !args.crop,
        format: args.format.or(base.format),
        quality: args.quality.map(Quality::new).unwrap_or(base.quality),
        filter: args.filter.unwrap_or(base.filter),
    }
}

