use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::{Digest, Sha256};

#[derive(Parser, Debug)]
#[command(name = "votive", version)]
struct Cli {
    /// Log pipeline progress at debug level.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the animated candle as a GIF.
    Render(RenderArgs),
    /// Render a single unquantized frame as a PNG.
    Frame(FrameArgs),
    /// Print the wrapped layout as JSON.
    Layout(MessageArgs),
}

#[derive(Args, Debug)]
struct MessageArgs {
    /// Message to render (clamped to 100 characters).
    #[arg(long)]
    message: String,

    /// TTF/OTF font file.
    #[arg(long, default_value = "assets/font.ttf")]
    font: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: MessageArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Render frames on a rayon pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: MessageArgs,

    /// Frame index (0-based, < 8).
    #[arg(long, default_value_t = 0)]
    index: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_input(args: &MessageArgs) -> anyhow::Result<(votive::Candle, votive::ParleyFont)> {
    let font = votive::ParleyFont::load(&args.font)
        .with_context(|| format!("load font '{}'", args.font.display()))?;
    let candle = votive::Candle::new(args.message.trim());
    Ok((candle, font))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (candle, font) = load_input(&args.input)?;
    let opts = votive::GenerateOpts {
        parallel: args.parallel,
        threads: args.threads,
    };
    let bytes = votive::generate_candle_gif_with_opts(&candle, &font, &opts)?;

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    let digest = Sha256::digest(&bytes);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    eprintln!(
        "wrote {} ({} bytes, {}, sha256 {hex})",
        args.out.display(),
        bytes.len(),
        votive::GIF_CONTENT_TYPE
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (candle, font) = load_input(&args.input)?;
    let img = votive::render_preview_frame(&candle, &font, votive::FrameIndex(args.index))?;

    ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: MessageArgs) -> anyhow::Result<()> {
    let (candle, font) = load_input(&args)?;
    let layout = votive::layout_message(&candle, &font)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
