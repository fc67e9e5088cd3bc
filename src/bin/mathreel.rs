use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mathreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene to a video file (requires the encoder on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Check a scene and print every issue found.
    Validate(SceneArg),
    /// Print every object's state at a given time as JSON.
    Eval(EvalArgs),
}

#[derive(Args, Debug)]
struct SceneArg {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Global easing applied to frame progress.
    #[arg(long, value_enum, default_value_t = EaseChoice::Linear)]
    easing: EaseChoice,

    /// Program that turns the markup overlay source into vector markup; the source is passed as
    /// its last argument. Without it the source must already be markup.
    #[arg(long)]
    markup_compiler: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArg,

    #[command(flatten)]
    output: OutputArgs,

    /// Output video path. Defaults to a unique name inside `--out-dir`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory for uniquely named outputs.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Encoder preset.
    #[arg(long, default_value = "medium")]
    preset: String,

    /// Constant rate factor (0-51).
    #[arg(long, default_value_t = 23)]
    crf: u8,

    /// Encoder executable.
    #[arg(long, default_value = "ffmpeg")]
    encoder: String,

    /// Refuse to replace an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArg,

    #[command(flatten)]
    output: OutputArgs,

    /// Scene time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct EvalArgs {
    #[command(flatten)]
    scene: SceneArg,

    /// Scene time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EaseChoice {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl From<EaseChoice> for mathreel::Ease {
    fn from(e: EaseChoice) -> Self {
        match e {
            EaseChoice::Linear => Self::Linear,
            EaseChoice::EaseIn => Self::EaseIn,
            EaseChoice::EaseOut => Self::EaseOut,
            EaseChoice::EaseInOut => Self::EaseInOut,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Eval(args) => cmd_eval(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<mathreel::AnimationScene> {
    Ok(mathreel::AnimationScene::from_path(path)?)
}

fn session_opts(output: &OutputArgs) -> mathreel::RenderSessionOpts {
    mathreel::RenderSessionOpts {
        width: output.width,
        height: output.height,
        fps: output.fps,
        easing: output.easing.into(),
        ..mathreel::RenderSessionOpts::default()
    }
}

fn make_session(
    scene: mathreel::AnimationScene,
    opts: mathreel::RenderSessionOpts,
    markup_compiler: Option<&str>,
) -> anyhow::Result<mathreel::RenderSession> {
    let session = match markup_compiler {
        Some(program) => {
            mathreel::RenderSession::new(scene, opts, &mathreel::CommandCompiler::new(program))?
        }
        None => mathreel::RenderSession::new(scene, opts, &mathreel::PassthroughCompiler)?,
    };
    Ok(session)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<ExitCode> {
    let scene = read_scene(&args.scene.in_path)?;

    let mut opts = session_opts(&args.output);
    opts.preset = args.preset;
    opts.crf = args.crf;
    opts.program = args.encoder;
    opts.out_path = args.out;
    opts.overwrite = !args.no_overwrite;
    if let Some(dir) = args.out_dir {
        opts.out_dir = dir;
    }

    if !mathreel::is_encoder_available(&opts.program) {
        anyhow::bail!("encoder '{}' was not found on PATH", opts.program);
    }

    let session = make_session(scene, opts, args.output.markup_compiler.as_deref())?;
    let out = session.render_to_video()?;
    println!("{}", out.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<ExitCode> {
    let scene = read_scene(&args.scene.in_path)?;
    let session = make_session(
        scene,
        session_opts(&args.output),
        args.output.markup_compiler.as_deref(),
    )?;
    let frame = session.render_frame_at(args.time)?;

    mathreel::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(args: SceneArg) -> anyhow::Result<ExitCode> {
    let scene = read_scene(&args.in_path)?;
    let issues = mathreel::validate_issues(&scene);
    for issue in &issues {
        println!("{issue}");
    }
    if issues.iter().any(mathreel::ValidationIssue::is_error) {
        return Ok(ExitCode::FAILURE);
    }
    eprintln!("{}: ok", args.in_path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<ExitCode> {
    let scene = read_scene(&args.scene.in_path)?;
    let states = mathreel::evaluate_scene(&scene, args.time);
    let json = serde_json::to_string_pretty(&states).context("serialize object states")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}
