use std::ffi::OsString;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use singularity::{
    ProcessDelegate, ProcessDelegateOpts, SceneComposer, SceneConfig, SceneContext,
    SceneDocument, SingularityError, is_renderer_on_path,
};

#[derive(Parser, Debug)]
#[command(name = "singularity", version, about = "Procedural black hole scene builder")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the scene and write its document as JSON.
    Build(BuildArgs),
    /// Build the scene and render the animation (plus the preview still).
    Render(RenderArgs),
    /// Build the scene and render only the preview still.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Config JSON overriding the defaults.
    config: Option<PathBuf>,

    /// Write the scene document here instead of stdout.
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Seed for placeholder colors.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct RendererArgs {
    /// Renderer executable; receives the render job JSON path as its last argument.
    #[arg(long)]
    renderer: OsString,

    /// Extra argument passed to the renderer before the job path (repeatable).
    #[arg(long = "renderer-arg", allow_hyphen_values = true)]
    renderer_args: Vec<OsString>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Config JSON overriding the defaults.
    config: Option<PathBuf>,

    #[command(flatten)]
    renderer: RendererArgs,

    /// Skip the preview still even if the config requests one.
    #[arg(long)]
    no_preview: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Config JSON overriding the defaults.
    config: Option<PathBuf>,

    #[command(flatten)]
    renderer: RendererArgs,

    /// Output PNG path; defaults to the config's preview path.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(p) => {
            SceneConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))
        }
        None => {
            let cwd = std::env::current_dir().context("resolve current directory")?;
            Ok(SceneConfig::defaults(cwd))
        }
    }
}

fn make_delegate(args: &RendererArgs) -> anyhow::Result<ProcessDelegate> {
    if !is_renderer_on_path(&args.renderer) {
        return Err(SingularityError::missing_host(format!(
            "renderer '{}' cannot be run",
            args.renderer.to_string_lossy()
        ))
        .into());
    }
    let opts = args
        .renderer_args
        .iter()
        .fold(ProcessDelegateOpts::new(args.renderer.clone()), |o, a| {
            o.arg(a.clone())
        });
    Ok(ProcessDelegate::new(opts))
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let mut composer = SceneComposer::from_config(&config)?;
    if let Some(seed) = args.seed {
        composer = composer.with_placeholder_seed(seed);
    }

    let mut ctx = SceneContext::new();
    composer.build(&mut ctx).context("build scene")?;
    let doc = SceneDocument::capture(&ctx);

    match args.dump {
        Some(path) => {
            doc.write_json(&path)?;
            tracing::info!(path = %path.display(), "scene document written");
        }
        None => {
            let json = doc.to_json_pretty()?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("write scene document to stdout")?;
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut delegate = make_delegate(&args.renderer)?;
    let config = load_config(args.config.as_ref())?;
    let mut composer = SceneComposer::from_config(&config)?;
    if args.no_preview {
        composer = composer.with_preview(None);
    }

    let mut ctx = SceneContext::new();
    composer.build(&mut ctx).context("build scene")?;
    composer
        .render(&mut ctx, &mut delegate)
        .context("render scene")?;
    eprintln!("wrote {}", config.output_path().display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut delegate = make_delegate(&args.renderer)?;
    let config = load_config(args.config.as_ref())?;
    let out = args
        .out
        .or_else(|| config.preview_path())
        .context("no preview path: pass --out or set render.preview_path")?;

    let mut composer = SceneComposer::from_config(&config)?;
    let mut ctx = SceneContext::new();
    composer.build(&mut ctx).context("build scene")?;
    composer
        .preview(&mut ctx, &mut delegate, &out)
        .context("render preview")?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
