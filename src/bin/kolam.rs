use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use kolam::{DatasetOptions, Player, PlayerConfig, RecordingSurface, StrokeFile, VirtualClock};

type CliPlayer = Player<VirtualClock, RecordingSurface>;

#[derive(Parser, Debug)]
#[command(name = "kolam", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Raise log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a sequence to the end, optionally writing the final surface as a PNG.
    Play(PlayArgs),
    /// Step forward `n` times and write the surface as a PNG.
    Frame(FrameArgs),
    /// Print classification and geometry of a sequence.
    Inspect(InspectArgs),
    /// Write the built-in demo sequence as JSON.
    Demo(DemoArgs),
    /// Generate a synthetic training set of stroke files.
    Dataset(DatasetArgs),
}

#[derive(Args, Debug)]
struct PlayerOpts {
    /// Input stroke JSON. The built-in demo is used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Player config JSON; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Step delay in milliseconds (clamped to 5..=200).
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for particle randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with grid dots hidden.
    #[arg(long)]
    no_grid: bool,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    player: PlayerOpts,

    /// Output PNG path for the final surface.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Sleep until each timer is due instead of running on a virtual clock.
    #[arg(long)]
    realtime: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    player: PlayerOpts,

    /// Number of steps to render.
    #[arg(long)]
    step: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    player: PlayerOpts,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct DatasetArgs {
    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of files to write.
    #[arg(long, default_value_t = 200)]
    count: usize,

    /// Grid spacing in pixels; deltas are divided by it.
    #[arg(long, default_value_t = 40.0)]
    spacing: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match cli.cmd {
        Command::Play(args) => cmd_play(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Demo(args) => cmd_demo(args),
        Command::Dataset(args) => cmd_dataset(args),
    }
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let max_level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_max_level(max_level)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .context("install tracing subscriber")
}

fn load_config(opts: &PlayerOpts) -> anyhow::Result<PlayerConfig> {
    let mut cfg = match &opts.config {
        Some(path) => PlayerConfig::open(path)?,
        None => PlayerConfig::default(),
    };
    if let Some(ms) = opts.speed {
        cfg.step_delay_ms = ms;
    }
    if let Some(seed) = opts.seed {
        cfg.seed = seed;
    }
    if opts.no_grid {
        cfg.grid.visible = false;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_player(opts: &PlayerOpts) -> anyhow::Result<CliPlayer> {
    let cfg = load_config(opts)?;
    let mut player = Player::new(cfg, VirtualClock::new(), RecordingSurface::new())?;
    match &opts.in_path {
        Some(path) => player
            .load_path(path)
            .with_context(|| format!("load sequence '{}'", path.display()))?,
        None => player.load_demo(),
    }
    Ok(player)
}

fn write_snapshot(player: &CliPlayer, out: &Path) -> anyhow::Result<()> {
    let cfg = player.config();
    let frame = kolam::rasterize(player.surface(), cfg.canvas, cfg.background)?;
    kolam::save_png(&frame, out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut player = build_player(&args.player)?;
    player.play();
    if args.realtime {
        while let Some(due) = player.scheduler().next_due() {
            let wait = due.saturating_sub(player.scheduler().now_ms());
            std::thread::sleep(Duration::from_millis(wait));
            player.advance_to(due);
        }
    } else {
        player.run_until_idle(usize::MAX);
    }
    eprintln!("{}", player.progress());

    if let Some(out) = &args.out {
        write_snapshot(&player, out)?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut player = build_player(&args.player)?;
    for _ in 0..args.step {
        if !player.step_forward() {
            break;
        }
    }
    eprintln!("{}", player.progress());
    write_snapshot(&player, &args.out)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.player)?;
    let file = match &args.player.in_path {
        Some(path) => StrokeFile::open(path)
            .with_context(|| format!("load sequence '{}'", path.display()))?,
        None => kolam::demo_file(),
    };
    let normalized = kolam::normalize(&file.seq, &cfg.normalize);
    let resolved = kolam::resolve(&normalized.sequence, cfg.start_point(), &cfg.resolve);

    println!("label: {}", file.label.as_deref().unwrap_or("-"));
    match normalized.sample_mean {
        Some(mean) => println!("units: {:?} (sample mean {mean:.3})", normalized.class),
        None => println!("units: {:?}", normalized.class),
    }
    println!("start: {:?}", resolved.start);
    println!("steps: {}", normalized.sequence.len());
    println!("strokes: {}", normalized.sequence.stroke_count());
    println!("dots: {}", file.dots.len());
    match resolved.bounds() {
        Some(r) => println!(
            "bounds: ({:.1}, {:.1}) - ({:.1}, {:.1})",
            r.x0, r.y0, r.x1, r.y1
        ),
        None => println!("bounds: -"),
    }
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    kolam::demo_file().save(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_dataset(args: DatasetArgs) -> anyhow::Result<()> {
    let opts = DatasetOptions {
        count: args.count,
        spacing: args.spacing,
        seed: args.seed,
        ..DatasetOptions::default()
    };
    let paths = kolam::generate_dataset(&args.out_dir, &opts)?;
    eprintln!("wrote {} files to {}", paths.len(), args.out_dir.display());
    Ok(())
}
