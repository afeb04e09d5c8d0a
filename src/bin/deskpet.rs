use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use deskpet::{
    AnimationCache, AssetCatalog, CodecRegistry, DesktopPet, FrameSize, HeadlessWindow, PetConfig,
    PetRng, PetState, PetWindow, Point, Rect,
};

const PUMP_STEP: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "deskpet", version, about = "Desktop pet behavior engine tools")]
struct Cli {
    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode one sprite file and print its frame timing as JSON.
    Inspect(InspectArgs),
    /// Print the resolved per-state sprite candidates as JSON.
    Catalog(CatalogArgs),
    /// Run a headless pet on a simulated clock and print a behavior summary as JSON.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Sprite file (gif, webp or png).
    file: PathBuf,

    /// Resize every frame to this size, e.g. `128x128`.
    #[arg(long, value_parser = parse_size)]
    reference: Option<FrameSize>,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Sprite directory; searched for near the executable and working directory when omitted.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Sprite directory; searched for near the executable and working directory when omitted.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Simulated run time.
    #[arg(long, default_value_t = 60)]
    seconds: u64,

    /// Random seed; entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct InspectReport {
    path: PathBuf,
    codec: &'static str,
    frames: usize,
    size: FrameSize,
    durations_ms: Vec<u32>,
    total_ms: u64,
}

#[derive(serde::Serialize)]
struct CatalogEntry {
    name: String,
    path: PathBuf,
}

#[derive(serde::Serialize)]
struct SimulationReport {
    seconds: u64,
    seed: Option<u64>,
    reference_size: Option<FrameSize>,
    transitions: u64,
    time_ms: BTreeMap<PetState, u64>,
    frames_advanced: u64,
    final_state: PetState,
    final_position: Point,
    preloaded: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Catalog(args) => cmd_catalog(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_size(s: &str) -> Result<FrameSize, String> {
    FrameSize::parse(s).ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PetConfig> {
    match path {
        Some(path) => Ok(PetConfig::from_path(path)?),
        None => Ok(PetConfig::default()),
    }
}

fn resolve_root(root: Option<PathBuf>, subdir: &str) -> anyhow::Result<PathBuf> {
    if let Some(root) = root {
        anyhow::ensure!(
            root.is_dir(),
            "sprite directory '{}' does not exist",
            root.display()
        );
        return Ok(root);
    }
    let exe = std::env::current_exe().context("locate executable")?;
    let base = exe.parent().unwrap_or_else(|| Path::new("."));
    let cwd = std::env::current_dir().context("read working directory")?;
    deskpet::find_asset_root(subdir, base, &cwd).with_context(|| {
        format!(
            "no '{subdir}' directory near '{}' or '{}'",
            base.display(),
            cwd.display()
        )
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{text}");
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let registry = CodecRegistry::default();
    let codec = registry
        .for_path(&args.file)
        .with_context(|| format!("unsupported sprite '{}'", args.file.display()))?
        .name();
    let anim = deskpet::assets::codec::decode_file(&registry, &args.file, args.reference)?;
    print_json(&InspectReport {
        path: args.file,
        codec,
        frames: anim.frame_count(),
        size: anim.size(),
        durations_ms: anim.durations_ms().to_vec(),
        total_ms: anim.total_duration_ms(),
    })
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let root = resolve_root(args.root, &cfg.assets.subdir)?;
    let catalog = AssetCatalog::build(&root, CodecRegistry::default(), &cfg.assets.catalog);

    let listing: BTreeMap<PetState, Vec<CatalogEntry>> = PetState::ALL
        .into_iter()
        .map(|state| {
            let entries = catalog
                .candidates(state)
                .iter()
                .map(|a| CatalogEntry {
                    name: a.name.clone(),
                    path: a.path.clone(),
                })
                .collect();
            (state, entries)
        })
        .collect();
    print_json(&listing)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let root = resolve_root(args.root, &cfg.assets.subdir)?;
    let mut rng = match args.seed {
        Some(seed) => PetRng::seeded(seed),
        None => PetRng::from_entropy(),
    };

    let catalog = AssetCatalog::build(&root, CodecRegistry::default(), &cfg.assets.catalog);
    let cache = AnimationCache::load_assets(catalog, &cfg.assets, rng.child());
    let cache = Arc::new(cache);
    let reference_size = cache.reference_size();

    let work_area = Rect::new(0.0, 0.0, 1920.0, 1040.0);
    let window = HeadlessWindow::new(
        Point::new(960.0, 520.0),
        reference_size.unwrap_or(FrameSize::new(128, 128)),
        work_area,
    );

    let start = Instant::now();
    let mut pet = DesktopPet::new(&cfg, cache, window, rng, start);
    let transitions = Rc::new(Cell::new(0_u64));
    let counter = Rc::clone(&transitions);
    pet.on_state_entered(move |_| counter.set(counter.get() + 1));

    let mut time_ms: BTreeMap<PetState, u64> =
        PetState::ALL.into_iter().map(|s| (s, 0)).collect();
    let end = start + Duration::from_secs(args.seconds);
    let mut now = start;
    while now < end {
        now += PUMP_STEP;
        pet.pump(now);
        *time_ms.entry(pet.state()).or_default() += PUMP_STEP.as_millis() as u64;
    }

    let preloaded = pet.join_preload();
    let final_position = pet.window().position();
    tracing::info!(transitions = transitions.get(), "simulation finished");
    print_json(&SimulationReport {
        seconds: args.seconds,
        seed: args.seed,
        reference_size,
        transitions: transitions.get(),
        time_ms,
        frames_advanced: pet.player().frames_advanced(),
        final_state: pet.state(),
        final_position,
        preloaded,
    })
}
