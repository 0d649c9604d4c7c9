use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use orrery_config::{EngineConfig, ForceStrategy};
use orrery_kernel::{FixedTimestep, GRAVITATIONAL_CONSTANT, Scenario};
use orrery_tools::{BodyInfo, OperationStats, PerformanceMonitor, WorldInspector, WorldSummary};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orrery", about = "N-body gravity simulation driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run a built-in scenario
    Run(RunArgs),
    /// Write the default config as JSON
    ConfigInit {
        #[arg(short, long, default_value = "orrery.json")]
        out: PathBuf,
    },
    /// Load and validate a config file
    ConfigCheck { path: PathBuf },
}

#[derive(Args)]
struct RunArgs {
    #[arg(short, long, value_enum, default_value_t = ScenarioArg::EarthMoon)]
    scenario: ScenarioArg,
    /// Body count for the cluster scenario
    #[arg(short = 'n', long, default_value = "100")]
    count: usize,
    /// RNG seed for the cluster scenario
    #[arg(long, default_value = "42")]
    seed: u64,
    /// Number of iterations: fixed steps, or frames with --frame-dt
    #[arg(long, default_value = "3600")]
    steps: u64,
    /// Fixed step length in seconds (defaults to the config's fixed_timestep).
    /// Without --frame-dt every iteration is exactly one step of this length
    /// and the config's time_scale and max_timestep do not apply.
    #[arg(long)]
    dt: Option<f64>,
    /// Feed this frame delta to the fixed-timestep driver each iteration,
    /// applying the config's max_timestep clamp and time_scale
    #[arg(long)]
    frame_dt: Option<f64>,
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Force the parallel force strategy
    #[arg(long)]
    parallel: bool,
    /// Log a world summary every N iterations (0 disables)
    #[arg(long, default_value = "0")]
    report_every: u64,
    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScenarioArg {
    EarthMoon,
    Cluster,
}

#[derive(Serialize)]
struct RunReport {
    scenario: &'static str,
    strategy: &'static str,
    dt: f64,
    time_scale: Option<f64>,
    iterations: u64,
    steps: u64,
    state_hash: String,
    summary: WorldSummary,
    bodies: Vec<BodyInfo>,
    timings: Vec<OperationStats>,
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose { "debug" } else { level };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info => {
            init_logging(cli.verbose, "info");
            println!("orrery v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", orrery_common::crate_info());
            println!(
                "kernel: {} (G={GRAVITATIONAL_CONSTANT:e})",
                orrery_kernel::crate_info()
            );
            println!("config: {}", orrery_config::crate_info());
            println!("tools: {}", orrery_tools::crate_info());
        }
        Commands::Run(args) => {
            let mut config = load_config(args.config.as_ref())?;
            init_logging(cli.verbose, &config.log_level());
            if args.parallel {
                config.simulation.force_strategy = ForceStrategy::Parallel;
            }
            run(&config, &args)?;
        }
        Commands::ConfigInit { out } => {
            init_logging(cli.verbose, "info");
            EngineConfig::default()
                .save(&out)
                .with_context(|| format!("writing config {}", out.display()))?;
            println!("Wrote default config to {}", out.display());
        }
        Commands::ConfigCheck { path } => {
            init_logging(cli.verbose, "info");
            let config = load_config(Some(&path))?;
            println!(
                "{}: OK (G={:e}, dt={}, strategy={:?}, max_objects={})",
                path.display(),
                config.physics.gravity.constant,
                config.physics.time.fixed_timestep,
                config.simulation.force_strategy,
                config.simulation.max_objects,
            );
        }
    }

    Ok(())
}

/// Fixed-step driver from the config, with `--dt` replacing its step length.
fn driver(config: &EngineConfig, dt: Option<f64>) -> anyhow::Result<FixedTimestep> {
    let time = &config.physics.time;
    let driver = match dt {
        Some(dt) => FixedTimestep::new(dt, time.max_timestep, time.time_scale)
            .context("invalid --dt")?,
        None => config.timestep()?,
    };
    Ok(driver)
}

fn run(config: &EngineConfig, args: &RunArgs) -> anyhow::Result<()> {
    let scenario = match args.scenario {
        ScenarioArg::EarthMoon => Scenario::EarthMoon,
        ScenarioArg::Cluster => Scenario::Cluster {
            count: args.count,
            seed: args.seed,
        },
    };
    let mut timestep = driver(config, args.dt)?;
    let dt = timestep.fixed_dt();
    let g = config.physics.gravity.constant;

    let simulator = config.build_simulator()?;
    let mut world = config.new_world();
    scenario
        .populate(&mut world)
        .with_context(|| format!("loading scenario {}", scenario.name()))?;

    let profiling = &config.debug.profiling;
    let mut monitor = PerformanceMonitor::new(profiling.sample_window);
    monitor.set_enabled(profiling.enabled);

    tracing::info!(
        scenario = scenario.name(),
        strategy = simulator.strategy_name(),
        bodies = world.body_count(),
        dt,
        frame_dt = args.frame_dt,
        iterations = args.steps,
        "run started"
    );

    for iteration in 1..=args.steps {
        match args.frame_dt {
            Some(frame_dt) => {
                monitor.measure("frame", || {
                    timestep.advance(&simulator, &mut world, frame_dt)
                });
            }
            None => monitor.measure("step", || simulator.step(&mut world, dt)),
        }
        if args.report_every > 0 && iteration % args.report_every == 0 {
            let summary = WorldInspector::summary(&world, g);
            tracing::info!(
                tick = summary.tick,
                elapsed = summary.elapsed,
                energy = summary.total_energy,
                momentum = summary.momentum.magnitude(),
                "progress"
            );
        }
    }
    monitor.log_report();

    let report = RunReport {
        scenario: scenario.name(),
        strategy: simulator.strategy_name(),
        dt,
        time_scale: args.frame_dt.map(|_| timestep.time_scale()),
        iterations: args.steps,
        steps: world.tick(),
        state_hash: format!("{:#018x}", world.state_hash()),
        summary: WorldInspector::summary(&world, g),
        bodies: WorldInspector::list_bodies(&world),
        timings: monitor.report(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Ran {} ({} strategy): {} steps of {}s over {} iterations",
            report.scenario, report.strategy, report.steps, report.dt, report.iterations
        );
        println!("{}", report.summary);
        println!("state hash: {}", report.state_hash);
        for body in report.bodies.iter().take(10) {
            println!("  {body}");
        }
        if report.bodies.len() > 10 {
            println!("  ... {} more", report.bodies.len() - 10);
        }
        for stats in &report.timings {
            println!("  {stats}");
        }
    }
    Ok(())
}
