mod live;
mod logic;
mod storage;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use hugoland_game::{GameEngine, GameStorage, STORAGE_KEY, resume_rng};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use live::{LiveConfig, run_live};
use logic::reports;
use logic::{GameplayStrategy, Simulation, SimulationConfig, StateSummary};
use storage::FileStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Play the saved game on live timers
    Run,
    /// Fast deterministic play on a virtual clock, nothing touches disk
    Simulate,
    /// Print the saved game
    Status,
    /// Delete the saved game
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "hugoland-cli", version = "0.1.0")]
#[command(about = "Headless Hugoland driver - live play, simulations and save management")]
struct Args {
    #[arg(long, value_enum, default_value_t = RunMode::Simulate)]
    mode: RunMode,

    /// Directory holding the save file
    #[arg(long, default_value = ".hugoland")]
    save_dir: PathBuf,

    /// Seed for new games and the automated player
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Stop live play after this many seconds (run mode)
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Simulated seconds to play (simulate mode)
    #[arg(long, default_value_t = 600)]
    rounds: u32,

    #[arg(long, value_enum, default_value_t = GameplayStrategy::Balanced)]
    strategy: GameplayStrategy,

    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.mode {
        RunMode::Simulate => simulate(&args, &mut output_target)?,
        RunMode::Run => run(&args, &mut output_target).await?,
        RunMode::Status => status(&args, &mut output_target)?,
        RunMode::Reset => reset(&args, &mut output_target)?,
    }

    if args.report == ReportFormat::Console {
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
    }
    output_target.flush_inner()?;
    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` turns on the per-tick debug lines. Logs go to stderr.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🏰 Hugoland".bright_cyan().bold());
    println!("{}", "===========".cyan());
}

fn simulate(args: &Args, out: &mut dyn Write) -> Result<()> {
    let config = SimulationConfig::new(args.strategy, args.seed).with_rounds(args.rounds);
    let report = Simulation::new(config, Utc::now()).run();
    match args.report {
        ReportFormat::Json => reports::generate_json_report(out, &report),
        ReportFormat::Console => reports::generate_console_report(out, &report),
    }
}

async fn run(args: &Args, out: &mut dyn Write) -> Result<()> {
    let engine = GameEngine::new(FileStorage::new(&args.save_dir));
    let config = LiveConfig {
        seed: args.seed,
        strategy: args.strategy,
        duration: args.duration_secs.map(Duration::from_secs),
    };
    if args.report == ReportFormat::Console {
        println!(
            "▶️  Playing as {} (save: {})",
            args.strategy.label().bold(),
            engine.storage().path_for(STORAGE_KEY).display()
        );
    }
    let report = run_live(&engine, config).await?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(out, &report),
        ReportFormat::Console => {
            writeln!(
                out,
                "Stopped ({:?}) after {} actions, {} rejected, {} autosaves",
                report.stopped, report.actions, report.rejected, report.autosaves
            )?;
            reports::write_summary(out, &report.summary)
        }
    }
}

fn status(args: &Args, out: &mut dyn Write) -> Result<()> {
    let engine = GameEngine::new(FileStorage::new(&args.save_dir));
    let now = Utc::now();
    let mut rng = resume_rng(args.seed, now);
    let summary = engine
        .try_load(now, &mut rng)?
        .map(|state| StateSummary::from_state(&state, now));
    match (args.report, summary) {
        (ReportFormat::Json, summary) => reports::generate_json_report(out, &summary),
        (ReportFormat::Console, Some(summary)) => reports::write_summary(out, &summary),
        (ReportFormat::Console, None) => {
            writeln!(
                out,
                "No saved game in {}",
                engine.storage().dir().display()
            )?;
            Ok(())
        }
    }
}

fn reset(args: &Args, out: &mut dyn Write) -> Result<()> {
    let storage = FileStorage::new(&args.save_dir);
    let existed = storage.load_raw(STORAGE_KEY)?.is_some();
    GameEngine::new(storage).delete_save()?;
    match args.report {
        ReportFormat::Json => {
            reports::generate_json_report(out, &serde_json::json!({ "deleted": existed }))
        }
        ReportFormat::Console if existed => {
            writeln!(out, "🗑️  Saved game deleted")?;
            Ok(())
        }
        ReportFormat::Console => {
            writeln!(out, "Nothing to delete")?;
            Ok(())
        }
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
