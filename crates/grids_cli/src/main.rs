//! grids: CLI tool for rendering and inspecting Grids rhythm patterns
//!
//! Everything runs against a JSON config (see `grids schema`), loaded from
//! `--config`, the `GRIDS_CONFIG` env var, or the user config directory:
//!
//! - `render`: Print the trigger lanes for a number of clock ticks
//! - `takeover`: Simulate a pot sweep and show how the parameter catches up
//! - `params`: List the parameter table with current values
//! - `config`: Print the effective config
//! - `schema`: Print the JSON schema of the config file

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use grids_core::params::{self, PAGES, ParameterIndex, Unit};
use grids_core::takeover::{ParameterHost, TakeoverPot, TakeoverState, scaled_target};
use grids_core::{GridsConfig, OutputMode, output_bits, render_pattern};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Render and inspect Grids rhythm patterns
#[derive(Parser)]
#[command(name = "grids")]
#[command(about = "Render Grids drum and Euclidean patterns and explore the pot takeover")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: auto-detect)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum ModeArg {
    Drums,
    Euclidean,
}

impl From<ModeArg> for OutputMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Drums => OutputMode::Drums,
            ModeArg::Euclidean => OutputMode::Euclidean,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the trigger lanes for a number of clock ticks
    Render {
        /// Clock ticks to render, starting at step 0
        #[arg(short = 'n', long, default_value_t = 32)]
        steps: usize,

        /// Override the output mode
        #[arg(short, long)]
        mode: Option<ModeArg>,

        /// Drum map X position (0-255)
        #[arg(short = 'x', long)]
        x: Option<u8>,

        /// Drum map Y position (0-255)
        #[arg(short = 'y', long)]
        y: Option<u8>,

        /// Drum densities, comma separated (e.g. 255,128,64)
        #[arg(long, value_delimiter = ',')]
        density: Option<Vec<u8>>,

        /// Euclidean lengths, comma separated (1-32)
        #[arg(long, value_delimiter = ',')]
        length: Option<Vec<u8>>,

        /// Euclidean fills, comma separated (0-255)
        #[arg(long, value_delimiter = ',')]
        fill: Option<Vec<u8>>,

        /// Euclidean rotations, comma separated (0-31)
        #[arg(long, value_delimiter = ',')]
        shift: Option<Vec<u8>>,

        /// Seed for the chaos random source
        #[arg(long)]
        seed: Option<u16>,
    },

    /// Simulate a pot sweep over a parameter that does not match the pot
    Takeover {
        /// Parameter name as listed by `grids params`
        #[arg(short, long, default_value = "Density 1")]
        param: String,

        /// Parameter value when the pot is picked up
        #[arg(long)]
        value: i32,

        /// Pot position the sweep starts from (0.0-1.0)
        #[arg(long, default_value_t = 0.0)]
        from: f32,

        /// Pot position the sweep ends at (0.0-1.0)
        #[arg(long, default_value_t = 1.0)]
        to: f32,

        /// UI ticks the sweep takes
        #[arg(short = 'n', long, default_value_t = 50)]
        ticks: usize,
    },

    /// List the parameter table with current values
    Params,

    /// Print the effective config
    Config,

    /// Print the JSON schema of the config file
    Schema,
}

fn default_config_path() -> PathBuf {
    if let Ok(override_path) = std::env::var("GRIDS_CONFIG") {
        return PathBuf::from(override_path);
    }

    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("grids").join("config.json")
}

/// An explicit path must exist; the default location is optional.
fn load_config(explicit: Option<&Path>) -> Result<GridsConfig> {
    if let Some(path) = explicit {
        return GridsConfig::load(path);
    }
    let path = default_config_path();
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading config");
        GridsConfig::load(&path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(GridsConfig::default())
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // Initialize Tracy if profile feature is enabled
    #[cfg(feature = "profile")]
    let registry = registry.with(tracing_tracy::TracyLayer::default());

    registry.init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ─── render ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepRow {
    tick: usize,
    state: u8,
    triggers: [bool; 3],
    accent: bool,
}

/// Hand up to three per-channel values to `set`.
fn apply_list(values: Option<Vec<u8>>, name: &str, mut set: impl FnMut(usize, u8)) -> Result<()> {
    let Some(values) = values else {
        return Ok(());
    };
    if values.len() > 3 {
        bail!("--{name} takes at most 3 values, got {}", values.len());
    }
    for (channel, value) in values.into_iter().enumerate() {
        set(channel, value);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_render(
    mut config: GridsConfig,
    steps: usize,
    mode: Option<ModeArg>,
    x: Option<u8>,
    y: Option<u8>,
    density: Option<Vec<u8>>,
    length: Option<Vec<u8>>,
    fill: Option<Vec<u8>>,
    shift: Option<Vec<u8>>,
    seed: Option<u16>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(mode) = mode {
        config.mode = mode.into();
    }
    if let Some(x) = x {
        config.drums.x = x;
    }
    if let Some(y) = y {
        config.drums.y = y;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    apply_list(density, "density", |ch, v| config.drums.density[ch] = v)?;
    apply_list(length, "length", |ch, v| config.euclidean[ch].length = v)?;
    apply_list(fill, "fill", |ch, v| config.euclidean[ch].fill = v)?;
    apply_list(shift, "shift", |ch, v| config.euclidean[ch].shift = v)?;
    config.validate().context("invalid render options")?;

    let processor = config.build_processor();
    let states = render_pattern(processor.generator(), steps);
    let rows: Vec<StepRow> = states
        .iter()
        .enumerate()
        .map(|(tick, &state)| StepRow {
            tick,
            state,
            triggers: output_bits::TRIGGERS.map(|bit| state & bit != 0),
            accent: state & output_bits::ACCENT != 0,
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => print_lanes(&config, &rows),
    }
    Ok(())
}

fn print_lanes(config: &GridsConfig, rows: &[StepRow]) {
    println!(
        "{} {}",
        "Mode:".bold(),
        config.mode.name().cyan()
    );
    match config.mode {
        OutputMode::Drums => println!(
            "x={} y={} density={:?}",
            config.drums.x, config.drums.y, config.drums.density
        ),
        OutputMode::Euclidean => {
            for (ch, channel) in config.euclidean.iter().enumerate() {
                println!(
                    "ch{} length={} fill={} shift={}",
                    ch + 1,
                    channel.length,
                    channel.fill,
                    channel.shift
                );
            }
        }
    }
    println!("{}", "-".repeat(12 + rows.len() + rows.len() / 8));

    let lanes: [(&str, fn(&StepRow) -> bool); 4] = [
        ("Trig 1", |r| r.triggers[0]),
        ("Trig 2", |r| r.triggers[1]),
        ("Trig 3", |r| r.triggers[2]),
        ("Accent", |r| r.accent),
    ];
    for (name, hit) in &lanes {
        let mut line = format!("{:<10}", name);
        for (i, row) in rows.iter().enumerate() {
            if i > 0 && i % 8 == 0 {
                line.push(' ');
            }
            let cell = if hit(row) {
                "x".green().bold().to_string()
            } else {
                ".".dimmed().to_string()
            };
            line.push_str(&cell);
        }
        println!("{}", line);
    }
}

// ─── takeover ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TakeoverRow {
    tick: usize,
    position: f32,
    target: i32,
    value: i32,
    state: &'static str,
}

fn state_name(state: TakeoverState) -> &'static str {
    match state {
        TakeoverState::HoldingWaitForMove => "holding",
        TakeoverState::RelativelyAdjusting => "catching up",
        TakeoverState::DirectControl => "direct",
    }
}

fn cmd_takeover(
    config: &GridsConfig,
    param: &str,
    value: i32,
    from: f32,
    to: f32,
    ticks: usize,
    format: OutputFormat,
) -> Result<()> {
    let Some(index) = params::find_by_name(param) else {
        bail!("unknown parameter '{param}', see `grids params`");
    };
    if !(0.0..=1.0).contains(&from) || !(0.0..=1.0).contains(&to) {
        bail!("pot positions must be within 0.0-1.0");
    }
    if ticks == 0 {
        bail!("--ticks must be at least 1");
    }

    let mut host = config.to_parameter_values();
    let value = host.set(index, value);
    let scale = index.def().max as f32;
    let mut pot = TakeoverPot::new(0, index);
    pot.configure(index, None, scale, scale);
    pot.update(from, 0, 0, &mut host);
    tracing::debug!(param = index.def().name, value, scale, "pot picked up");

    let mut rows = vec![TakeoverRow {
        tick: 0,
        position: from,
        target: scaled_target(from, scale),
        value,
        state: state_name(pot.state()),
    }];
    for tick in 1..=ticks {
        let position = from + (to - from) * tick as f32 / ticks as f32;
        pot.update(position, 0, 0, &mut host);
        rows.push(TakeoverRow {
            tick,
            position,
            target: scaled_target(position, scale),
            value: host.value(index),
            state: state_name(pot.state()),
        });
    }

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            println!(
                "{} {} held at {} ({}..={})",
                "Parameter:".bold(),
                index.def().name.cyan(),
                value,
                index.def().min,
                index.def().max
            );
            println!(
                "{:>5} {:>9} {:>7} {:>7}  {}",
                "tick", "position", "pot", "value", "state"
            );
            println!("{}", "-".repeat(48));
            for row in &rows {
                let state = match row.state {
                    "direct" => row.state.green(),
                    "catching up" => row.state.yellow(),
                    _ => row.state.dimmed(),
                };
                println!(
                    "{:>5} {:>9.3} {:>7} {:>7}  {}",
                    row.tick, row.position, row.target, row.value, state
                );
            }
        }
    }
    Ok(())
}

// ─── params ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParamRow {
    page: &'static str,
    index: usize,
    name: &'static str,
    min: i32,
    max: i32,
    default: i32,
    value: i32,
    unit: String,
}

fn unit_label(unit: Unit) -> String {
    match unit {
        Unit::None => String::new(),
        Unit::Enum(names) => names.join("/"),
        Unit::CvInput => "input bus".to_string(),
        Unit::CvOutput => "output bus".to_string(),
        Unit::OutputMode => "Add/Replace".to_string(),
    }
}

fn cmd_params(config: &GridsConfig, format: OutputFormat) -> Result<()> {
    let values = &config.to_parameter_values();
    let rows: Vec<ParamRow> = PAGES
        .iter()
        .flat_map(|page| {
            page.params.iter().map(move |&index: &ParameterIndex| {
                let def = index.def();
                ParamRow {
                    page: page.name,
                    index: index.index(),
                    name: def.name,
                    min: def.min,
                    max: def.max,
                    default: def.default,
                    value: values.get(index),
                    unit: unit_label(def.unit),
                }
            })
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            let mut page = "";
            for row in &rows {
                if row.page != page {
                    page = row.page;
                    println!("\n{}", page.bold().underline());
                }
                let value = if row.value == row.default {
                    row.value.to_string().normal()
                } else {
                    row.value.to_string().yellow()
                };
                println!(
                    "{:>3} {:<24} {:>5} {:>4}..={:<4} {}",
                    row.index.to_string().dimmed(),
                    row.name,
                    value,
                    row.min,
                    row.max,
                    row.unit.dimmed()
                );
            }
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // The schema does not depend on any config.
    let config = match cli.command {
        Commands::Schema => GridsConfig::default(),
        _ => load_config(cli.config.as_deref())?,
    };

    match cli.command {
        Commands::Render {
            steps,
            mode,
            x,
            y,
            density,
            length,
            fill,
            shift,
            seed,
        } => cmd_render(
            config, steps, mode, x, y, density, length, fill, shift, seed, cli.format,
        ),
        Commands::Takeover {
            param,
            value,
            from,
            to,
            ticks,
        } => cmd_takeover(&config, &param, value, from, to, ticks, cli.format),
        Commands::Params => cmd_params(&config, cli.format),
        Commands::Config => {
            println!("{}", config.to_json_pretty()?);
            Ok(())
        }
        Commands::Schema => print_json(&GridsConfig::json_schema()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
