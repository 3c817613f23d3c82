//! Undercroft - Entry Point
//!
//! Command line front end: generate a dungeon and print it, or render a
//! previously saved one.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use undercroft::world::generation::generate_with_stats;
use undercroft::{Dungeon, DungeonRng, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(name = "undercroft", version, about = "Rooms and mazes dungeon generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one dungeon
    Generate {
        /// RNG seed; drawn from entropy when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// RON file with generator settings (missing fields take defaults)
        #[arg(short, long, conflicts_with = "compact")]
        config: Option<PathBuf>,

        /// Small 10x30 preset
        #[arg(long)]
        compact: bool,

        #[arg(short, long, value_enum, default_value_t = Format::Ascii)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the map and room list of a saved dungeon
    Render {
        /// Dungeon JSON produced by `generate --format json`
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Map with a row gutter
    Ascii,
    /// Sparse cell-type buckets plus rooms
    Json,
    /// Per stage statistics followed by the map
    Stats,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            seed,
            config,
            compact,
            format,
            output,
        } => run_generate(seed, config, compact, format, output),
        Command::Render { file } => run_render(file),
    }
}

fn run_generate(
    seed: Option<u64>,
    config: Option<PathBuf>,
    compact: bool,
    format: Format,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = match config {
        Some(path) => GeneratorConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if compact => GeneratorConfig::compact(),
        None => GeneratorConfig::default(),
    };

    let mut rng = match seed {
        Some(seed) => DungeonRng::new(seed),
        None => {
            let rng = DungeonRng::from_entropy();
            log::info!("Using random seed {}", rng.seed());
            rng
        }
    };

    let (dungeon, stats) = generate_with_stats(&config, &mut rng)
        .with_context(|| format!("Failed to generate dungeon from seed {}", rng.seed()))?;

    let text = match format {
        Format::Ascii => describe(&dungeon),
        Format::Json => dungeon.to_json_pretty().context("Failed to serialize dungeon")?,
        Format::Stats => {
            let mut text = format!("{:#?}\n", stats);
            text.push_str(&describe(&dungeon));
            text
        }
    };

    match output {
        Some(path) => {
            fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Dungeon written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn run_render(file: PathBuf) -> Result<()> {
    let json = fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    let dungeon =
        Dungeon::from_json(&json).with_context(|| format!("Failed to parse dungeon from {}", file.display()))?;
    print!("{}", describe(&dungeon));
    Ok(())
}

/// Map followed by the numbered room list
fn describe(dungeon: &Dungeon) -> String {
    let mut out = dungeon.render();
    for (idx, room) in dungeon.rooms().iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", idx + 1, room));
    }
    if let Some(entrance) = dungeon.entrance() {
        out.push_str(&format!("Entrance: {}\n", entrance.coord));
    }
    out
}
