//! datasound - Sonification of numeric series

use anyhow::{Context, Result};
use clap::Parser;
use datasound::config::{self, DataSoundConfig};
use datasound::engine::{self, Engine};
use datasound::{build_scale, load_series};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands, MusicArgs};

const CONFIG_FILE: &str = "datasound.yaml";

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configured settings, if any, and apply command-line overrides.
fn resolve_config(args: &MusicArgs) -> Result<DataSoundConfig> {
    let mut cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => DataSoundConfig::default(),
    };

    if let Some(key) = &args.key {
        cfg.music.key = key.clone();
    }
    if let Some(mode) = &args.mode {
        cfg.music.mode = mode.clone();
    }
    if let Some(octaves) = args.octaves {
        cfg.music.octaves = octaves;
    }
    if let Some(period) = args.period {
        cfg.music.period = period;
    }
    if args.chords {
        cfg.music.chords = true;
    }

    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            music,
            instruments,
            tempo,
        } => {
            let mut cfg = resolve_config(&music)?;
            if instruments.is_some() {
                cfg.output.instruments = instruments;
            }
            if let Some(tempo) = tempo {
                cfg.output.tempo = tempo;
            }
            cfg.validate()?;

            let series = load_series(&input)
                .with_context(|| format!("failed to load series from {:?}", input))?;
            let engine = Engine::new(&cfg)?;
            let bytes = engine.render(&series)?;
            let path = engine::save(&output, &bytes)?;

            let (rows, columns) = series.shape();
            println!(
                "Rendered {} x {} values in {} {} to {:?}",
                rows, columns, cfg.music.key, cfg.music.mode, path
            );
        }

        Commands::Scale { key, mode, octaves } => {
            let scale = build_scale(&key, &mode, octaves)?;
            println!("{}", scale.notes().join(" "));
        }

        Commands::Notes { input, music } => {
            let cfg = resolve_config(&music)?;
            cfg.validate()?;

            let series = load_series(&input)
                .with_context(|| format!("failed to load series from {:?}", input))?;
            let engine = Engine::new(&cfg)?;
            for (i, row) in series.rows().iter().enumerate() {
                match engine.note_tokens(row)? {
                    Some(tokens) => println!("{}", tokens),
                    None => println!("# row {}: no data", i),
                }
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Key: {}", cfg.music.key);
                    println!("  Mode: {}", cfg.music.mode);
                    println!("  Octaves: {}", cfg.music.octaves);
                    if cfg.music.chords {
                        println!("  Chords: every {} values", cfg.music.period);
                    }
                    println!("  Tempo: {} BPM", cfg.output.tempo);
                    println!("  Velocity: {}", cfg.output.velocity);
                    match &cfg.output.instruments {
                        Some(programs) => println!("  Instruments: {:?}", programs),
                        None => println!("  Instruments: piano"),
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../datasound.example.yaml");

            if std::path::Path::new(CONFIG_FILE).exists() {
                println!("{} already exists. Not overwriting.", CONFIG_FILE);
            } else {
                std::fs::write(CONFIG_FILE, example_config)?;
                println!("Created {} with example configuration.", CONFIG_FILE);
            }
        }
    }

    Ok(())
}
