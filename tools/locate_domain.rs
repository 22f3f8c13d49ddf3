// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Domain Lookup Tool

Prints which RAMSES domain (CPU) owns each given position of a snapshot.

Usage:
  cargo run --bin locate_domain -- [options] <info_XXXXX.txt> <x> <y> <z> [<x> <y> <z> ...]

Options:
  --config <file>          Configuration file (default: search for ramses_locator.toml)
  --bit-length <n>         Bits per axis for key computation (1..=17, default:
                           the snapshot's key resolution)
  --policy reject|clamp    Handling of coordinates outside [0, 1)
  --debug-<crate>          Debug logging for one crate (see --help)

Coordinates are normalized to the box, each in [0, 1). The info file may be
omitted when `snapshot.info_path` is configured.

Example:
  cargo run --bin locate_domain -- output_00042/info_00042.txt 0.5 0.5 0.5 0.1 0.9 0.3
*/

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ramses_locator::config::{self, RamsesConfig};
use ramses_locator::domain::SnapshotInfo;
use ramses_locator::hilbert::Point;
use ramses_locator::observability::{
    debug_flags_help, init_logging, parse_debug_flags, LogFormat, LoggingOptions,
};
use tracing::{debug, warn};

/// Parsed command line
struct Args {
    config_path: Option<PathBuf>,
    overrides: HashMap<String, String>,
    positional: Vec<String>,
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [--config <file>] [--bit-length <n>] [--policy reject|clamp] [--debug-<crate>|--debug-all] <info_XXXXX.txt> <x> <y> <z> [<x> <y> <z> ...]",
        program
    );
    eprintln!("\nExample:");
    eprintln!("  {} output_00042/info_00042.txt 0.5 0.5 0.5", program);
    eprintln!();
    eprint!("{}", debug_flags_help());
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut config_path = None;
    let mut overrides = HashMap::new();
    let mut positional = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().context("--config needs a file path")?;
                config_path = Some(PathBuf::from(value));
            }
            "--bit-length" => {
                let value = iter.next().context("--bit-length needs a value")?;
                overrides.insert("bit_length".to_string(), value.clone());
            }
            "--policy" => {
                let value = iter.next().context("--policy needs a value")?;
                overrides.insert("coordinate_policy".to_string(), value.clone());
            }
            // Handled by parse_debug_flags
            flag if flag.starts_with("--debug-") => {}
            flag if flag.starts_with("--") && flag.parse::<f64>().is_err() => {
                bail!("Unknown option '{}'", flag);
            }
            _ => positional.push(arg.clone()),
        }
    }

    Ok(Args {
        config_path,
        overrides,
        positional,
    })
}

/// File (explicit or discovered) -> environment -> command line.
///
/// Without any config file the built-in defaults are used.
fn load_configuration(args: &Args) -> Result<RamsesConfig> {
    let config_file = match &args.config_path {
        Some(path) => Some(path.clone()),
        None => config::find_config_file().ok(),
    };

    let config = match config_file {
        Some(path) => config::load_config(Some(path.as_path()), Some(&args.overrides))
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => {
            let mut config = RamsesConfig::default();
            config::apply_environment_overrides(&mut config);
            config::apply_cli_overrides(&mut config, &args.overrides);
            config
        }
    };

    config::validate_config(&config)?;
    Ok(config)
}

/// Info file from the command line, else from the configuration
fn split_positional<'a>(
    positional: &'a [String],
    config: &RamsesConfig,
) -> Result<(PathBuf, &'a [String])> {
    if positional.len() % 3 == 1 {
        return Ok((PathBuf::from(&positional[0]), &positional[1..]));
    }
    match (&config.snapshot.info_path, positional.len() % 3) {
        (Some(path), 0) => Ok((path.clone(), positional)),
        (None, 0) => bail!("No info file given and snapshot.info_path is not configured"),
        _ => bail!("Coordinates must come in x y z triples"),
    }
}

fn parse_points(coordinates: &[String]) -> Result<Vec<Point>> {
    if coordinates.is_empty() {
        bail!("No coordinates given");
    }
    coordinates
        .chunks(3)
        .map(|triple| {
            let mut axes = [0.0; 3];
            for (axis, text) in axes.iter_mut().zip(triple) {
                *axis = text
                    .parse::<f64>()
                    .with_context(|| format!("Invalid coordinate '{}'", text))?;
            }
            Ok(Point::from(axes))
        })
        .collect()
}

fn run(args: &[String]) -> Result<()> {
    let parsed = parse_args(args)?;
    let config = load_configuration(&parsed)?;

    let options = LoggingOptions {
        default_level: config.logging.level.clone(),
        format: config
            .logging
            .format
            .parse::<LogFormat>()
            .map_err(anyhow::Error::msg)?,
        log_dir: config.logging.log_dir.clone(),
        ..LoggingOptions::default()
    };
    let _guard = init_logging(&parse_debug_flags(), &options)?;

    let (info_path, coordinates) = split_positional(&parsed.positional, &config)?;
    let points = parse_points(coordinates)?;
    debug!(points = points.len(), info = %info_path.display(), "Parsed command line");

    let info = load_snapshot(&info_path, config.snapshot.require_hilbert_ordering)?;
    let indexer = config.hilbert.build_indexer(info.key_bit_length())?;
    if info.key_bit_length() > info.required_key_bits() {
        warn!(
            "Snapshot keys have {} bits per axis; lookups use the exact-key limit of {}",
            info.key_bit_length(),
            info.required_key_bits()
        );
    }

    let keys = indexer.compute_keys(&points)?;
    let domains = keys
        .iter()
        .map(|key| info.domain_of_key(*key))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Cannot resolve domains in '{}'", info_path.display()))?;

    let header = info.header();
    match info.snapshot_number() {
        Ok(number) => println!("snapshot  {:05}", number),
        Err(_) => println!("snapshot  (unnumbered)"),
    }
    println!("ncpu      {}", header.ncpu);
    println!("levelmin  {}", header.levelmin);
    println!("levelmax  {}", header.levelmax);
    println!("time      {}", header.time);
    println!("aexp      {}", header.aexp);
    println!("ordering  {}", info.ordering_type());
    println!("bits      {}", indexer.bit_length());
    println!();
    println!("x y z key domain");
    for ((point, key), domain) in points.iter().zip(&keys).zip(&domains) {
        println!("{} {} {} {} {}", point.x, point.y, point.z, key, domain);
    }

    Ok(())
}

fn load_snapshot(path: &Path, require_hilbert: bool) -> Result<SnapshotInfo> {
    let info = SnapshotInfo::from_file(path)?;
    if require_hilbert {
        info.ensure_hilbert_ordering()?;
    }
    Ok(info)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("locate_domain");

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
