//! stream-runner: headless driver for named random-number streams.
//!
//! Usage:
//!   stream-runner --entities 100 --realizations 8 --dist uniform
//!   stream-runner --catalog particles.json --ptype quarks --purpose step --tee run.bin
//!   stream-runner --source run.bin --entities 6 --realizations 2
//!   stream-runner --dump run.bin

use anyhow::{bail, Context, Result};
use log::info;
use mcprng_core::{dump_all, Distribution, NamedPrng, ParticleCatalog};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return Ok(());
    }

    if let Some(path) = find_arg(&args, "--dump") {
        let values = dump_all(&path).with_context(|| format!("reading stream {path}"))?;
        println!("{} values in {path}", values.len());
        for (index, value) in values.iter().enumerate() {
            println!("{index:8}  {value}");
        }
        return Ok(());
    }

    let entities = parse_arg(&args, "--entities", 16usize);
    let realization_count = parse_arg(&args, "--realizations", 1u64);
    let dist_name = parse_arg(&args, "--dist", "uniform".to_string());
    let mean = parse_arg(&args, "--mean", 0.0f64);
    let std = parse_arg(&args, "--std", 1.0f64);
    let ptype = parse_arg(&args, "--ptype", "walkers".to_string());
    let purpose = parse_arg(&args, "--purpose", "step".to_string());
    let only_used = args.iter().any(|arg| arg == "--only-used");

    let distribution = match dist_name.as_str() {
        "uniform" => Distribution::Uniform,
        "normal" => Distribution::Normal { mean, std },
        other => bail!("unknown distribution '{other}' (try uniform or normal)"),
    };

    let catalog = match find_arg(&args, "--catalog") {
        Some(path) => {
            ParticleCatalog::from_file(&path).with_context(|| format!("loading catalog {path}"))?
        }
        None => ParticleCatalog::from_counts([(ptype.clone(), entities)]),
    };

    let mut engine = NamedPrng::new(vec![purpose.clone()], catalog)
        .context("building the generation engine")?;
    if let Some(path) = find_arg(&args, "--tee") {
        engine = engine
            .with_tee(&path)
            .with_context(|| format!("opening tee stream {path}"))?;
    }
    if let Some(path) = find_arg(&args, "--source") {
        engine = engine
            .with_source(&path)
            .with_context(|| format!("opening source stream {path}"))?;
    }
    engine = engine.with_only_used(only_used);

    info!(
        "drawing {realization_count} realization(s) of '{ptype}' for '{purpose}', {dist_name}"
    );

    let realizations: Vec<u64> = (0..realization_count).collect();
    let rows = engine.generate_realizations(distribution, &ptype, &purpose, &realizations, None)?;

    println!("stream-runner: {} x {} values", rows.len(), rows.first().map_or(0, Vec::len));
    for (realization, row) in realizations.iter().zip(&rows) {
        let (min, max, mean) = summarize(row);
        println!(
            "  realization {realization:4}:  n={}  min={min:.6}  max={max:.6}  mean={mean:.6}",
            row.len()
        );
    }

    if let Some(path) = find_arg(&args, "--export-catalog") {
        engine
            .export_particles(&path)
            .with_context(|| format!("exporting catalog to {path}"))?;
        println!("catalog exported to {path}");
    }

    engine.close_streams().context("closing streams")?;
    Ok(())
}

fn summarize(row: &[f64]) -> (f64, f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &value in row {
        min = min.min(value);
        max = max.max(value);
        sum += value;
    }
    let mean = if row.is_empty() { 0.0 } else { sum / row.len() as f64 };
    (min, max, mean)
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .and_then(|pair| pair[1].parse().ok())
        .unwrap_or(default)
}

fn find_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .map(|pair| pair[1].clone())
}

fn print_usage() {
    println!("stream-runner: draw reproducible random-number streams");
    println!();
    println!("  --entities N          demo catalog size (default 16)");
    println!("  --realizations N      how many realizations to draw (default 1)");
    println!("  --dist uniform|normal distribution kind (default uniform)");
    println!("  --mean X --std X      normal parameters (default 0, 1)");
    println!("  --ptype NAME          entity type to draw for (default walkers)");
    println!("  --purpose NAME        purpose to draw for (default step)");
    println!("  --catalog FILE        load a catalog instead of the demo one");
    println!("  --export-catalog FILE write the catalog after drawing");
    println!("  --tee FILE            record every value to FILE");
    println!("  --source FILE         replay values from FILE");
    println!("  --only-used           tee/source only the filtered subset");
    println!("  --dump FILE           print a recorded stream and exit");
}
