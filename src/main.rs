mod cli;
mod config;
mod audio;
mod engine;
mod error;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use engine::session::Session;
use engine::spectrum::Spectrum;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect specmatch.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("specmatch.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("specmatch").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("specmatch").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.top == 0 {
                cli.top = cfg.output.top;
            }
            if !cli.json {
                cli.json = cfg.output.json;
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let mut session = Session::new();

    let report = session
        .load_samples(&cli.samples)
        .context("Loading samples failed")?;
    for warning in &report.warnings {
        log::warn!("{warning}");
    }
    log::info!("Loaded {} sample fingerprints", report.loaded);

    let compared = if cli.query.is_empty() {
        None
    } else {
        let compared = session.compare(&cli.query).context("Comparison failed")?;
        for warning in &compared.warnings {
            log::warn!("{warning}");
        }
        Some(compared)
    };

    if let Some(id) = &cli.dump_spectrum {
        let spectrum = session
            .raw_spectrum(id)
            .with_context(|| format!("No spectrum stored for {id}"))?;
        print_spectrum(spectrum);
        return Ok(());
    }
    if let Some(id) = &cli.dump_unique {
        let spectrum = session
            .unique_spectrum(id)
            .with_context(|| format!("No unique spectrum stored for {id}"))?;
        print_spectrum(spectrum);
        return Ok(());
    }

    if let Some(compared) = compared {
        if cli.json {
            print_json(&compared, cli.top)?;
        } else {
            print_text(&compared, cli.top);
        }
    }

    Ok(())
}

fn print_spectrum(spectrum: &Spectrum) {
    for (freq, mag) in spectrum.iter() {
        println!("{freq}\t{mag}");
    }
}

fn shown(matches: &[engine::matcher::Match], top: usize) -> &[engine::matcher::Match] {
    if top == 0 || top >= matches.len() {
        matches
    } else {
        &matches[..top]
    }
}

fn print_text(compared: &engine::session::CompareReport, top: usize) {
    for result in &compared.results {
        if result.matches.is_empty() {
            println!(
                "No matching frequencies found for comparison in {}.",
                result.query_id
            );
            continue;
        }
        println!("Results for {}:", result.query_id);
        for m in shown(&result.matches, top) {
            println!("{}: {:.2}%", m.sample_id, m.score);
        }
    }
}

fn print_json(compared: &engine::session::CompareReport, top: usize) -> Result<()> {
    let value = serde_json::Value::Array(
        compared
            .results
            .iter()
            .map(|result| {
                serde_json::json!({
                    "query": result.query_id,
                    "matches": shown(&result.matches, top)
                        .iter()
                        .map(|m| serde_json::json!({
                            "sample": m.sample_id,
                            "score": m.score,
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect(),
    );
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
