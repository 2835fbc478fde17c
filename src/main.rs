//! gfwlist2dnsmasq binary entry point.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, LevelFilter};

use gfwlist2dnsmasq::config::executable_dir;
use gfwlist2dnsmasq::{logging, run, Config};

/// Convert GFWList and plain domain lists into dnsmasq server/ipset rules.
#[derive(Parser, Debug)]
#[command(name = "gfwlist2dnsmasq")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the output file from the configuration.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Also append log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref path) => {
            info!("Starting with the config file: {}", path.display());
            Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => {
            info!("Starting with default config. You can specify a configuration file by using -c/--config");
            Config::default()
        }
    };

    if let Some(dir) = executable_dir() {
        config.resolve_resources(&dir);
    }
    debug!(
        "Resources: extends list {}, suffix list {}",
        config.extends_file,
        config.suffix_list.display()
    );

    if let Some(ref output) = args.output {
        config.target_file = output.clone();
    }
    Ok(config)
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init_logger(args.log_level, args.log_file.as_deref()) {
        eprintln!("{}", e);
        process::exit(1);
    }

    let result = load_config(&args).and_then(|config| run(&config).map_err(anyhow::Error::from));

    match result {
        Ok(report) => {
            info!(
                "Wrote {} rules from {} lists to {}",
                report.total_rules(),
                report.records.len(),
                report.target_file.display()
            );
        }
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
