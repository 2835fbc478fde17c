//! Run orchestration: load suffixes, assemble lists, write the file, run the callback.

use std::path::PathBuf;

use log::{info, warn};

use crate::assemble::ListAssembler;
use crate::callback::run_callback;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{DefaultFetcher, ListFetcher};
use crate::render::{render, write_config};
use crate::suffix::SuffixTable;
use crate::types::SourceRecord;

/// Timestamp format of the generated file header
const HEADER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of a successful run
#[derive(Debug)]
pub struct RunReport {
    /// One record per source, in processing order
    pub records: Vec<SourceRecord>,
    /// File the configuration was written to
    pub target_file: PathBuf,
    /// `Some(success)` when a callback command ran
    pub callback_succeeded: Option<bool>,
}

impl RunReport {
    /// Root domains across all records (duplicates between sources counted)
    pub fn total_rules(&self) -> usize {
        self.records.iter().map(|r| r.root_domain_count()).sum()
    }
}

/// Run with the network/file fetcher and the configured suffix list.
pub fn run(config: &Config) -> Result<RunReport> {
    let suffixes = config.suffix_loader().load()?;
    let fetcher = DefaultFetcher::new().with_timeout(config.fetch_timeout);
    run_with(config, &suffixes, &fetcher)
}

/// Run with an explicit suffix table and fetcher.
pub fn run_with(
    config: &Config,
    suffixes: &SuffixTable,
    fetcher: &dyn ListFetcher,
) -> Result<RunReport> {
    let records = ListAssembler::new(suffixes, fetcher).assemble(&config.sources())?;

    info!("Generating config file...");
    let generated_at = chrono::Local::now().format(HEADER_TIME_FORMAT).to_string();
    let text = render(&records, &config.render_options(), &generated_at);
    write_config(&config.target_file, &text)?;

    let callback_succeeded = match config.callback_command {
        Some(ref command) => match run_callback(command) {
            Ok(status) => Some(status.success()),
            Err(e) => {
                warn!("{} failed: {}", command, e);
                Some(false)
            }
        },
        None => None,
    };

    Ok(RunReport {
        records,
        target_file: config.target_file.clone(),
        callback_succeeded,
    })
}
