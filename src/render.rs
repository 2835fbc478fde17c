//! dnsmasq configuration rendering.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{ListError, Result};
use crate::types::SourceRecord;

/// Shown in a list header when the list carried no update annotation
const UNKNOWN_UPDATE_TIME: &str = "None";

/// Values substituted into every rule pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub dns_server: String,
    pub dns_port: u16,
    pub ipset_name: String,
}

/// Render all records into dnsmasq configuration text.
///
/// `generated_at` is written verbatim into the file header.
pub fn render(records: &[SourceRecord], options: &RenderOptions, generated_at: &str) -> String {
    let mut out = String::new();
    // Writing to a String never fails
    let _ = writeln!(out, "# Generated by gfwlist2dnsmasq at: {}", generated_at);
    out.push('\n');

    for record in records {
        render_record(&mut out, record, options);
    }

    out
}

fn render_record(out: &mut String, record: &SourceRecord, options: &RenderOptions) {
    let update_time = record.update_time().unwrap_or(UNKNOWN_UPDATE_TIME);
    let _ = writeln!(out, "# From: {}", record.source());
    let _ = writeln!(out, "# Last Modified at: {}", update_time);
    let _ = writeln!(out, "# Generated {} rules", record.root_domain_count());
    out.push('\n');

    for domain in record.root_domains() {
        let _ = writeln!(
            out,
            "server=/{}/{}#{}",
            domain, options.dns_server, options.dns_port
        );
        let _ = writeln!(out, "ipset=/{}/{}", domain, options.ipset_name);
    }

    if !record.root_domains().is_empty() {
        out.push('\n');
    }
}

/// Write rendered text to `path`, creating parent directories as needed.
pub fn write_config(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                ListError::RenderError(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    fs::write(path, text).map_err(|e| {
        ListError::RenderError(format!("Failed to write '{}': {}", path.display(), e))
    })?;

    info!("Generated config file to {}", path.display());
    Ok(())
}
