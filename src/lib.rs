//! gfwlist2dnsmasq - turn block lists into dnsmasq `server=`/`ipset=` rules
//!
//! This library provides the list normalization pipeline:
//! - Rule parsing for GFWList (base64, adblock-style) and plain domain lists
//! - Hostname extraction from rule tokens
//! - Root domain reduction against a public suffix list
//! - dnsmasq configuration rendering
//!
//! # Example
//!
//! ```rust
//! use gfwlist2dnsmasq::{ListAssembler, ListSource, MemoryFetcher, SuffixTable};
//!
//! let suffixes = SuffixTable::load("com\norg\n");
//! let fetcher = MemoryFetcher::new().with("list.txt", "||foo.example.com\n.bar.example.org\n");
//!
//! let assembler = ListAssembler::new(&suffixes, &fetcher);
//! let records = assembler.assemble(&[ListSource::user("list.txt")]).unwrap();
//!
//! assert_eq!(records[0].root_domain_count(), 2);
//! assert!(records[0].root_domains().contains("example.com"));
//! ```
//!
//! # Rule Syntax
//!
//! Lines are classified in this order:
//!
//! | Line | Result |
//! |------|--------|
//! | contains `Last Modified` | update time of the list |
//! | `! ...` | comment, skipped |
//! | empty | skipped |
//! | `@@||host` | whitelist, skipped |
//! | `@@|http://...` | `http://...` |
//! | `.host` | `host` |
//! | `||host` | `host` |
//! | `|http://...` | `http://...` |
//! | anything else | taken verbatim |

pub mod app;
pub mod assemble;
pub mod callback;
pub mod config;
pub mod error;
pub mod fetch;
pub mod hostname;
pub mod logging;
pub mod parser;
pub mod reducer;
pub mod render;
pub mod suffix;
pub mod types;

// Re-export commonly used items
pub use app::{run, run_with, RunReport};
pub use assemble::ListAssembler;
pub use config::Config;
pub use error::{FetchErrorKind, ListError, Result};
pub use fetch::{DefaultFetcher, ListFetcher, MemoryFetcher, DEFAULT_FETCH_TIMEOUT};
pub use hostname::{extract_hostname, extract_hostnames};
pub use parser::{classify_line, parse_list, parse_text};
pub use reducer::{reduce, root_domain};
pub use render::{render, write_config, RenderOptions};
pub use suffix::{SuffixListLoader, SuffixTable};
pub use types::{ListSource, ParsedList, RootDomainSet, RuleLine, SourceKind, SourceRecord};
