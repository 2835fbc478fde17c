use log::{debug, info};

use crate::error::{ListError, Result};
use crate::fetch::ListFetcher;
use crate::hostname::extract_hostnames;
use crate::parser::parse_list;
use crate::reducer::reduce;
use crate::suffix::SuffixTable;
use crate::types::{ListSource, SourceKind, SourceRecord};

/// Runs fetch, parse, hostname extraction and reduction over each source
pub struct ListAssembler<'a> {
    suffixes: &'a SuffixTable,
    fetcher: &'a dyn ListFetcher,
}

impl<'a> ListAssembler<'a> {
    pub fn new(suffixes: &'a SuffixTable, fetcher: &'a dyn ListFetcher) -> Self {
        Self { suffixes, fetcher }
    }

    /// Process every source in order. The first failure aborts the whole run.
    pub fn assemble(&self, sources: &[ListSource]) -> Result<Vec<SourceRecord>> {
        let mut records = Vec::with_capacity(sources.len());
        for source in sources {
            records.push(self.assemble_source(source)?);
        }
        Ok(records)
    }

    /// Process a single source into its result record.
    pub fn assemble_source(&self, source: &ListSource) -> Result<SourceRecord> {
        let raw = self.fetcher.fetch(&source.location)?;
        let record = self.process(source, &raw)?;

        if source.kind == SourceKind::Primary && record.root_domains().is_empty() {
            return Err(ListError::EmptyList(source.location.clone()));
        }

        Ok(record)
    }

    /// Normalize already-fetched bytes for `source`.
    pub fn process(&self, source: &ListSource, raw: &[u8]) -> Result<SourceRecord> {
        let parsed = parse_list(&source.location, raw, source.kind.is_encoded())?;
        info!("Got {} rules from: {}", parsed.accepted, source.location);

        let hostnames = extract_hostnames(&parsed.tokens);
        let root_domains = reduce(&hostnames, self.suffixes);
        debug!(
            "{}: {} tokens, {} hostnames, {} root domains",
            source.location,
            parsed.accepted,
            hostnames.len(),
            root_domains.len()
        );

        Ok(SourceRecord::new(
            source.location.clone(),
            parsed.update_time,
            root_domains,
        ))
    }
}
