// Copyright (c) 2024 Mike Tsao

//! The console's parameter dictionary: which parameters exist, where they
//! live, and what values they take.
//!
//! Each console model ships a plain-text definition file with one record per
//! line. [Dictionary::parse] turns that text into an ordered list of
//! [CommandDescriptor]s. A bad line never fails the load; it's counted in the
//! [ParseReport] and skipped. Only a missing or unreadable file is fatal.

use crate::{error::ScpError, prelude::*};
use include_dir::{include_dir, Dir};
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;

/// The most commonly used imports.
pub mod prelude {
    pub use super::{CommandDescriptor, CommandRole, Dictionary};
}

pub use descriptor::{CommandDescriptor, CommandRole};
pub use parser::{parse_record, DictionaryRecord, ParseReport};
pub use tokenizer::tokenize;

pub(crate) use parser::is_record_status;
#[cfg(test)]
pub(crate) use descriptor::tests as tests_support;

mod descriptor;
mod parser;
mod tokenizer;

/// The dictionaries that ship with the crate, one per [ConsoleModel].
pub static DICTIONARY_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets/dictionaries");

/// The loaded set of [CommandDescriptor]s for one console model.
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    descriptors: Vec<CommandDescriptor>,
    by_index: FxHashMap<CommandIndex, usize>,
    by_address: FxHashMap<String, usize>,
    report: ParseReport,
}
impl Dictionary {
    /// Builds a dictionary from definition text.
    pub fn parse(text: &str) -> Self {
        let mut report = ParseReport::default();
        let mut descriptors = Vec::default();
        let mut seen_indexes = FxHashSet::default();
        let mut seen_addresses = FxHashSet::default();

        for line in text.lines() {
            match parse_record(line) {
                Ok(DictionaryRecord::Ignored) => report.ignored += 1,
                Ok(DictionaryRecord::Echo(_)) => report.echoes += 1,
                Ok(DictionaryRecord::Descriptor(d)) => {
                    if seen_indexes.contains(&d.index) || seen_addresses.contains(&d.address) {
                        warn!("skipping duplicate dictionary entry {} {}", d.index, d.address);
                        report.malformed += 1;
                        continue;
                    }
                    seen_indexes.insert(d.index);
                    seen_addresses.insert(d.address.clone());
                    report.accepted += 1;
                    descriptors.push(d);
                }
                Err(e) => {
                    debug!("skipping dictionary line: {e}");
                    report.malformed += 1;
                }
            }
        }
        debug!("dictionary loaded: {report:?}");
        Self::new_with(descriptors, report)
    }

    fn new_with(mut descriptors: Vec<CommandDescriptor>, report: ParseReport) -> Self {
        // sort_by_cached_key is stable, so equal keys keep file order.
        descriptors.sort_by_cached_key(|d| d.sort_key());
        let by_index = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.index, i))
            .collect();
        let by_address = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.address.clone(), i))
            .collect();
        Self {
            descriptors,
            by_index,
            by_address,
            report,
        }
    }

    /// Reads and parses a definition file.
    pub fn load(path: &Path) -> Result<Self, ScpError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parses the bundled definition file for the given model.
    pub fn builtin(model: ConsoleModel) -> Result<Self, ScpError> {
        DICTIONARY_DIR
            .get_file(model.dictionary_file_name())
            .and_then(|f| f.contents_utf8())
            .map(Self::parse)
            .ok_or_else(|| ScpError::DictionaryUnavailable(model.to_string()))
    }

    /// Loads whichever dictionary the settings call for: the override file if
    /// there is one, otherwise the bundled file.
    pub fn for_settings(settings: &ScpSettings) -> Result<Self, ScpError> {
        match settings.dictionary_path() {
            Some(path) => Self::load(path),
            None => Self::builtin(settings.model()),
        }
    }

    /// All descriptors, in display order.
    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }

    #[allow(missing_docs)]
    pub fn get(&self, index: CommandIndex) -> Option<&CommandDescriptor> {
        self.by_index.get(&index).map(|&i| &self.descriptors[i])
    }

    /// Finds the descriptor for an inbound address. An exact match wins;
    /// otherwise the longest descriptor address that prefixes `address` does,
    /// since replies can carry extra trailing characters such as a bank
    /// letter.
    pub fn find_by_address(&self, address: &str) -> Option<&CommandDescriptor> {
        if let Some(&i) = self.by_address.get(address) {
            return Some(&self.descriptors[i]);
        }
        self.descriptors
            .iter()
            .filter(|d| address.starts_with(d.address.as_str()))
            .max_by_key(|d| d.address.len())
    }

    #[allow(missing_docs)]
    pub fn report(&self) -> ParseReport {
        self.report
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
