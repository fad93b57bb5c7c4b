//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Xu.
//! The Xu project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Xu Export Router
//!
//! Routes each streamed row to its destination writer. The destination
//! path is resolved from the output template per row; every distinct
//! path gets exactly one writer, created lazily on first use and kept
//! open for the rest of the run.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::attrs::XuAttribute;
use crate::errors::{Result, XuError};
use crate::record::XuOccurrence;

use super::template::XuOutputTemplate;
use super::writer::{XuCsvWriter, XuLineWriter, XuRowWriter};

/// The closed set of output formats, with the per-format key already
/// resolved and validated.
#[derive(Clone, Debug)]
pub enum XuOutputKind {
    /// One attribute per row as plain text.
    Lines { key: XuAttribute },
    /// Selected attributes per row as CSV columns.
    Csv { columns: Vec<XuAttribute> },
}

impl XuOutputKind {
    /// Resolves the `format=`/`key=` option pair.
    ///
    /// For `lines` the key is a single attribute, default `target:url`.
    /// For `csv` the key is a comma-separated attribute list, default
    /// all attributes in canonical order.
    pub fn from_options(format: &str, key: Option<&str>) -> Result<Self> {
        match format {
            "lines" => {
                let key = key.unwrap_or("target:url");
                if key.contains(',') {
                    return Err(XuError::configuration(format!(
                        "lines output takes a single key attribute, got '{key}'"
                    )));
                }
                Ok(XuOutputKind::Lines {
                    key: XuAttribute::parse(key)?,
                })
            }
            "csv" => {
                let columns = match key {
                    None => XuAttribute::all(),
                    Some(key) => key
                        .split(',')
                        .map(|name| XuAttribute::parse(name.trim()))
                        .collect::<Result<Vec<_>>>()?,
                };
                Ok(XuOutputKind::Csv { columns })
            }
            _ => Err(XuError::configuration(format!(
                "unknown output format '{format}'; expected 'lines' or 'csv'"
            ))),
        }
    }

    fn open_writer(&self, path: &Path) -> Result<Box<dyn XuRowWriter>> {
        match self {
            XuOutputKind::Lines { key } => Ok(Box::new(XuLineWriter::open(path, *key)?)),
            XuOutputKind::Csv { columns } => {
                Ok(Box::new(XuCsvWriter::open(path, columns.clone())?))
            }
        }
    }
}

/// Counters reported at the end of an export run.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct XuExportStats {
    pub rows_written: u64,
    pub destinations: u64,
}

/// Per-row dispatcher from template-resolved paths to open writers.
pub struct XuRouter {
    template: XuOutputTemplate,
    kind: XuOutputKind,
    root: PathBuf,
    writers: HashMap<PathBuf, Box<dyn XuRowWriter>>,
    stats: XuExportStats,
}

impl XuRouter {
    pub fn new(template: XuOutputTemplate, kind: XuOutputKind, root: &Path) -> Self {
        Self {
            template,
            kind,
            root: root.to_path_buf(),
            writers: HashMap::new(),
            stats: XuExportStats::default(),
        }
    }

    /// Resolves the row's destination and writes it there, opening the
    /// destination's writer on first use.
    pub fn route(&mut self, row: &XuOccurrence) -> Result<()> {
        let path = self.root.join(self.template.resolve(row));
        let writer = match self.writers.entry(path) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                log::info!("opening destination {}", entry.key().display());
                let writer = self.kind.open_writer(entry.key())?;
                self.stats.destinations += 1;
                entry.insert(writer)
            }
        };
        writer.write(row)?;
        self.stats.rows_written += 1;
        Ok(())
    }

    /// Flushes every open writer. All writers are attempted even after a
    /// failure; the first error is returned.
    pub fn flush_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for (path, writer) in &mut self.writers {
            if let Err(error) = writer.flush() {
                log::warn!("flush of {} failed: {error}", path.display());
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Flushes everything and reports the run counters.
    pub fn finish(mut self) -> Result<XuExportStats> {
        self.flush_all()?;
        Ok(self.stats)
    }
}
