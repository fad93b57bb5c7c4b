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

//! # Xu Export Module
//!
//! Ties a run together: filters are compiled, the output kind and
//! template resolved, the database opened, and the occurrence query
//! streamed row by row into the router. Configuration problems surface
//! before the first row is read.

pub mod router;
pub mod template;
pub mod writer;

use std::path::PathBuf;

use crate::errors::Result;
use crate::filter::XuFilterSet;
use crate::query::XuQuery;
use crate::store;

pub use router::{XuExportStats, XuOutputKind, XuRouter};
pub use template::XuOutputTemplate;
pub use writer::{XuCsvWriter, XuLineWriter, XuRowWriter};

/// One export run, fully described.
#[derive(Clone, Debug)]
pub struct XuExportOptions {
    /// Path to the SQLite database to read.
    pub input: PathBuf,
    /// Destination path or naming template, relative to `root`.
    pub output: String,
    /// Directory destination paths are resolved against.
    pub root: PathBuf,
    /// Filters a row must pass.
    pub include: Vec<String>,
    /// Filters a row must not pass.
    pub exclude: Vec<String>,
    /// Format-specific key: the line attribute, or the CSV column list.
    pub key: Option<String>,
    /// Output format name, `lines` or `csv`.
    pub format: String,
}

impl XuExportOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            root: PathBuf::from("."),
            include: Vec::new(),
            exclude: Vec::new(),
            key: None,
            format: "lines".to_string(),
        }
    }
}

/// Runs one export end to end and reports how much was written.
///
/// Fail-fast order: filters, then output kind, then template, then the
/// database. A row or destination error mid-stream flushes whatever was
/// already written before propagating.
pub fn run_export(options: &XuExportOptions) -> Result<XuExportStats> {
    let filters = XuFilterSet::parse(&options.include, &options.exclude)?;
    let kind = XuOutputKind::from_options(&options.format, options.key.as_deref())?;
    let template = XuOutputTemplate::parse(&options.output)?;

    let conn = store::open(&options.input)?;
    let query = XuQuery::assemble(&filters);

    log::info!(
        "exporting {} to {}",
        options.input.display(),
        template.source()
    );

    let mut router = XuRouter::new(template, kind, &options.root);
    if let Err(error) = query.stream(&conn, |row| router.route(&row)) {
        let _ = router.flush_all();
        return Err(error);
    }

    let stats = router.finish()?;
    log::info!(
        "done; {} rows across {} files",
        stats.rows_written,
        stats.destinations
    );
    Ok(stats)
}
