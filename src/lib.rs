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

//! # Xu Core Library
//!
//! Xu exports hyperlink occurrences from a scraped-feed SQLite database
//! into plain text or CSV files, with attribute-based filtering and
//! templated multi-file output.
//!
//! ## Module Overview
//!
//! - **attrs**: The closed attribute set — URL decomposition by role
//!   (`feed`, `source`, `target`), timestamp decomposition, tags and titles
//! - **record**: XuOccurrence, one joined hyperlink occurrence row
//! - **filter**: Filter tuples compiled to a parameterized WHERE fragment
//!   and an equivalent row predicate
//! - **query**: The occurrence SELECT, assembled and streamed
//! - **store**: SQLite connections with the Xu scalar functions registered
//! - **export**: Output templates, row writers, the per-destination
//!   router, and the end-to-end run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xu::{run_export, XuExportOptions};
//!
//! let mut options = XuExportOptions::new("index.db", "%(target:netloc)s.txt");
//! options.include.push("tag is img".to_string());
//! options.exclude.push("target:netloc is google.com".to_string());
//!
//! let stats = run_export(&options).unwrap();
//! println!("{} rows, {} files", stats.rows_written, stats.destinations);
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, XuError>`. Configuration and filter
//! problems are reported before any row is read or any file is touched.

#![allow(non_snake_case)]

pub mod attrs;
pub mod errors;
pub mod export;
pub mod filter;
pub mod query;
pub mod record;
pub mod store;

pub use attrs::{
    domain_parents, domain_under, XuAttribute, XuDateField, XuTimestamp, XuUrlField, XuUrlParts,
    XuUrlRole,
};
pub use errors::{Result, XuError};
pub use export::{
    run_export, XuCsvWriter, XuExportOptions, XuExportStats, XuLineWriter, XuOutputKind,
    XuOutputTemplate, XuRouter, XuRowWriter,
};
pub use filter::{XuFilter, XuFilterSet, XuPredicate, XuScalar, XuWhereClause};
pub use query::XuQuery;
pub use record::{XuOccurrence, XuScalarMap};
