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

//! # Xu Query Module
//!
//! Assembles the one SELECT this crate runs: each result row is one
//! hyperlink occurrence, joined and expanded so that every attribute of
//! the closed attribute set appears as a named column.
//!
//! Two CTEs feed the join:
//!
//! - `urlsplits` decomposes every stored URL once, via the `urlsplit`
//!   scalar function registered by the store module;
//! - `items` splits each item's RFC 3339 `published` text into six
//!   integer date columns by fixed offsets.
//!
//! The `urlsplits` CTE then joins in three roles — the page containing
//!  the markup (`source`), the URL the markup points at (`target`), and
//! the feed the page came from (`feed`) — plus the `feed` table for the
//! feed title.
//!
//! The query *shape* is assembled entirely from static column and
//! predicate templates; user-supplied filter values only ever reach the
//! statement as bound parameters. The compiled WHERE fragment references
//! namespaced output aliases, so the base SELECT is wrapped in a
//! subquery rather than relying on alias resolution in WHERE.

use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;

use crate::attrs::{XuDateField, XuUrlField, XuUrlRole};
use crate::errors::Result;
use crate::filter::{XuFilterSet, XuScalar};
use crate::record::XuOccurrence;

const PROGRESS_INTERVAL: u64 = 10_000;

impl ToSql for XuScalar {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            XuScalar::Text(text) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes()))),
            XuScalar::Int(value) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*value))),
        }
    }
}

/// `urlsplit(url.url, '<field>') AS "<field>"` for the four component
/// fields. The complete URL is already a column of the `url` table.
fn url_expansions() -> String {
    XuUrlField::ALL
        .iter()
        .filter(|field| !matches!(field, XuUrlField::Url))
        .map(|field| {
            let name = field.as_str();
            format!("urlsplit(url.url, '{name}') AS \"{name}\"")
        })
        .collect::<Vec<_>>()
        .join(",\n        ")
}

/// Fixed-offset date splits over the RFC 3339 `published` text. SQLite
/// `substr` is 1-based.
fn date_expansions() -> String {
    XuDateField::ALL
        .iter()
        .map(|field| {
            let (start, length) = field.offset();
            format!(
                "CAST(substr(item.published, {}, {}) AS INTEGER) AS \"{}\"",
                start + 1,
                length,
                field.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join(",\n        ")
}

/// The fifteen `role:field` output columns.
fn role_columns() -> String {
    XuUrlRole::ALL
        .iter()
        .flat_map(|role| {
            XuUrlField::ALL.iter().map(move |field| {
                format!(
                    "{}.\"{}\" AS \"{}:{}\"",
                    role.as_str(),
                    field.as_str(),
                    role.as_str(),
                    field.as_str()
                )
            })
        })
        .collect::<Vec<_>>()
        .join(",\n    ")
}

fn build_select() -> String {
    format!(
        "WITH urlsplits AS (
    SELECT
        url.id AS id,
        url.url AS \"url\",
        {url_expansions}
    FROM
        url
),
items AS (
    SELECT
        item.url AS url,
        item.source AS source,
        item.title AS title,
        {date_expansions}
    FROM
        item
)
SELECT
    {role_columns},
    {published_columns},
    hyperlink.element AS \"tag\",
    items.title AS \"source:title\",
    feed_info.title AS \"feed:title\"
FROM
    hyperlink
    JOIN urlsplits AS source ON source.id = hyperlink.source_id
    JOIN urlsplits AS target ON target.id = hyperlink.target_id
    JOIN items ON hyperlink.source_id = items.url
    JOIN feed AS feed_info ON items.source = feed_info.url_id
    JOIN urlsplits AS feed ON items.source = feed.id",
        url_expansions = url_expansions(),
        date_expansions = date_expansions(),
        role_columns = role_columns(),
        published_columns = XuDateField::ALL
            .iter()
            .map(|field| format!(
                "items.\"{}\" AS \"published:{}\"",
                field.as_str(),
                field.as_str()
            ))
            .collect::<Vec<_>>()
            .join(",\n    "),
    )
}

/// An assembled occurrence query: the full statement text and the
/// parameters bound to it, in positional order.
#[derive(Clone, Debug)]
pub struct XuQuery {
    pub sql: String,
    pub params: Vec<XuScalar>,
}

impl XuQuery {
    /// Compiles the filter set and attaches it to the base SELECT.
    pub fn assemble(filters: &XuFilterSet) -> Self {
        let base = build_select();
        let clause = filters.compile();
        if clause.sql.is_empty() {
            return Self {
                sql: base,
                params: Vec::new(),
            };
        }
        Self {
            sql: format!("SELECT * FROM (\n{base}\n)\nWHERE {}", clause.sql),
            params: clause.params,
        }
    }

    /// Executes the query and feeds each row to `sink` as it arrives.
    /// Rows are never accumulated; the cursor is forward-only.
    pub fn stream<F>(&self, conn: &Connection, mut sink: F) -> Result<u64>
    where
        F: FnMut(XuOccurrence) -> Result<()>,
    {
        let mut stmt = conn.prepare(&self.sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query(params_from_iter(self.params.iter()))?;
        let mut count = 0u64;
        while let Some(row) = rows.next()? {
            let mut occurrence = XuOccurrence::new();
            for (index, column) in columns.iter().enumerate() {
                let value = match row.get_ref(index)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(v) => Value::from(v),
                    ValueRef::Real(v) => Value::from(v),
                    ValueRef::Text(v) => Value::from(String::from_utf8_lossy(v).into_owned()),
                    ValueRef::Blob(_) => Value::Null,
                };
                occurrence.insert(column, value);
            }
            sink(occurrence)?;
            count += 1;
            if count % PROGRESS_INTERVAL == 0 {
                log::info!("{count} rows so far");
            }
        }
        Ok(count)
    }
}
