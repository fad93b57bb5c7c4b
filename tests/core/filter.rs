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

//! # Xu Filter Tests
//!
//! Tests for the predicate compiler: tuple parsing, type checking, and
//! the equivalence of the two compiled artifacts. The same filter set is
//! evaluated once through the row predicate and once through the WHERE
//! fragment on a SQLite table, and the two must select the same rows.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test filter
//! ```

use rusqlite::params_from_iter;
use serde_json::json;

use xu::{store, XuError, XuFilter, XuFilterSet, XuOccurrence};

/// Columns the fixture rows carry, in insertion order.
const COLUMNS: [&str; 4] = ["tag", "source:netloc", "target:netloc", "published:year"];

/// Fixture rows spanning tags, domains, and years.
fn fixture_rows() -> Vec<XuOccurrence> {
    let rows = [
        ("img", "xkcd.com", "imgs.xkcd.com", 2011),
        ("a", "xkcd.com", "itunes.apple.com", 2011),
        ("img", "staff.tumblr.com", "cdn.media.tumblr.com", 2016),
        ("img", "staff.tumblr.com", "media.tumblr.com", 2018),
        ("a", "staff.tumblr.com", "google.com", 2016),
    ];
    rows.iter()
        .map(|(tag, source, target, year)| {
            let mut row = XuOccurrence::new();
            row.insert("tag", json!(tag));
            row.insert("source:netloc", json!(source));
            row.insert("target:netloc", json!(target));
            row.insert("published:year", json!(year));
            row
        })
        .collect()
}

/// Loads the fixture rows into an in-memory table whose column names are
/// the namespaced attribute names, then returns the values of `tag` for
/// rows selected by the compiled WHERE fragment.
fn select_tags_by_sql(filters: &XuFilterSet) -> Vec<String> {
    let conn = store::open_in_memory().unwrap();
    conn.execute(
        "CREATE TABLE occurrences (
            \"tag\" TEXT,
            \"source:netloc\" TEXT,
            \"target:netloc\" TEXT,
            \"published:year\" INTEGER
        )",
        [],
    )
    .unwrap();
    for row in fixture_rows() {
        conn.execute(
            "INSERT INTO occurrences VALUES (?, ?, ?, ?)",
            rusqlite::params![
                row.values["tag"].as_str(),
                row.values["source:netloc"].as_str(),
                row.values["target:netloc"].as_str(),
                row.values["published:year"].as_i64(),
            ],
        )
        .unwrap();
    }

    let clause = filters.compile();
    let sql = if clause.sql.is_empty() {
        "SELECT \"tag\" FROM occurrences".to_string()
    } else {
        format!("SELECT \"tag\" FROM occurrences WHERE {}", clause.sql)
    };
    let mut stmt = conn.prepare(&sql).unwrap();
    let tags = stmt
        .query_map(params_from_iter(clause.params.iter()), |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<Vec<String>>>()
        .unwrap();
    tags
}

/// Evaluates the same filter set through the row-side predicate.
fn select_tags_by_rows(filters: &XuFilterSet) -> Vec<String> {
    fixture_rows()
        .iter()
        .filter(|row| filters.accepts(row))
        .map(|row| row.values["tag"].as_str().unwrap().to_string())
        .collect()
}

fn assert_equivalent(filters: &XuFilterSet, expected_count: usize) {
    let by_sql = select_tags_by_sql(filters);
    let by_rows = select_tags_by_rows(filters);
    assert_eq!(by_sql, by_rows);
    assert_eq!(by_sql.len(), expected_count);
}

/// Tests that equality filters select the same rows in SQL and in memory.
#[test]
fn test_is_equivalence() {
    let filters =
        XuFilterSet::parse(&["source:netloc is xkcd.com".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 2);
}

/// Tests ordering filters over the integer date attributes.
#[test]
fn test_ordering_equivalence() {
    let filters =
        XuFilterSet::parse(&["published:year lt 2017".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 4);

    let filters =
        XuFilterSet::parse(&["published:year ge 2016".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 3);
}

/// Tests the substring filters, including values that would be LIKE
/// metacharacters.
#[test]
fn test_substring_equivalence() {
    let filters =
        XuFilterSet::parse(&["target:netloc startswith imgs.".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 1);

    let filters =
        XuFilterSet::parse(&["target:netloc endswith .com".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 5);

    let filters =
        XuFilterSet::parse(&["target:netloc contains media".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 2);

    // '%' is an ordinary character, not a wildcard.
    let filters =
        XuFilterSet::parse(&["target:netloc contains %".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 0);
}

/// Tests `under` through the registered scalar function and the row
/// predicate together.
#[test]
fn test_under_equivalence() {
    let filters = XuFilterSet::parse(
        &["target:netloc under media.tumblr.com".to_string()],
        &[],
    )
    .unwrap();
    assert_equivalent(&filters, 2);

    // A bare top-level label matches nothing, not even itself.
    let filters =
        XuFilterSet::parse(&["target:netloc under com".to_string()], &[]).unwrap();
    assert_equivalent(&filters, 0);
}

/// Tests a multi-filter run combining includes and an exclude.
#[test]
fn test_combined_filters() {
    let filters = XuFilterSet::parse(
        &[
            "tag is img".to_string(),
            "source:netloc is staff.tumblr.com".to_string(),
            "target:netloc under media.tumblr.com".to_string(),
            "published:year lt 2017".to_string(),
        ],
        &[],
    )
    .unwrap();
    assert_equivalent(&filters, 1);

    let filters = XuFilterSet::parse(
        &["tag is img".to_string()],
        &["target:netloc under tumblr.com".to_string()],
    )
    .unwrap();
    assert_equivalent(&filters, 1);
}

/// Tests that an empty filter set selects every row.
#[test]
fn test_empty_set_selects_everything() {
    assert_equivalent(&XuFilterSet::default(), 5);
}

/// Tests the compile-time error classes for malformed tuples.
#[test]
fn test_filter_error_classes() {
    assert!(matches!(
        XuFilter::parse("target:netloc is").unwrap_err(),
        XuError::Validation { .. }
    ));
    assert!(matches!(
        XuFilter::parse("target:netloc near xkcd.com").unwrap_err(),
        XuError::Validation { .. }
    ));
    assert!(matches!(
        XuFilter::parse("target:body is x").unwrap_err(),
        XuError::Validation { .. }
    ));
    assert!(matches!(
        XuFilter::parse("target:netloc gt 10").unwrap_err(),
        XuError::PredicateType { .. }
    ));
    assert!(matches!(
        XuFilter::parse("published:year under com").unwrap_err(),
        XuError::PredicateType { .. }
    ));
    assert!(matches!(
        XuFilter::parse("published:year is soon").unwrap_err(),
        XuError::Validation { .. }
    ));
}
