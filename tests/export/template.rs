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

//! # Xu Template Tests
//!
//! Tests for output template resolution: placeholder syntax, width and
//! precision modifiers, and destination fan-out behavior.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test template
//! ```

use std::collections::BTreeSet;

use serde_json::json;

use xu::{XuError, XuOccurrence, XuOutputTemplate};

fn occurrence(pairs: &[(&str, serde_json::Value)]) -> XuOccurrence {
    let mut row = XuOccurrence::new();
    for (column, value) in pairs {
        row.insert(*column, value.clone());
    }
    row
}

/// Tests that a template without placeholders is recognized as a single
/// fixed destination.
#[test]
fn test_static_template() {
    let template = XuOutputTemplate::parse("out/urls.txt").unwrap();
    assert!(template.is_static());
    assert_eq!(template.source(), "out/urls.txt");
    assert_eq!(template.resolve(&XuOccurrence::new()), "out/urls.txt");
}

/// Tests per-row resolution of the documented `%(target:netloc)s.txt`
/// template.
#[test]
fn test_netloc_fan_out() {
    let template = XuOutputTemplate::parse("%(target:netloc)s.txt").unwrap();
    assert!(!template.is_static());

    let rows = [
        occurrence(&[("target:netloc", json!("imgs.xkcd.com"))]),
        occurrence(&[("target:netloc", json!("xkcd.com"))]),
        occurrence(&[("target:netloc", json!("imgs.xkcd.com"))]),
    ];
    let destinations: BTreeSet<String> = rows.iter().map(|row| template.resolve(row)).collect();
    assert_eq!(
        destinations.into_iter().collect::<Vec<_>>(),
        vec!["imgs.xkcd.com.txt", "xkcd.com.txt"]
    );
}

/// Tests a template combining several placeholders and literal text.
#[test]
fn test_mixed_template() {
    let template = XuOutputTemplate::parse("%(target:netloc).6s-%(published:year)s.txt").unwrap();
    let row = occurrence(&[
        ("target:netloc", json!("imgs.xkcd.com")),
        ("published:year", json!(2011)),
    ]);
    assert_eq!(template.resolve(&row), "imgs.x-2011.txt");
}

/// Tests templates that spell out a directory hierarchy.
#[test]
fn test_directory_template() {
    let template =
        XuOutputTemplate::parse("%(feed:title)s/%(tag)s/%(target:netloc)s.csv").unwrap();
    let row = occurrence(&[
        ("feed:title", json!("xkcd.com")),
        ("tag", json!("img")),
        ("target:netloc", json!("imgs.xkcd.com")),
    ]);
    assert_eq!(template.resolve(&row), "xkcd.com/img/imgs.xkcd.com.csv");
}

/// Tests the width modifier: shorter values are padded on the left.
#[test]
fn test_width_padding() {
    let template = XuOutputTemplate::parse("%(tag)4s.txt").unwrap();
    assert_eq!(
        template.resolve(&occurrence(&[("tag", json!("a"))])),
        "   a.txt"
    );
    assert_eq!(
        template.resolve(&occurrence(&[("tag", json!("source"))])),
        "source.txt"
    );
}

/// Tests width and precision together: truncate first, then pad.
#[test]
fn test_width_and_precision() {
    let template = XuOutputTemplate::parse("%(target:netloc)8.4s.txt").unwrap();
    assert_eq!(
        template.resolve(&occurrence(&[("target:netloc", json!("imgs.xkcd.com"))])),
        "    imgs.txt"
    );
}

/// Tests that integer attributes render as their decimal text.
#[test]
fn test_integer_placeholder() {
    let template = XuOutputTemplate::parse("%(published:year)s/%(published:month)s.txt").unwrap();
    let row = occurrence(&[
        ("published:year", json!(2011)),
        ("published:month", json!(8)),
    ]);
    assert_eq!(template.resolve(&row), "2011/8.txt");
}

/// Tests that a placeholder naming an unknown attribute is rejected at
/// parse time, before any row is read.
#[test]
fn test_unknown_placeholder_rejected() {
    for template in ["%(target:body)s.txt", "%(netloc)s.txt", "%()s.txt"] {
        let err = XuOutputTemplate::parse(template).unwrap_err();
        assert!(
            matches!(err, XuError::Validation { .. }),
            "accepted '{template}'"
        );
    }
}
