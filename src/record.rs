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

//! # Xu Record Module
//!
//! This module provides the row representation that flows from the query
//! assembler through the router to the writers: one hyperlink occurrence,
//! i.e. one (source-page, target-URL, tag) triple annotated with the source
//! page's publish timestamp and title and the owning feed's URL and title.
//!
//! Rows are flat attribute→scalar maps keyed by canonical attribute column
//! names (`target:netloc`, `published:year`, `tag`, ...). JSON values keep
//! the representation flexible while staying faithful to the two scalar
//! types the store produces: text and integers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::attrs::XuAttribute;

/// Attribute-to-scalar map backing one occurrence.
pub type XuScalarMap = Map<String, Value>;

/// One hyperlink occurrence, as delivered by the store cursor.
///
/// All fields are transient: URL parts and timestamp parts are recomputed
/// per query execution, never persisted. Every occurrence sharing a source
/// page carries the same `published:*` values and the same `feed:title`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct XuOccurrence {
    /// Canonical column name → scalar value.
    pub values: XuScalarMap,
}

impl XuOccurrence {
    /// Constructs an empty occurrence.
    pub fn new() -> Self {
        Self {
            values: XuScalarMap::new(),
        }
    }

    /// Sets one column.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Returns the raw scalar for an attribute, if present.
    pub fn get(&self, attribute: &XuAttribute) -> Option<&Value> {
        self.values.get(attribute.column().as_str())
    }

    /// Returns the attribute as text, if present and string-valued.
    pub fn text(&self, attribute: &XuAttribute) -> Option<&str> {
        self.get(attribute).and_then(Value::as_str)
    }

    /// Returns the attribute as an integer, if present and numeric.
    pub fn integer(&self, attribute: &XuAttribute) -> Option<i64> {
        self.get(attribute).and_then(Value::as_i64)
    }

    /// Renders the attribute's scalar for line output, CSV cells, and
    /// template substitution. Missing and null values render empty.
    pub fn render(&self, attribute: &XuAttribute) -> String {
        match self.get(attribute) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(other) => other.to_string(),
        }
    }
}
