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

//! # Xu Output Template
//!
//! Destination paths are printf-style templates with named attribute
//! placeholders, e.g. `%(target:netloc)s.txt` or
//! `%(feed:title)s/%(tag)s/%(target:netloc).6s.csv`. Each row resolves
//! the template to a relative path, which is how one export run fans
//! out into many files.
//!
//! A placeholder is `%(<attribute>)<width>.<precision>s`. Width pads on
//! the left with spaces; precision truncates. Both are optional. A
//! template without placeholders resolves to the same single path for
//! every row.

use regex::Regex;

use crate::attrs::XuAttribute;
use crate::errors::{Result, XuError};
use crate::record::XuOccurrence;

const PLACEHOLDER: &str = r"%\(([^)]*)\)(\d+)?(?:\.(\d+))?s";

#[derive(Clone, Debug)]
enum XuTemplateSegment {
    Literal(String),
    Field {
        attribute: XuAttribute,
        width: Option<usize>,
        precision: Option<usize>,
    },
}

/// A parsed destination template.
#[derive(Clone, Debug)]
pub struct XuOutputTemplate {
    source: String,
    segments: Vec<XuTemplateSegment>,
}

impl XuOutputTemplate {
    /// Parses a template, resolving every placeholder name against the
    /// attribute set up front.
    pub fn parse(template: &str) -> Result<Self> {
        let pattern = Regex::new(PLACEHOLDER)
            .map_err(|e| XuError::internal(format!("template pattern: {e}")))?;

        let mut segments = Vec::new();
        let mut cursor = 0;
        for captures in pattern.captures_iter(template) {
            let matched = captures.get(0).ok_or_else(|| {
                XuError::internal("template pattern produced an empty match")
            })?;
            if matched.start() > cursor {
                segments.push(XuTemplateSegment::Literal(
                    template[cursor..matched.start()].to_string(),
                ));
            }
            let attribute = XuAttribute::parse(&captures[1]).map_err(|_| {
                XuError::validation(format!(
                    "output template '{}' names unknown attribute '{}'",
                    template, &captures[1]
                ))
            })?;
            segments.push(XuTemplateSegment::Field {
                attribute,
                width: captures.get(2).and_then(|m| m.as_str().parse().ok()),
                precision: captures.get(3).and_then(|m| m.as_str().parse().ok()),
            });
            cursor = matched.end();
        }
        if cursor < template.len() {
            segments.push(XuTemplateSegment::Literal(template[cursor..].to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Whether every row resolves to the same destination.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, XuTemplateSegment::Literal(_)))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolves the template against one row. Missing attribute values
    /// render as the empty string.
    pub fn resolve(&self, row: &XuOccurrence) -> String {
        let mut path = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                XuTemplateSegment::Literal(text) => path.push_str(text),
                XuTemplateSegment::Field {
                    attribute,
                    width,
                    precision,
                } => {
                    let mut rendered = row.render(attribute);
                    if let Some(precision) = precision {
                        rendered = rendered.chars().take(*precision).collect();
                    }
                    if let Some(width) = width {
                        let observed = rendered.chars().count();
                        for _ in observed..*width {
                            path.push(' ');
                        }
                    }
                    path.push_str(&rendered);
                }
            }
        }
        path
    }
}
