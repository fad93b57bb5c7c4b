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

//! # Xu Attribute Module
//!
//! The attribute resolver decomposes stored URL strings and publish
//! timestamps into the namespaced scalar fields the rest of the exporter
//! works with, and defines the closed set of attribute paths that filters,
//! templates, and key lists may reference.
//!
//! ## Attribute Paths
//!
//! Each attribute is `object` or `object:key`:
//!
//! - URL objects `source`, `target`, `feed`, each with keys
//!   `url`, `scheme`, `netloc`, `path`, `query`
//! - `tag` (no key): the markup element the target URL was found on
//! - `published` with integer keys `year`, `month`, `day`, `hour`,
//!   `minute`, `second` (UTC)
//! - `source:title` and `feed:title`
//!
//! The set is closed: the store schema is fixed, so anything outside this
//! list is rejected during validation, before a single row is read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, XuError};

/// Roles under which a URL is attached to a hyperlink occurrence.
///
/// `Source` is the page containing the markup, `Target` the URL found in
/// the markup, `Feed` the feed the page was scraped from. The same
/// decomposition applies to all three; only the namespace differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XuUrlRole {
    Feed,
    Source,
    Target,
}

impl XuUrlRole {
    /// All roles, in the canonical column order.
    pub const ALL: [XuUrlRole; 3] = [XuUrlRole::Feed, XuUrlRole::Source, XuUrlRole::Target];

    pub fn as_str(&self) -> &'static str {
        match self {
            XuUrlRole::Feed => "feed",
            XuUrlRole::Source => "source",
            XuUrlRole::Target => "target",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "feed" => Some(XuUrlRole::Feed),
            "source" => Some(XuUrlRole::Source),
            "target" => Some(XuUrlRole::Target),
            _ => None,
        }
    }
}

/// Scalar fields a URL decomposes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XuUrlField {
    Scheme,
    Netloc,
    Path,
    Query,
    Url,
}

impl XuUrlField {
    /// All fields, in the canonical column order. `Url` (the raw string)
    /// comes last; the first four are the derived parts.
    pub const ALL: [XuUrlField; 5] = [
        XuUrlField::Scheme,
        XuUrlField::Netloc,
        XuUrlField::Path,
        XuUrlField::Query,
        XuUrlField::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            XuUrlField::Scheme => "scheme",
            XuUrlField::Netloc => "netloc",
            XuUrlField::Path => "path",
            XuUrlField::Query => "query",
            XuUrlField::Url => "url",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "scheme" => Some(XuUrlField::Scheme),
            "netloc" => Some(XuUrlField::Netloc),
            "path" => Some(XuUrlField::Path),
            "query" => Some(XuUrlField::Query),
            "url" => Some(XuUrlField::Url),
            _ => None,
        }
    }
}

/// Integer fields of a publish timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XuDateField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl XuDateField {
    pub const ALL: [XuDateField; 6] = [
        XuDateField::Year,
        XuDateField::Month,
        XuDateField::Day,
        XuDateField::Hour,
        XuDateField::Minute,
        XuDateField::Second,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            XuDateField::Year => "year",
            XuDateField::Month => "month",
            XuDateField::Day => "day",
            XuDateField::Hour => "hour",
            XuDateField::Minute => "minute",
            XuDateField::Second => "second",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "year" => Some(XuDateField::Year),
            "month" => Some(XuDateField::Month),
            "day" => Some(XuDateField::Day),
            "hour" => Some(XuDateField::Hour),
            "minute" => Some(XuDateField::Minute),
            "second" => Some(XuDateField::Second),
            _ => None,
        }
    }

    /// 0-based character offset and length of this field within the
    /// canonical zero-padded `YYYY-MM-DDTHH:MM:SS` form.
    pub fn offset(&self) -> (usize, usize) {
        match self {
            XuDateField::Year => (0, 4),
            XuDateField::Month => (5, 2),
            XuDateField::Day => (8, 2),
            XuDateField::Hour => (11, 2),
            XuDateField::Minute => (14, 2),
            XuDateField::Second => (17, 2),
        }
    }
}

/// Decomposed view of a stored URL string.
///
/// Derived, never stored: recomputed from the raw string on every read.
/// `full` keeps the original input; on the happy path
/// `scheme + "://" + netloc + path + ("?" + query)` reconstructs an
/// equivalent URL (`path` always includes its leading `/` when present).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XuUrlParts {
    pub scheme: String,
    pub netloc: String,
    pub path: String,
    pub query: String,
    pub full: String,
}

impl XuUrlParts {
    /// Splits a raw URL string into its parts.
    ///
    /// `scheme` is the substring before the first `:` that is followed by
    /// `//`; `netloc` runs from `//` to the next `/`, `?`, or end; `path`
    /// starts at that `/` (inclusive) up to `?` or end; `query` is
    /// everything after `?`, without the `?` itself.
    pub fn split(raw: &str) -> Self {
        let full = raw.to_string();

        let (scheme, rest, has_netloc) = match raw.find("://") {
            Some(pos) => (&raw[..pos], &raw[pos + 3..], true),
            None => match raw.strip_prefix("//") {
                Some(rest) => ("", rest, true),
                None => ("", raw, false),
            },
        };

        let (netloc, tail) = if has_netloc {
            let end = rest
                .find(|c| c == '/' || c == '?')
                .unwrap_or(rest.len());
            (&rest[..end], &rest[end..])
        } else {
            ("", rest)
        };

        let (path, query) = match tail.find('?') {
            Some(pos) => (&tail[..pos], &tail[pos + 1..]),
            None => (tail, ""),
        };

        Self {
            scheme: scheme.to_string(),
            netloc: netloc.to_string(),
            path: path.to_string(),
            query: query.to_string(),
            full,
        }
    }

    /// Returns one named part.
    pub fn field(&self, field: XuUrlField) -> &str {
        match field {
            XuUrlField::Scheme => &self.scheme,
            XuUrlField::Netloc => &self.netloc,
            XuUrlField::Path => &self.path,
            XuUrlField::Query => &self.query,
            XuUrlField::Url => &self.full,
        }
    }

    /// Reassembles the parts into a URL string.
    pub fn reconstruct(&self) -> String {
        let mut url = format!("{}://{}{}", self.scheme, self.netloc, self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        url
    }
}

/// Integer decomposition of a publish timestamp, UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XuTimestamp {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

impl XuTimestamp {
    /// Decomposes a timestamp string at fixed character offsets, assuming
    /// the canonical zero-padded `YYYY-MM-DDTHH:MM:SS...` shape produced by
    /// ingestion.
    ///
    /// This is deliberately not a general date parser: a malformed input
    /// degrades to zeroed fields instead of failing, matching the store's
    /// `CAST(substr(...) AS INTEGER)` behavior. Known limitation, accepted
    /// for throughput.
    pub fn decompose(raw: &str) -> Self {
        let field = |f: XuDateField| -> i64 {
            let (start, len) = f.offset();
            raw.get(start..start + len)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0)
        };

        Self {
            year: field(XuDateField::Year),
            month: field(XuDateField::Month),
            day: field(XuDateField::Day),
            hour: field(XuDateField::Hour),
            minute: field(XuDateField::Minute),
            second: field(XuDateField::Second),
        }
    }

    /// Returns one named part.
    pub fn field(&self, field: XuDateField) -> i64 {
        match field {
            XuDateField::Year => self.year,
            XuDateField::Month => self.month,
            XuDateField::Day => self.day,
            XuDateField::Hour => self.hour,
            XuDateField::Minute => self.minute,
            XuDateField::Second => self.second,
        }
    }
}

/// Parent domains of a netloc: every trailing contiguous label group of
/// length >= 2, longest (the domain itself) first.
///
/// A bare single label is excluded from the set, so a netloc never has a
/// top-level label as a parent, and a single-label netloc has no parents
/// at all, not even itself.
pub fn domain_parents(domain: &str) -> Vec<String> {
    let parts: Vec<&str> = domain.split('.').collect();
    (2..=parts.len())
        .rev()
        .map(|i| parts[parts.len() - i..].join("."))
        .collect()
}

/// Label-aligned domain-suffix membership: true when `domain` equals the
/// netloc or a trailing label group of it. This is not a raw string-suffix
/// test: `noteexample.com` is not under `example.com`.
pub fn domain_under(netloc: &str, domain: &str) -> bool {
    domain_parents(netloc).iter().any(|parent| parent == domain)
}

/// One attribute path of the closed set, e.g. `target:netloc`,
/// `published:year`, or `tag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XuAttribute {
    /// A URL part under one of the three namespaces.
    Url(XuUrlRole, XuUrlField),
    /// `source:title` or `feed:title`. There is no target title.
    Title(XuUrlRole),
    /// An integer part of the source page's publish timestamp.
    Published(XuDateField),
    /// The markup element the target URL was found on.
    Tag,
}

impl XuAttribute {
    /// Parses an attribute path (`object` or `object:key`).
    pub fn parse(text: &str) -> Result<Self> {
        let attribute = match text.split_once(':') {
            None => match text {
                "tag" => Some(XuAttribute::Tag),
                _ => None,
            },
            Some(("published", key)) => XuDateField::parse(key).map(XuAttribute::Published),
            Some((object, "title")) => XuUrlRole::parse(object).and_then(|role| match role {
                XuUrlRole::Target => None,
                role => Some(XuAttribute::Title(role)),
            }),
            Some((object, key)) => match (XuUrlRole::parse(object), XuUrlField::parse(key)) {
                (Some(role), Some(field)) => Some(XuAttribute::Url(role, field)),
                _ => None,
            },
        };

        attribute.ok_or_else(|| XuError::validation(format!("unknown attribute '{text}'")))
    }

    /// The column name this attribute resolves to, e.g. `target:netloc`.
    pub fn column(&self) -> String {
        match self {
            XuAttribute::Url(role, field) => format!("{}:{}", role.as_str(), field.as_str()),
            XuAttribute::Title(role) => format!("{}:title", role.as_str()),
            XuAttribute::Published(field) => format!("published:{}", field.as_str()),
            XuAttribute::Tag => "tag".to_string(),
        }
    }

    /// The full attribute set in its canonical stable order: URL columns
    /// per role, the six published parts, then tag and the two titles.
    /// This order is the default CSV header.
    pub fn all() -> Vec<XuAttribute> {
        let mut attributes = Vec::with_capacity(24);
        for role in XuUrlRole::ALL {
            for field in XuUrlField::ALL {
                attributes.push(XuAttribute::Url(role, field));
            }
        }
        for field in XuDateField::ALL {
            attributes.push(XuAttribute::Published(field));
        }
        attributes.push(XuAttribute::Tag);
        attributes.push(XuAttribute::Title(XuUrlRole::Source));
        attributes.push(XuAttribute::Title(XuUrlRole::Feed));
        attributes
    }

    /// Whether the attribute resolves to an integer scalar.
    pub fn is_integer(&self) -> bool {
        matches!(self, XuAttribute::Published(_))
    }

    /// Whether the attribute is a domain name, i.e. eligible for `under`.
    pub fn is_netloc(&self) -> bool {
        matches!(self, XuAttribute::Url(_, XuUrlField::Netloc))
    }
}

impl fmt::Display for XuAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column())
    }
}
