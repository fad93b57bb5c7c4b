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

//! # Xu Filter Module
//!
//! The predicate compiler. A filter is a three-token tuple
//! `attribute predicate value`, accumulated into include and exclude lists.
//! Compilation yields two equivalent artifacts from one validation pass:
//!
//! - a parameterized WHERE fragment (the SQL *shape* is assembled from
//!   static templates; literal values only ever travel as bound
//!   parameters), and
//! - a row-side boolean predicate for in-memory evaluation.
//!
//! ## Predicates
//!
//! | kind | applies to | semantics |
//! |---|---|---|
//! | `is` | any attribute | exact equality |
//! | `gt` `ge` `lt` `le` | integer attributes | numeric ordering |
//! | `startswith` `endswith` `contains` | string attributes | literal substring tests |
//! | `under` | `*:netloc` only | label-aligned domain-suffix membership |
//!
//! A kind applied outside its column in this table is a compile-time
//! predicate type error; an attribute outside the closed set is a
//! validation error. Both are raised before any row is read.
//!
//! ## Acceptance
//!
//! A row passes when every include filter evaluates true and every exclude
//! filter evaluates false. All filters are conjunctive; exclude filters are
//! individually negated. An empty filter set accepts every row.

use crate::attrs::{self, XuAttribute};
use crate::errors::{Result, XuError};
use crate::record::XuOccurrence;

/// Comparison operators a filter may name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XuPredicate {
    Is,
    Gt,
    Ge,
    Lt,
    Le,
    StartsWith,
    EndsWith,
    Contains,
    Under,
}

impl XuPredicate {
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "is" => Ok(XuPredicate::Is),
            "gt" => Ok(XuPredicate::Gt),
            "ge" => Ok(XuPredicate::Ge),
            "lt" => Ok(XuPredicate::Lt),
            "le" => Ok(XuPredicate::Le),
            "startswith" => Ok(XuPredicate::StartsWith),
            "endswith" => Ok(XuPredicate::EndsWith),
            "contains" => Ok(XuPredicate::Contains),
            "under" => Ok(XuPredicate::Under),
            _ => Err(XuError::validation(format!("unknown predicate '{token}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            XuPredicate::Is => "is",
            XuPredicate::Gt => "gt",
            XuPredicate::Ge => "ge",
            XuPredicate::Lt => "lt",
            XuPredicate::Le => "le",
            XuPredicate::StartsWith => "startswith",
            XuPredicate::EndsWith => "endswith",
            XuPredicate::Contains => "contains",
            XuPredicate::Under => "under",
        }
    }
}

/// A bound parameter value carried next to a WHERE fragment.
///
/// Only the two scalar types the store understands. Values are never
/// interpolated into SQL text.
#[derive(Clone, Debug, PartialEq)]
pub enum XuScalar {
    Text(String),
    Int(i64),
}

/// Parameterized WHERE fragment compiled from a filter set. Empty `sql`
/// means no filtering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XuWhereClause {
    pub sql: String,
    pub params: Vec<XuScalar>,
}

/// One validated attribute/predicate/value test.
#[derive(Clone, Debug)]
pub struct XuFilter {
    pub attribute: XuAttribute,
    pub predicate: XuPredicate,
    pub value: String,
}

impl XuFilter {
    /// Builds a filter, rejecting attribute/predicate type mismatches.
    pub fn new(attribute: XuAttribute, predicate: XuPredicate, value: String) -> Result<Self> {
        let filter = Self {
            attribute,
            predicate,
            value,
        };
        filter.validate()?;
        Ok(filter)
    }

    /// Parses a whitespace-separated `attribute predicate value` tuple.
    /// The value is everything after the first two tokens, so titles with
    /// spaces remain expressible.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let (attribute, predicate) = match (tokens.next(), tokens.next()) {
            (Some(attribute), Some(predicate)) => (attribute, predicate),
            _ => {
                return Err(XuError::validation(format!(
                    "filter '{text}' must be 'attribute predicate value'"
                )))
            }
        };
        let value = tokens.collect::<Vec<_>>().join(" ");
        if value.is_empty() {
            return Err(XuError::validation(format!(
                "filter '{text}' is missing a value"
            )));
        }

        Self::new(
            XuAttribute::parse(attribute)?,
            XuPredicate::parse(predicate)?,
            value,
        )
    }

    fn validate(&self) -> Result<()> {
        match self.predicate {
            XuPredicate::Is => {
                if self.attribute.is_integer() {
                    self.int_value()?;
                }
                Ok(())
            }
            XuPredicate::Gt | XuPredicate::Ge | XuPredicate::Lt | XuPredicate::Le => {
                if !self.attribute.is_integer() {
                    return Err(XuError::predicate_type(
                        self.attribute.column(),
                        self.predicate.as_str(),
                        "ordering predicates require an integer-valued attribute",
                    ));
                }
                self.int_value()?;
                Ok(())
            }
            XuPredicate::StartsWith | XuPredicate::EndsWith | XuPredicate::Contains => {
                if self.attribute.is_integer() {
                    return Err(XuError::predicate_type(
                        self.attribute.column(),
                        self.predicate.as_str(),
                        "substring predicates require a string-valued attribute",
                    ));
                }
                Ok(())
            }
            XuPredicate::Under => {
                if !self.attribute.is_netloc() {
                    return Err(XuError::predicate_type(
                        self.attribute.column(),
                        self.predicate.as_str(),
                        "'under' applies to domain name attributes only",
                    ));
                }
                Ok(())
            }
        }
    }

    fn int_value(&self) -> Result<i64> {
        self.value.parse().map_err(|_| {
            XuError::validation(format!(
                "filter value '{}' for '{}' must be an integer",
                self.value,
                self.attribute.column()
            ))
        })
    }

    /// The filter value coerced to the attribute's storage type. Only
    /// called after validation, so the integer parse cannot fail.
    fn scalar(&self) -> XuScalar {
        if self.attribute.is_integer() {
            XuScalar::Int(self.value.parse().unwrap_or(0))
        } else {
            XuScalar::Text(self.value.clone())
        }
    }

    /// Evaluates the filter against one resolved row. Missing scalars fail
    /// the test.
    pub fn matches(&self, row: &XuOccurrence) -> bool {
        match self.predicate {
            XuPredicate::Is => {
                if self.attribute.is_integer() {
                    row.integer(&self.attribute) == self.value.parse().ok()
                } else {
                    row.text(&self.attribute) == Some(self.value.as_str())
                }
            }
            XuPredicate::Gt => self.ordering(row, |observed, value| observed > value),
            XuPredicate::Ge => self.ordering(row, |observed, value| observed >= value),
            XuPredicate::Lt => self.ordering(row, |observed, value| observed < value),
            XuPredicate::Le => self.ordering(row, |observed, value| observed <= value),
            XuPredicate::StartsWith => {
                self.substring(row, |observed, value| observed.starts_with(value))
            }
            XuPredicate::EndsWith => {
                self.substring(row, |observed, value| observed.ends_with(value))
            }
            XuPredicate::Contains => {
                self.substring(row, |observed, value| observed.contains(value))
            }
            XuPredicate::Under => row
                .text(&self.attribute)
                .map_or(false, |observed| attrs::domain_under(observed, &self.value)),
        }
    }

    fn ordering(&self, row: &XuOccurrence, test: impl Fn(i64, i64) -> bool) -> bool {
        match (row.integer(&self.attribute), self.value.parse::<i64>()) {
            (Some(observed), Ok(value)) => test(observed, value),
            _ => false,
        }
    }

    fn substring(&self, row: &XuOccurrence, test: impl Fn(&str, &str) -> bool) -> bool {
        row.text(&self.attribute)
            .map_or(false, |observed| test(observed, &self.value))
    }

    /// Emits this filter's WHERE fragment and pushes its bound parameters.
    ///
    /// Substring tests compile to `substr`/`instr` comparisons rather than
    /// LIKE so the value needs no pattern escaping; `under` compiles to the
    /// `domain_under` scalar function registered on the connection, the
    /// same function the row-side predicate calls.
    fn fragment(&self, params: &mut Vec<XuScalar>) -> String {
        let column = format!("\"{}\"", self.attribute.column());
        match self.predicate {
            XuPredicate::Is => {
                params.push(self.scalar());
                format!("{column} = ?")
            }
            XuPredicate::Gt => {
                params.push(self.scalar());
                format!("{column} > ?")
            }
            XuPredicate::Ge => {
                params.push(self.scalar());
                format!("{column} >= ?")
            }
            XuPredicate::Lt => {
                params.push(self.scalar());
                format!("{column} < ?")
            }
            XuPredicate::Le => {
                params.push(self.scalar());
                format!("{column} <= ?")
            }
            XuPredicate::StartsWith => {
                params.push(self.scalar());
                params.push(self.scalar());
                format!("substr({column}, 1, length(?)) = ?")
            }
            XuPredicate::EndsWith => {
                params.push(self.scalar());
                params.push(self.scalar());
                format!("substr({column}, -length(?)) = ?")
            }
            XuPredicate::Contains => {
                params.push(self.scalar());
                format!("instr({column}, ?) > 0")
            }
            XuPredicate::Under => {
                params.push(self.scalar());
                format!("domain_under({column}, ?)")
            }
        }
    }
}

/// Include and exclude filter lists for one export run.
#[derive(Clone, Debug, Default)]
pub struct XuFilterSet {
    pub include: Vec<XuFilter>,
    pub exclude: Vec<XuFilter>,
}

impl XuFilterSet {
    /// Parses and validates raw filter tuples. Any invalid tuple aborts
    /// before query execution.
    pub fn parse(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: include
                .iter()
                .map(|text| XuFilter::parse(text))
                .collect::<Result<Vec<_>>>()?,
            exclude: exclude
                .iter()
                .map(|text| XuFilter::parse(text))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Row acceptance: all includes true, all excludes false.
    pub fn accepts(&self, row: &XuOccurrence) -> bool {
        self.include.iter().all(|filter| filter.matches(row))
            && self.exclude.iter().all(|filter| !filter.matches(row))
    }

    /// Compiles the set into one conjunctive WHERE fragment with bound
    /// parameters. Exclude filters are negated individually.
    pub fn compile(&self) -> XuWhereClause {
        let mut params = Vec::new();
        let mut clauses = Vec::with_capacity(self.include.len() + self.exclude.len());

        for filter in &self.include {
            clauses.push(filter.fragment(&mut params));
        }
        for filter in &self.exclude {
            clauses.push(format!("NOT ({})", filter.fragment(&mut params)));
        }

        XuWhereClause {
            sql: clauses.join(" AND "),
            params,
        }
    }
}
