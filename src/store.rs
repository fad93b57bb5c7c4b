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

//! # Xu Store Module
//!
//! SQLite connection management. Every connection handed out by this
//! module carries the two scalar functions the query layer depends on:
//!
//! - `urlsplit(url, field)` decomposes a URL into one named component,
//! - `domain_under(netloc, domain)` tests label-aligned domain membership.
//!
//! Both delegate to the same Rust implementations the row-side code
//! uses, so SQL-side and in-memory evaluation cannot drift apart.

use std::path::Path;

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};

use crate::attrs::{self, XuUrlField, XuUrlParts};
use crate::errors::{Result, XuError};

/// Opens a read-only connection to an existing database and registers
/// the Xu scalar functions on it.
pub fn open(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(XuError::configuration(format!(
            "input database '{}' does not exist",
            path.display()
        )));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    register_functions(&conn)?;
    Ok(conn)
}

/// Opens an in-memory database with the Xu scalar functions registered.
/// Used by tests that build their own fixture schema.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    register_functions(&conn)?;
    Ok(conn)
}

/// Registers `urlsplit` and `domain_under` on a connection.
pub fn register_functions(conn: &Connection) -> Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("urlsplit", 2, flags, |ctx| {
        let url: String = ctx.get(0)?;
        let field: String = ctx.get(1)?;
        let field = XuUrlField::parse(&field).ok_or_else(|| {
            rusqlite::Error::UserFunctionError(
                format!("urlsplit: unknown field '{field}'").into(),
            )
        })?;
        Ok(XuUrlParts::split(&url).field(field).to_string())
    })?;

    conn.create_scalar_function("domain_under", 2, flags, |ctx| {
        let netloc: String = ctx.get(0)?;
        let domain: String = ctx.get(1)?;
        Ok(attrs::domain_under(&netloc, &domain))
    })?;

    Ok(())
}
