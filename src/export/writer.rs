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

//! # Xu Row Writers
//!
//! One writer per open destination file. Writers always open in append
//! mode, so rerunning an export adds to existing data instead of
//! replacing it. Parent directories are created on demand, which is what
//! lets templated destinations spell out folder hierarchies.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::attrs::XuAttribute;
use crate::errors::{Result, XuError};
use crate::record::XuOccurrence;

/// A sink for resolved occurrence rows.
pub trait XuRowWriter {
    fn write(&mut self, row: &XuOccurrence) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

fn destination_error(path: &Path, error: impl std::fmt::Display) -> XuError {
    XuError::destination(path.display().to_string(), error.to_string())
}

/// Opens `path` for appending, creating parent directories first.
/// Returns the file and whether it was empty at open time.
fn open_for_append(path: &Path) -> Result<(File, bool)> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| destination_error(path, e))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| destination_error(path, e))?;
    let empty = file
        .metadata()
        .map_err(|e| destination_error(path, e))?
        .len()
        == 0;
    Ok((file, empty))
}

/// Writes one attribute per row as plain text lines.
pub struct XuLineWriter {
    path: PathBuf,
    key: XuAttribute,
    out: BufWriter<File>,
}

impl XuLineWriter {
    pub fn open(path: &Path, key: XuAttribute) -> Result<Self> {
        let (file, _) = open_for_append(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            key,
            out: BufWriter::new(file),
        })
    }
}

impl XuRowWriter for XuLineWriter {
    fn write(&mut self, row: &XuOccurrence) -> Result<()> {
        writeln!(self.out, "{}", row.render(&self.key))
            .map_err(|e| destination_error(&self.path, e))
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(|e| destination_error(&self.path, e))
    }
}

/// Writes selected attributes as CSV. The header is emitted only when
/// the destination file is empty at open, so appending runs never
/// repeat it.
pub struct XuCsvWriter {
    path: PathBuf,
    columns: Vec<XuAttribute>,
    out: csv::Writer<File>,
}

impl XuCsvWriter {
    pub fn open(path: &Path, columns: Vec<XuAttribute>) -> Result<Self> {
        let (file, empty) = open_for_append(path)?;
        let mut out = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if empty {
            out.write_record(columns.iter().map(|attribute| attribute.column()))
                .map_err(|e| destination_error(path, e))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            columns,
            out,
        })
    }
}

impl XuRowWriter for XuCsvWriter {
    fn write(&mut self, row: &XuOccurrence) -> Result<()> {
        self.out
            .write_record(self.columns.iter().map(|attribute| row.render(attribute)))
            .map_err(|e| destination_error(&self.path, e))
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(|e| destination_error(&self.path, e))
    }
}
