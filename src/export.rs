// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::models::Transaction;

pub const DEFAULT_FILE_NAME: &str = "extrato.csv";
pub const HEADER: &str = "descricao,subtitulo,valor,tipo,categoria,data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::invalid_field(
                "format",
                format!("unknown format '{}' (use csv|json)", other),
            )),
        }
    }
}

/// Header line, then one fully quoted record per transaction.
pub fn write_csv<W: Write>(transactions: &[Transaction], mut out: W) -> Result<()> {
    out.write_all(HEADER.as_bytes())?;
    out.write_all(b"\n")?;
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    for t in transactions {
        let amount = t.amount.to_string();
        wtr.write_record([
            t.description.as_str(),
            t.subtitle.as_deref().unwrap_or(""),
            amount.as_str(),
            t.kind.as_str(),
            t.category.as_deref().unwrap_or(""),
            t.created_at.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(transactions, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::invalid_field("csv", e.to_string()))
}

pub fn export_transactions(
    transactions: &[Transaction],
    path: &Path,
    format: ExportFormat,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(transactions, File::create(path)?)?,
        ExportFormat::Json => {
            std::fs::write(path, serde_json::to_string_pretty(transactions)?)?;
        }
    }
    tracing::info!(
        rows = transactions.len(),
        "exported transactions to {}",
        path.display()
    );
    Ok(())
}
