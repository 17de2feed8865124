// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};

const UA: &str = concat!(
    "fluxo/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/fluxo)"
);

pub fn http_client() -> crate::error::Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses money and percentages as typed by people: `1200`, `-50.5`,
/// `R$ 1.234,56`, `14,2`.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim().trim_start_matches("R$").trim().trim_end_matches('%').trim();
    if t.is_empty() {
        return None;
    }
    let normalized = match (t.contains(','), t.contains('.')) {
        (true, true) => t.replace('.', "").replace(',', "."),
        (true, false) => t.replace(',', "."),
        _ => t.to_string(),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn fmt_money(v: f64) -> String {
    if v < 0.0 {
        format!("- R$ {:.2}", -v)
    } else {
        format!("R$ {:.2}", v)
    }
}

pub fn fmt_percent(v: f64) -> String {
    format!("{:.0}%", v)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize + ?Sized>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_in_local_formats() {
        assert_eq!(parse_number("1200"), Some(1200.0));
        assert_eq!(parse_number("-50"), Some(-50.0));
        assert_eq!(parse_number("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_number("14,2%"), Some(14.2));
        assert_eq!(parse_number("  "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn money_formatting() {
        assert_eq!(fmt_money(320.4), "R$ 320.40");
        assert_eq!(fmt_money(-38.9), "- R$ 38.90");
    }

    #[test]
    fn json_output_accepts_slices() {
        let amounts = [1.5, -2.0];
        let slice: &[f64] = &amounts;
        assert!(maybe_print_json(false, true, slice).unwrap());
        assert!(!maybe_print_json(false, false, slice).unwrap());
    }
}
