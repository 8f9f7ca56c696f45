use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::extractor::Lot;

const CSV_NAME_CHARS: usize = 100;
const LISTING_NAME_CHARS: usize = 80;
const RULE_WIDTH: usize = 100;

/// JSON document written for a run.
#[derive(Debug, Serialize)]
pub struct LotReport<'a> {
    pub timestamp: DateTime<Utc>,
    pub total_lots: usize,
    pub lots: &'a [Lot],
}

impl<'a> LotReport<'a> {
    pub fn new(lots: &'a [Lot], timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            total_lots: lots.len(),
            lots,
        }
    }
}

pub fn to_json(lots: &[Lot], timestamp: DateTime<Utc>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&LotReport::new(lots, timestamp))?)
}

/// One CSV record per lot: 1-based index, name cut to 100 characters, price,
/// region, link.
pub fn to_csv(lots: &[Lot]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["index", "name", "price", "region", "link"])?;

    for (index, lot) in lots.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            truncate_chars(&lot.name, CSV_NAME_CHARS).to_string(),
            format!("{:.2}", lot.price),
            lot.region.clone(),
            lot.link.clone(),
        ])?;
    }

    Ok(String::from_utf8(writer.into_inner()?)?)
}

/// Human-readable listing for the terminal.
pub fn render_listing(title: &str, lots: &[Lot]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{title}: {} lots", lots.len());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for (rank, lot) in lots.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {:>16} руб", rank + 1, format_rubles(lot.price));
        if !lot.region.is_empty() {
            let _ = writeln!(out, "     регион: {}", lot.region);
        }
        let _ = writeln!(out, "     {}", abbreviate(&lot.name, LISTING_NAME_CHARS));
        if !lot.link.is_empty() {
            let _ = writeln!(out, "     {}", lot.link);
        }
        let _ = writeln!(out, "{rule}");
    }

    out
}

/// `1234567.891` → `"1,234,567.89"`.
pub fn format_rubles(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    format!("{grouped}.{fraction}")
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn abbreviate(text: &str, max_chars: usize) -> String {
    let head = truncate_chars(text, max_chars);
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        head.to_string()
    }
}
