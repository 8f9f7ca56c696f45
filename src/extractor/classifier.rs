//! Field inference for unlabeled listing rows.
//!
//! The listing table has no usable header, so each cell is matched against an
//! ordered rule table. The first rule that accepts a cell claims it, and each
//! field keeps the first cell that was claimed for it. Field identity therefore
//! depends on cell order within the row, not on a column index.

use regex::Regex;
use std::sync::LazyLock;

use crate::extractor::link;
use crate::extractor::model::{Cell, ClassifiedRow};

/// Bumped whenever a pattern or the rule order changes.
pub const RULESET_VERSION: u32 = 2;

/// Rows with fewer cells are layout or header rows.
pub const MIN_DATA_ROW_CELLS: usize = 6;

/// Names are longer than this, regions shorter.
pub const TEXT_LENGTH_THRESHOLD: usize = 30;

static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d[\d\s]*\.?\d*\.?\d*\s*руб").unwrap());

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{2}-\d{4}").unwrap());

static REGION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[А-ЯЁ][а-яё]+\s*(?:обл|край)|г\.|Респ").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Price,
    Name,
    Region,
}

/// A predicate over a cell's text and the fields found so far in its row.
pub struct FieldRule {
    pub field: Field,
    pub matches: fn(&str, &ClassifiedRow) -> bool,
}

/// Evaluated top to bottom for every cell.
pub static RULES: [FieldRule; 3] = [
    FieldRule {
        field: Field::Price,
        matches: is_price,
    },
    FieldRule {
        field: Field::Name,
        matches: is_name,
    },
    FieldRule {
        field: Field::Region,
        matches: is_region,
    },
];

fn is_price(text: &str, _row: &ClassifiedRow) -> bool {
    PRICE_PATTERN.is_match(text)
}

fn is_name(text: &str, row: &ClassifiedRow) -> bool {
    row.price_text.is_empty()
        && text.chars().count() > TEXT_LENGTH_THRESHOLD
        && !DATE_PATTERN.is_match(text)
}

fn is_region(text: &str, _row: &ClassifiedRow) -> bool {
    text.chars().count() < TEXT_LENGTH_THRESHOLD && REGION_PATTERN.is_match(text)
}

/// Which rule, if any, claims `text` given the fields already assigned.
pub fn field_of(text: &str, row: &ClassifiedRow) -> Option<Field> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(text, row))
        .map(|rule| rule.field)
}

/// Classify one table row. Returns `None` for narrow rows and for rows where
/// no price or no name was found.
pub fn classify(cells: &[Cell]) -> Option<ClassifiedRow> {
    if cells.len() < MIN_DATA_ROW_CELLS {
        return None;
    }

    let mut row = ClassifiedRow::default();
    for cell in cells {
        if let Some(field) = field_of(&cell.text, &row) {
            assign(&mut row, field, cell);
        }
    }

    if row.price_text.is_empty() || row.name.is_empty() {
        return None;
    }

    Some(row)
}

fn assign(row: &mut ClassifiedRow, field: Field, cell: &Cell) {
    match field {
        Field::Price if row.price_text.is_empty() => {
            row.price_text = cell.text.clone();
        }
        Field::Name if row.name.is_empty() => {
            row.name = cell.text.clone();
            row.link = cell
                .href
                .as_deref()
                .filter(|href| !href.is_empty())
                .map(link::resolve)
                .unwrap_or_default();
        }
        Field::Region if row.region.is_empty() => {
            row.region = cell.text.clone();
        }
        _ => {}
    }
}
