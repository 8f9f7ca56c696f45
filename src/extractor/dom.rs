use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::extractor::errors::ExtractError;
use crate::extractor::model::Cell;

/// The lots live in the second `<table>` of the listing page.
pub const DESIGNATED_TABLE_INDEX: usize = 1;

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Locate the listing table by position.
pub fn designated_table(document: &Html) -> Result<ElementRef<'_>, ExtractError> {
    let tables: Vec<ElementRef<'_>> = document.select(&TABLE_SELECTOR).collect();
    tables
        .get(DESIGNATED_TABLE_INDEX)
        .copied()
        .ok_or(ExtractError::MissingTable {
            found: tables.len(),
        })
}

/// Every `<tr>` under `table` in document order, nested tables included.
pub fn rows_of<'a>(table: ElementRef<'a>) -> impl Iterator<Item = Vec<Cell>> + 'a {
    table.select(&ROW_SELECTOR).map(cells_of)
}

pub fn cells_of(row: ElementRef<'_>) -> Vec<Cell> {
    row.select(&CELL_SELECTOR)
        .map(|cell| Cell {
            text: cell_text(cell),
            href: cell
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
        })
        .collect()
}

/// Each text node trimmed, empty ones dropped, the rest joined without a
/// separator.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_table_is_designated() {
        let html = r#"<html><body>
            <table id="menu"><tr><td>menu</td></tr></table>
            <table id="lots"><tr><td>lot</td></tr></table>
            <table id="footer"><tr><td>footer</td></tr></table>
        </body></html>"#;
        let document = Html::parse_document(html);

        let table = designated_table(&document).unwrap();
        assert_eq!(table.value().attr("id"), Some("lots"));
    }

    #[test]
    fn test_missing_table_reports_count() {
        let document = Html::parse_document("<table><tr><td>only</td></tr></table>");
        assert_eq!(
            designated_table(&document).unwrap_err(),
            ExtractError::MissingTable { found: 1 }
        );
    }

    #[test]
    fn test_cell_text_and_href() {
        let html = r#"<table></table><table><tr>
            <th>№</th>
            <td>  150 000,00
                <b> руб </b></td>
            <td><a>no href</a><a href="?id=3">Лот</a></td>
        </tr></table>"#;
        let document = Html::parse_document(html);
        let table = designated_table(&document).unwrap();

        let rows: Vec<Vec<Cell>> = rows_of(table).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            vec![
                Cell::new("№"),
                Cell::new("150 000,00руб"),
                Cell::with_href("no hrefЛот", "?id=3"),
            ]
        );
    }
}
