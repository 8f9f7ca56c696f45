use scraper::Html;
use tracing::{debug, instrument};

use crate::extractor::{
    classifier, dom,
    errors::ExtractError,
    model::{Cell, Lot},
    price,
};

/// Turn table rows into lots, in row order.
///
/// Rows that do not classify or whose price normalizes to zero are dropped.
/// A candidate with the same name and exactly the same price as an already
/// accepted lot is dropped too.
pub fn extract_lots<I>(rows: I) -> Vec<Lot>
where
    I: IntoIterator<Item = Vec<Cell>>,
{
    let mut lots: Vec<Lot> = Vec::new();

    for cells in rows {
        let Some(row) = classifier::classify(&cells) else {
            continue;
        };

        let price = price::normalize(&row.price_text);
        if price <= 0.0 {
            continue;
        }

        let lot = Lot {
            name: row.name,
            region: row.region,
            price,
            price_text: row.price_text,
            link: row.link,
        };

        if lots.iter().any(|seen| seen.same_strict(&lot)) {
            continue;
        }

        let short_name: String = lot.name.chars().take(50).collect();
        debug!(index = lots.len() + 1, price = lot.price, name = %short_name, "Accepted lot");
        lots.push(lot);
    }

    lots
}

/// Parse a listing page and extract the lots of its designated table.
#[instrument(skip_all, fields(bytes = html.len()))]
pub fn extract_from_html(html: &str) -> Result<Vec<Lot>, ExtractError> {
    let document = Html::parse_document(html);
    let table = dom::designated_table(&document)?;
    Ok(extract_lots(dom::rows_of(table)))
}
