use std::fs;

use crate::extractor::{ExtractError, extract_from_html};

fn listing_fixture() -> String {
    fs::read_to_string("src/extractor/tests/fixtures/listing.html")
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_listing_page() {
    let lots = extract_from_html(&listing_fixture()).unwrap();

    assert_eq!(lots.len(), 3);

    assert_eq!(
        lots[0].name,
        "Нежилое помещение площадью 312,4 кв.м, г. Химки, ул. Ленина"
    );
    assert_eq!(lots[0].region, "Московская обл");
    assert_eq!(lots[0].price, 1250000.0);
    assert_eq!(lots[0].price_text, "1 250 000,00руб.");
    assert_eq!(
        lots[0].link,
        "https://torgi.org/index.php?class=Auction&action=View&id=101"
    );

    assert_eq!(
        lots[1].name,
        "Земельный участок сельскохозяйственного назначения, 12 га"
    );
    assert_eq!(lots[1].region, "Краснодарский край");
    assert_eq!(lots[1].price, 3400500.5);
    assert_eq!(
        lots[1].link,
        "https://torgi.org/index.php?class=Auction&action=View&id=102"
    );

    assert_eq!(lots[2].region, "г. Санкт-Петербург");
    assert_eq!(lots[2].price, 95000.0);
    assert_eq!(
        lots[2].link,
        "https://torgi.org/index.php?class=Auction&action=View&id=106"
    );
}

#[test]
fn test_extract_skips_cancelled_and_misordered_rows() {
    let lots = extract_from_html(&listing_fixture()).unwrap();

    // zero-priced lot 104 and price-before-name lot 105 never materialize
    assert!(lots.iter().all(|lot| !lot.link.ends_with("id=104")));
    assert!(lots.iter().all(|lot| !lot.link.ends_with("id=105")));
    assert!(lots.iter().all(|lot| lot.price > 0.0));
}

#[test]
fn test_extract_is_deterministic() {
    let html = listing_fixture();
    assert_eq!(
        extract_from_html(&html).unwrap(),
        extract_from_html(&html).unwrap()
    );
}

#[test]
fn test_first_table_alone_is_not_enough() {
    let html = r#"<!DOCTYPE html><html><body><table><tr>
        <td>Нежилое помещение площадью 312,4 кв.м, г. Химки</td>
        <td>Московская обл</td><td>1 000 руб</td><td>a</td><td>b</td><td>c</td>
    </tr></table></body></html>"#;

    assert_eq!(
        extract_from_html(html),
        Err(ExtractError::MissingTable { found: 1 })
    );
}

#[test]
fn test_malformed_html() {
    let html = "<html><body><table><tr><td>menu</table><table><tr><td>Квартира однокомнатная, 31 кв.м, улица Гагарина<td>г. Тверь<td>2 100 000 руб<td>x<td>y<td>z";

    // Unclosed markup still yields the lot
    let lots = extract_from_html(html).unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].region, "г. Тверь");
    assert_eq!(lots[0].price, 2100000.0);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use crate::extractor::{Cell, classifier, price};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract_from_html(&html);
        }

        #[test]
        fn test_normalize_is_finite_and_non_negative(raw in ".*") {
            let value = price::normalize(&raw);
            prop_assert!(value.is_finite());
            prop_assert!(value >= 0.0);
        }

        #[test]
        fn test_narrow_rows_never_classify(texts in prop::collection::vec(".*", 0..=5)) {
            let cells: Vec<Cell> = texts.into_iter().map(Cell::new).collect();
            prop_assert!(classifier::classify(&cells).is_none());
        }
    }
}
