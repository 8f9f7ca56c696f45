#![no_main]

use libfuzzer_sys::fuzz_target;

use torgi_lots::extractor::{extract_from_html, price};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // Neither the page extractor nor the price parser may panic on any input
    if let Ok(lots) = extract_from_html(&html) {
        for lot in lots {
            assert!(lot.price > 0.0 && lot.price.is_finite());
            assert!(!lot.name.is_empty());
        }
    }
    let value = price::normalize(&html);
    assert!(value >= 0.0 && value.is_finite());
});
