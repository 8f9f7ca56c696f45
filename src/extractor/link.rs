pub const SITE_ORIGIN: &str = "https://torgi.org";
pub const INDEX_PAGE: &str = "index.php";

/// Turn a lot's `href` into an absolute URL on the auction site.
///
/// Root-relative paths and bare `index.php...` references are joined to the
/// origin, query-only references are joined to the index script, anything else
/// is returned untouched.
pub fn resolve(href: &str) -> String {
    if href.starts_with('/') {
        format!("{SITE_ORIGIN}{href}")
    } else if href.starts_with('?') {
        format!("{SITE_ORIGIN}/{INDEX_PAGE}{href}")
    } else if href.starts_with(INDEX_PAGE) {
        format!("{SITE_ORIGIN}/{href}")
    } else {
        href.to_string()
    }
}
