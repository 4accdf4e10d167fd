use reqwest::header::HeaderMap;
use serde::Serialize;

pub const TOTAL_COUNT: &str = "x-total-count";
pub const TOTAL_PAGES: &str = "x-total-pages";
pub const CURRENT_PAGE: &str = "x-current-page";
pub const PER_PAGE: &str = "x-per-page";

/// Pagination metadata reported by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u64,
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total_items: 0,
            total_pages: 0,
            page: 1,
            per_page: 10,
        }
    }
}

impl Pagination {
    /// Missing, zero or unparsable headers fall back to the defaults.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let defaults = Self::default();
        Self {
            total_items: header_number(headers, TOTAL_COUNT).unwrap_or(defaults.total_items),
            total_pages: header_number(headers, TOTAL_PAGES).unwrap_or(defaults.total_pages),
            page: header_number(headers, CURRENT_PAGE)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.page),
            per_page: header_number(headers, PER_PAGE)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.per_page),
        }
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn reads_all_four_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT, HeaderValue::from_static("42"));
        headers.insert(TOTAL_PAGES, HeaderValue::from_static("2"));
        headers.insert(CURRENT_PAGE, HeaderValue::from_static("2"));
        headers.insert(PER_PAGE, HeaderValue::from_static("25"));

        assert_eq!(
            Pagination::from_headers(&headers),
            Pagination { total_items: 42, total_pages: 2, page: 2, per_page: 25 }
        );
    }

    #[test]
    fn missing_or_garbage_headers_use_defaults() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT, HeaderValue::from_static("lots"));
        headers.insert(CURRENT_PAGE, HeaderValue::from_static("0"));

        assert_eq!(Pagination::from_headers(&headers), Pagination::default());
    }
}
