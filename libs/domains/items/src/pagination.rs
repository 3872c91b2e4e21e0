//! Page-number pagination with a fixed page size.

use axum::http::{HeaderMap, Uri, header};

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemResponse, PaginatedItems};

pub const PAGE_SIZE: u64 = 10;

const PAGE_PARAM: &str = "page";
const LAST_PAGE: &str = "last";
const FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Matching rows across all pages
    pub count: u64,
    /// 1-based
    pub number: u64,
    pub num_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// An empty result still has one (empty) page.
pub fn num_pages(count: u64, page_size: u64) -> u64 {
    count.div_ceil(page_size).max(1)
}

pub fn offset(number: u64, page_size: u64) -> u64 {
    (number - 1) * page_size
}

/// Resolve the `page` query parameter against the number of pages.
///
/// Absent or empty means 1, `last` means the final page. Anything that is not
/// a page number in `1..=num_pages` is [`ItemError::InvalidPage`].
pub fn resolve_page(raw: Option<&str>, num_pages: u64) -> ItemResult<u64> {
    let number = match raw.map(str::trim) {
        None | Some("") => 1,
        Some(LAST_PAGE) => num_pages,
        Some(value) => value.parse::<u64>().map_err(|_| ItemError::InvalidPage)?,
    };

    if number == 0 || number > num_pages {
        return Err(ItemError::InvalidPage);
    }
    Ok(number)
}

/// `scheme://host` the client used to reach us.
///
/// An absolute-form request URI wins; otherwise the `Host` header, with the
/// scheme from `X-Forwarded-Proto` (default `http`). Empty when neither is
/// known, which leaves links relative.
pub fn request_origin(headers: &HeaderMap, uri: &Uri) -> String {
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{}://{}", scheme, authority);
    }

    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return String::new();
    };
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or("http");

    format!("{}://{}", scheme, host)
}

/// Absolute link to page `number` of the listing at `uri`, keeping every
/// other query parameter. The first page is linked without a `page` parameter.
pub fn page_link(origin: &str, uri: &Uri, number: u64) -> String {
    let mut pairs: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some(PAGE_PARAM))
        .map(str::to_string)
        .collect();

    if number > 1 {
        pairs.push(format!("{}={}", PAGE_PARAM, number));
    }

    if pairs.is_empty() {
        format!("{}{}", origin, uri.path())
    } else {
        format!("{}{}?{}", origin, uri.path(), pairs.join("&"))
    }
}

impl PaginatedItems {
    pub fn from_page(page: Page<Item>, origin: &str, uri: &Uri) -> Self {
        let next = page
            .has_next()
            .then(|| page_link(origin, uri, page.number + 1));
        let previous = page
            .has_previous()
            .then(|| page_link(origin, uri, page.number - 1));

        Self {
            count: page.count,
            next,
            previous,
            results: page.results.into_iter().map(ItemResponse::from).collect(),
        }
    }
}
