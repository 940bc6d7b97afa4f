//! # Pagination
//!
//! Page-number pagination for list endpoints.
//!
//! ## Envelope
//! ```json
//! {
//!   "count": 15,
//!   "next": "/api/products/?page=2&page_size=10",
//!   "previous": null,
//!   "results": [ ... ]
//! }
//! ```
//!
//! ## Query Parameters
//! - `page`: 1-based page number, or `last`. Anything else that does not
//!   name an existing page is a 404 `Invalid page.`
//! - `page_size`: falls back to the configured default when missing, zero,
//!   or unparseable; capped at `max_page_size`.
//!
//! Links are relative and keep every other query parameter. The link back
//! to page 1 drops `page` altogether.

use axum::http::Uri;
use serde::Serialize;
use url::Url;

use crate::config::PaginationSettings;
use crate::error::{ApiError, ApiResult};

const PAGE_PARAM: &str = "page";
const LAST_PAGE: &str = "last";

/// Placeholder origin so relative request URIs can go through [`Url`].
const LINK_BASE: &str = "http://localhost";

/// A resolved page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub page_size: usize,
    pub num_pages: usize,
    pub count: usize,
}

impl Pager {
    /// Resolves raw `page` / `page_size` parameters against `count` rows.
    pub fn new(
        page: Option<&str>,
        page_size: Option<&str>,
        count: usize,
        settings: &PaginationSettings,
    ) -> ApiResult<Self> {
        let page_size = page_size
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.min(settings.max_page_size))
            .unwrap_or(settings.page_size);

        // An empty listing still has one (empty) page.
        let num_pages = count.div_ceil(page_size).max(1);

        let page = match page.map(str::trim) {
            None | Some("") => 1,
            Some(LAST_PAGE) => num_pages,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=num_pages).contains(n))
                .ok_or_else(|| ApiError::not_found("Invalid page."))?,
        };

        Ok(Pager {
            page,
            page_size,
            num_pages,
            count,
        })
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) * self.page_size) as i64
    }

    pub fn has_next(&self) -> bool {
        self.page < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Wraps `results` in the envelope, with links derived from `uri`.
    pub fn paginate<T>(&self, uri: &Uri, results: Vec<T>) -> Paginated<T> {
        let next = self.has_next().then(|| page_link(uri, Some(self.page + 1)));
        let previous = self.has_previous().then(|| {
            let target = self.page - 1;
            page_link(uri, (target > 1).then_some(target))
        });

        Paginated {
            count: self.count,
            next,
            previous,
            results,
        }
    }
}

/// The pagination envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Relative link to `uri` with `page` replaced (or removed when `None`).
pub fn page_link(uri: &Uri, page: Option<usize>) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let Ok(mut url) = Url::parse(LINK_BASE).and_then(|base| base.join(path_and_query)) else {
        return uri.path().to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    if !kept.is_empty() || page.is_some() {
        let mut pairs = url.query_pairs_mut();
        if let Some(page) = page {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
    }

    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
