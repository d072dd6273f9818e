//! Transparent pagination over list endpoints.
//!
//! Help Center list responses carry records under a resource key
//! (`"categories"`, `"articles"`, ...) and the URL of the next page in
//! `next_page` (offset pagination) or `links.next` when `meta.has_more` is
//! set (cursor pagination). [`Pages`] follows either until it is absent.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::ZendeskClient;
use crate::error::ZendeskError;

/// One parsed page of a list response.
#[derive(Debug)]
struct Page<T> {
    items: Vec<T>,
    next_page: Option<String>,
}

/// Iterator yielding records across pages, fetching lazily.
pub(super) struct Pages<'a, T> {
    client: &'a ZendeskClient,
    key: &'static str,
    next_url: Option<String>,
    buffered: std::vec::IntoIter<T>,
}

impl<'a, T> Pages<'a, T> {
    pub(super) fn new(client: &'a ZendeskClient, url: String, key: &'static str) -> Self {
        Self {
            client,
            key,
            next_url: Some(url),
            buffered: Vec::new().into_iter(),
        }
    }
}

impl<T: DeserializeOwned> Iterator for Pages<'_, T> {
    type Item = Result<T, ZendeskError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.next() {
                return Some(Ok(item));
            }

            let url = self.next_url.take()?;
            debug!(url = %url, key = self.key, "Fetching page");

            let page = self
                .client
                .get_text(&url)
                .and_then(|body| parse_page::<T>(&body, self.key));

            match page {
                Ok(page) => {
                    // Guard against a server echoing the current URL forever
                    self.next_url = page.next_page.filter(|next| *next != url);
                    self.buffered = page.items.into_iter();
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Parse a list response body.
fn parse_page<T: DeserializeOwned>(body: &str, key: &str) -> Result<Page<T>, ZendeskError> {
    let mut value: Value = serde_json::from_str(body)?;

    let items = match value.get_mut(key) {
        Some(records) => serde_json::from_value(records.take())?,
        None => {
            return Err(ZendeskError::InvalidResponse(format!(
                "missing '{key}' in list response"
            )));
        }
    };

    let offset_next = value
        .get("next_page")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let cursor_next = || {
        let has_more = value
            .pointer("/meta/has_more")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        has_more
            .then(|| value.pointer("/links/next").and_then(Value::as_str))
            .flatten()
            .map(str::to_owned)
    };

    Ok(Page {
        items,
        next_page: offset_next.or_else(cursor_next),
    })
}
