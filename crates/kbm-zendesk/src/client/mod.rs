//! Zendesk Help Center REST API client.
//!
//! Provides a sync HTTP client authenticated with an agent email and API
//! token. Every request goes through [`ZendeskClient::execute`], which maps
//! HTTP statuses to [`ZendeskError`] variants and retries rate-limited and
//! transient failures according to the client's [`RetryPolicy`].

mod access;
mod articles;
mod categories;
mod pagination;
mod sections;
#[cfg(test)]
mod stub;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use kbm_config::{HttpConfig, InstanceConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ureq::Agent;
use ureq::http::Response;

use crate::error::ZendeskError;
use crate::help_center::{HelpCenter, Listing};
use crate::retry::RetryPolicy;
use crate::types::{
    Article, ArticleTranslation, Category, NewArticle, NewCategory, NewSection, PermissionGroup,
    Section, UserSegment,
};

use pagination::Pages;

/// Page size requested from list endpoints (API maximum).
const PAGE_SIZE: u32 = 100;

/// Zendesk Help Center REST API client.
pub struct ZendeskClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
    retry: RetryPolicy,
}

impl ZendeskClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `base_url` - Instance URL (e.g. `https://acme.zendesk.com`)
    /// * `email` - Agent email the token belongs to
    /// * `api_token` - API token
    /// * `timeout` - Per-request timeout
    /// * `retry` - Retry policy for 429/5xx/network failures
    #[must_use]
    pub fn new(
        base_url: &str,
        email: &str,
        api_token: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: basic_auth(email, api_token),
            retry,
        }
    }

    /// Create client from config values.
    #[must_use]
    pub fn from_config(instance: &InstanceConfig, http: &HttpConfig) -> Self {
        Self::new(
            &instance.base_url(),
            &instance.zendesk_user_email,
            &instance.zendesk_api_token,
            Duration::from_secs(http.timeout_secs),
            RetryPolicy::from_config(http),
        )
    }

    /// Instance base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the Help Center API base URL.
    fn api_url(&self) -> String {
        format!("{}/api/v2/help_center", self.base_url)
    }

    /// Get the Guide API base URL.
    fn guide_url(&self) -> String {
        format!("{}/api/v2/guide", self.base_url)
    }

    /// Lazily page through a list endpoint, reading records under `key`.
    fn paginate<T: DeserializeOwned + 'static>(
        &self,
        url: String,
        key: &'static str,
    ) -> Listing<'_, T> {
        let url = format!("{url}?per_page={PAGE_SIZE}");
        Box::new(Pages::new(self, url, key))
    }

    /// GET a URL and return the raw response body.
    fn get_text(&self, url: &str) -> Result<String, ZendeskError> {
        let response = self.execute("GET", url, || {
            self.agent
                .get(url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .call()
        })?;
        read_body(response)
    }

    /// GET a URL and deserialize the JSON response.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ZendeskError> {
        let body = self.get_text(url)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a JSON payload and deserialize the JSON response.
    fn post_json<P: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &P,
    ) -> Result<T, ZendeskError> {
        let response = self.execute("POST", url, || {
            self.agent
                .post(url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .send_json(payload)
        })?;
        let body = read_body(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// PUT a JSON payload, discarding the response body.
    fn put_json<P: Serialize>(&self, url: &str, payload: &P) -> Result<(), ZendeskError> {
        self.execute("PUT", url, || {
            self.agent
                .put(url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .send_json(payload)
        })?;
        Ok(())
    }

    /// Send a request, retrying rate-limited and transient failures.
    ///
    /// `send` is called once per attempt. A 429 that persists past the retry
    /// budget is reported as [`ZendeskError::Transient`]. A POST that fails
    /// without a response is not re-sent, since the server may already have
    /// created the resource.
    fn execute<F>(
        &self,
        method: &str,
        url: &str,
        send: F,
    ) -> Result<Response<ureq::Body>, ZendeskError>
    where
        F: Fn() -> Result<Response<ureq::Body>, ureq::Error>,
    {
        let mut attempt = 0;
        loop {
            debug!(method, url, attempt, "Sending request");
            let result = match send() {
                Ok(response) => check_status(url, response),
                Err(err) if method == "POST" => return Err(ZendeskError::from(err)),
                Err(err) => Err(ZendeskError::from(err)),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt, err.retry_after());
                    warn!(
                        method,
                        url,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying after error: {err}"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(ZendeskError::RateLimited { .. }) => {
                    return Err(ZendeskError::Transient(format!(
                        "{method} {url}: still rate limited after {attempt} retries"
                    )));
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl HelpCenter for ZendeskClient {
    fn list_categories(&self, locale: &str) -> Listing<'_, Category> {
        self.categories(locale)
    }

    fn list_sections(&self, locale: &str) -> Listing<'_, Section> {
        self.sections(locale)
    }

    fn list_articles(&self, locale: &str) -> Listing<'_, Article> {
        self.articles(locale)
    }

    fn list_permission_groups(&self) -> Listing<'_, PermissionGroup> {
        self.permission_groups()
    }

    fn list_user_segments(&self) -> Listing<'_, UserSegment> {
        self.user_segments()
    }

    fn get_article(&self, locale: &str, id: u64) -> Result<Article, ZendeskError> {
        self.article(locale, id)
    }

    fn create_category(&self, category: &NewCategory) -> Result<Category, ZendeskError> {
        self.post_category(category)
    }

    fn create_section(
        &self,
        category_id: u64,
        section: &NewSection,
    ) -> Result<Section, ZendeskError> {
        self.post_section(category_id, section)
    }

    fn create_article(
        &self,
        section_id: u64,
        article: &NewArticle,
    ) -> Result<Article, ZendeskError> {
        self.post_article(section_id, article)
    }

    fn update_article(
        &self,
        article_id: u64,
        locale: &str,
        translation: &ArticleTranslation,
    ) -> Result<(), ZendeskError> {
        self.put_translation(article_id, locale, translation)
    }
}

/// Build the `Authorization` header value for API token auth.
fn basic_auth(email: &str, api_token: &str) -> String {
    let credentials = format!("{email}/token:{api_token}");
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}

/// Turn error statuses into [`ZendeskError`], passing successes through.
fn check_status(
    url: &str,
    response: Response<ureq::Body>,
) -> Result<Response<ureq::Body>, ZendeskError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok());
    let body = response
        .into_body()
        .read_to_string()
        .unwrap_or_else(|_| "(unable to read error body)".to_owned());

    Err(ZendeskError::from_status(status, url, body, retry_after))
}

fn read_body(response: Response<ureq::Body>) -> Result<String, ZendeskError> {
    Ok(response.into_body().read_to_string()?)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Instant;

    use pretty_assertions::assert_eq;

    use super::*;

    const URL: &str = "https://acme.zendesk.com/api/v2/help_center/categories.json";

    fn client(max_retries: u32, base_delay: Duration) -> ZendeskClient {
        ZendeskClient::new(
            "https://acme.zendesk.com",
            "a@b.c",
            "t",
            Duration::from_secs(5),
            RetryPolicy {
                max_retries,
                base_delay,
            },
        )
    }

    fn response(status: u16, retry_after: Option<&str>, body: &str) -> Response<ureq::Body> {
        let mut builder = Response::builder().status(status);
        if let Some(secs) = retry_after {
            builder = builder.header("Retry-After", secs);
        }
        builder
            .body(
                ureq::Body::builder()
                    .mime_type("application/json")
                    .data(body.to_owned()),
            )
            .unwrap()
    }

    #[test]
    fn test_persistent_rate_limit_becomes_transient() {
        let attempts = Cell::new(0);
        let result = client(2, Duration::ZERO).execute("GET", URL, || {
            attempts.set(attempts.get() + 1);
            Ok(response(429, Some("0"), ""))
        });

        assert!(matches!(result, Err(ZendeskError::Transient(_))));
        assert_eq!(attempts.get(), 3);
    }

    #[test]
    fn test_server_error_retried_then_succeeds() {
        let attempts = Cell::new(0);
        let result = client(2, Duration::ZERO).execute("GET", URL, || {
            attempts.set(attempts.get() + 1);
            Ok(match attempts.get() {
                1 => response(503, None, "down"),
                _ => response(200, None, r#"{"ok":true}"#),
            })
        });

        assert_eq!(read_body(result.unwrap()).unwrap(), r#"{"ok":true}"#);
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_server_error_surfaces_after_retry_budget() {
        let attempts = Cell::new(0);
        let result = client(1, Duration::ZERO).execute("GET", URL, || {
            attempts.set(attempts.get() + 1);
            Ok(response(502, None, "bad gateway"))
        });

        assert!(matches!(result, Err(ZendeskError::Transient(msg)) if msg.contains("502")));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_auth_failure_not_retried() {
        let attempts = Cell::new(0);
        let result = client(3, Duration::ZERO).execute("GET", URL, || {
            attempts.set(attempts.get() + 1);
            Ok(response(401, None, "Couldn't authenticate you"))
        });

        assert!(matches!(result, Err(ZendeskError::Auth { status: 401, .. })));
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let attempts = Cell::new(0);
        let started = Instant::now();
        let result = client(1, Duration::from_secs(30)).execute("GET", URL, || {
            attempts.set(attempts.get() + 1);
            Ok(match attempts.get() {
                1 => response(429, Some("0"), ""),
                _ => response(200, None, "{}"),
            })
        });

        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_network_failure_retried_for_get_only() {
        let attempts = Cell::new(0);
        let send = || -> Result<Response<ureq::Body>, ureq::Error> {
            attempts.set(attempts.get() + 1);
            Err(ureq::Error::ConnectionFailed)
        };

        let get = client(2, Duration::ZERO).execute("GET", URL, &send);
        assert!(matches!(get, Err(ZendeskError::Transient(_))));
        assert_eq!(attempts.get(), 3);

        attempts.set(0);
        let post = client(2, Duration::ZERO).execute("POST", URL, &send);
        assert!(matches!(post, Err(ZendeskError::Transient(_))));
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn test_basic_auth_header() {
        // base64("agent@example.com/token:abc123")
        assert_eq!(
            basic_auth("agent@example.com", "abc123"),
            "Basic YWdlbnRAZXhhbXBsZS5jb20vdG9rZW46YWJjMTIz"
        );
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = ZendeskClient::new(
            "https://acme.zendesk.com/",
            "a@b.c",
            "t",
            Duration::from_secs(5),
            RetryPolicy::none(),
        );
        assert_eq!(client.base_url(), "https://acme.zendesk.com");
        assert_eq!(
            client.api_url(),
            "https://acme.zendesk.com/api/v2/help_center"
        );
        assert_eq!(client.guide_url(), "https://acme.zendesk.com/api/v2/guide");
    }

    #[test]
    fn test_from_config_expands_subdomain() {
        let instance = InstanceConfig {
            zendesk_api_token: "t".to_owned(),
            zendesk_user_email: "a@b.c".to_owned(),
            zendesk_subdomain: "acme".to_owned(),
        };
        let client = ZendeskClient::from_config(&instance, &HttpConfig::default());
        assert_eq!(client.base_url(), "https://acme.zendesk.com");
    }
}
