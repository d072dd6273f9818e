//! Zendesk Help Center integration for kbm.
//!
//! This crate provides:
//! - [`HelpCenter`] trait: list, get and create operations for categories,
//!   sections and articles, the seam the backup and restore phases talk to
//! - [`ZendeskClient`]: blocking HTTP implementation with basic token auth,
//!   transparent pagination and bounded retry
//! - [`MockHelpCenter`]: in-memory implementation for tests (behind the
//!   `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use kbm_config::{HttpConfig, InstanceConfig};
//! use kbm_zendesk::{HelpCenter, ZendeskClient};
//!
//! let instance = InstanceConfig {
//!     zendesk_api_token: "token".to_owned(),
//!     zendesk_user_email: "agent@example.com".to_owned(),
//!     zendesk_subdomain: "acme".to_owned(),
//! };
//! let client = ZendeskClient::from_config(&instance, &HttpConfig::default());
//!
//! for category in client.list_categories("en-us") {
//!     let category = category?;
//!     println!("{} {}", category.id, category.name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod help_center;
#[cfg(feature = "mock")]
mod mock;
mod retry;
mod types;

pub use client::ZendeskClient;
pub use error::ZendeskError;
pub use help_center::{HelpCenter, Listing};
#[cfg(feature = "mock")]
pub use mock::MockHelpCenter;
pub use retry::RetryPolicy;
pub use types::{
    Article, ArticleTranslation, Category, NewArticle, NewCategory, NewSection, PermissionGroup,
    Section, UserSegment,
};
