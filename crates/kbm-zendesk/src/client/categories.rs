//! Category operations for Zendesk API.

use serde::Deserialize;
use tracing::info;

use super::ZendeskClient;
use crate::error::ZendeskError;
use crate::help_center::Listing;
use crate::types::{Category, NewCategory};

#[derive(Deserialize)]
struct CategoryEnvelope {
    category: Category,
}

impl ZendeskClient {
    pub(super) fn categories(&self, locale: &str) -> Listing<'_, Category> {
        self.paginate(
            format!("{}/{}/categories.json", self.api_url(), locale),
            "categories",
        )
    }

    pub(super) fn post_category(&self, category: &NewCategory) -> Result<Category, ZendeskError> {
        let url = format!("{}/{}/categories.json", self.api_url(), category.locale);

        info!(name = %category.name, locale = %category.locale, "Creating category");

        let payload = serde_json::json!({ "category": category });
        let envelope: CategoryEnvelope = self.post_json(&url, &payload)?;
        Ok(envelope.category)
    }
}
