//! Section operations for Zendesk API.

use serde::Deserialize;
use tracing::info;

use super::ZendeskClient;
use crate::error::ZendeskError;
use crate::help_center::Listing;
use crate::types::{NewSection, Section};

#[derive(Deserialize)]
struct SectionEnvelope {
    section: Section,
}

impl ZendeskClient {
    pub(super) fn sections(&self, locale: &str) -> Listing<'_, Section> {
        self.paginate(
            format!("{}/{}/sections.json", self.api_url(), locale),
            "sections",
        )
    }

    pub(super) fn post_section(
        &self,
        category_id: u64,
        section: &NewSection,
    ) -> Result<Section, ZendeskError> {
        let url = format!(
            "{}/{}/categories/{}/sections.json",
            self.api_url(),
            section.locale,
            category_id
        );

        info!(name = %section.name, category_id, "Creating section");

        let payload = serde_json::json!({ "section": section });
        let envelope: SectionEnvelope = self.post_json(&url, &payload)?;
        Ok(envelope.section)
    }
}
