//! Article operations for Zendesk API.

use serde::Deserialize;
use tracing::info;

use super::ZendeskClient;
use crate::error::ZendeskError;
use crate::help_center::Listing;
use crate::types::{Article, ArticleTranslation, NewArticle};

#[derive(Deserialize)]
struct ArticleEnvelope {
    article: Article,
}

impl ZendeskClient {
    pub(super) fn articles(&self, locale: &str) -> Listing<'_, Article> {
        self.paginate(
            format!("{}/{}/articles.json", self.api_url(), locale),
            "articles",
        )
    }

    pub(super) fn article(&self, locale: &str, id: u64) -> Result<Article, ZendeskError> {
        let url = format!("{}/{}/articles/{}.json", self.api_url(), locale, id);
        let envelope: ArticleEnvelope = self.get_json(&url)?;
        Ok(envelope.article)
    }

    pub(super) fn post_article(
        &self,
        section_id: u64,
        article: &NewArticle,
    ) -> Result<Article, ZendeskError> {
        let url = format!(
            "{}/{}/sections/{}/articles.json",
            self.api_url(),
            article.locale,
            section_id
        );

        info!(title = %article.title, section_id, "Creating article");

        let payload = serde_json::json!({
            "article": article,
            "notify_subscribers": false,
        });
        let envelope: ArticleEnvelope = self.post_json(&url, &payload)?;
        Ok(envelope.article)
    }

    pub(super) fn put_translation(
        &self,
        article_id: u64,
        locale: &str,
        translation: &ArticleTranslation,
    ) -> Result<(), ZendeskError> {
        let url = format!(
            "{}/articles/{}/translations/{}.json",
            self.api_url(),
            article_id,
            locale
        );

        info!(article_id, locale, "Updating article translation");

        let payload = serde_json::json!({ "translation": translation });
        match self.put_json(&url, &payload) {
            Err(ZendeskError::NotFound { .. }) => {
                self.post_translation(article_id, locale, translation)
            }
            other => other,
        }
    }

    /// Add a translation in a locale the article does not have yet.
    fn post_translation(
        &self,
        article_id: u64,
        locale: &str,
        translation: &ArticleTranslation,
    ) -> Result<(), ZendeskError> {
        let url = format!(
            "{}/articles/{}/translations.json",
            self.api_url(),
            article_id
        );

        info!(article_id, locale, "Creating article translation");

        let payload = serde_json::json!({
            "translation": {
                "locale": locale,
                "title": translation.title,
                "body": translation.body,
                "draft": translation.draft,
            }
        });
        let _: serde_json::Value = self.post_json(&url, &payload)?;
        Ok(())
    }
}
