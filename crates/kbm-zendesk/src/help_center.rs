//! The Help Center operations the mirror depends on.

use crate::error::ZendeskError;
use crate::types::{
    Article, ArticleTranslation, Category, NewArticle, NewCategory, NewSection, PermissionGroup,
    Section, UserSegment,
};

/// Lazy sequence of records, fetched page by page as it is consumed.
///
/// A failed page fetch yields one `Err` and ends the sequence.
pub type Listing<'a, T> = Box<dyn Iterator<Item = Result<T, ZendeskError>> + 'a>;

/// Help Center knowledge-base operations.
///
/// Implemented by [`ZendeskClient`](crate::ZendeskClient) for real instances
/// and by `MockHelpCenter` for tests. Listing and lookup methods are scoped to
/// a locale; create payloads carry their own locale.
pub trait HelpCenter {
    /// List all categories in `locale`.
    fn list_categories(&self, locale: &str) -> Listing<'_, Category>;

    /// List all sections in `locale`.
    fn list_sections(&self, locale: &str) -> Listing<'_, Section>;

    /// List all articles in `locale`.
    fn list_articles(&self, locale: &str) -> Listing<'_, Article>;

    /// List permission groups.
    fn list_permission_groups(&self) -> Listing<'_, PermissionGroup>;

    /// List user segments.
    fn list_user_segments(&self) -> Listing<'_, UserSegment>;

    /// Fetch one article translation.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::NotFound`] if the article does not exist in
    /// `locale`.
    fn get_article(&self, locale: &str, id: u64) -> Result<Article, ZendeskError>;

    /// Create a category.
    fn create_category(&self, category: &NewCategory) -> Result<Category, ZendeskError>;

    /// Create a section under `category_id`.
    fn create_section(
        &self,
        category_id: u64,
        section: &NewSection,
    ) -> Result<Section, ZendeskError>;

    /// Create an article under `section_id`.
    fn create_article(
        &self,
        section_id: u64,
        article: &NewArticle,
    ) -> Result<Article, ZendeskError>;

    /// Overwrite the `locale` translation of an existing article, adding the
    /// translation if the article has none in that locale.
    fn update_article(
        &self,
        article_id: u64,
        locale: &str,
        translation: &ArticleTranslation,
    ) -> Result<(), ZendeskError>;
}
