//! Mock Help Center implementation for testing.
//!
//! Provides [`MockHelpCenter`] for unit testing without network access.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::error::ZendeskError;
use crate::help_center::{HelpCenter, Listing};
use crate::types::{
    Article, ArticleTranslation, Category, NewArticle, NewCategory, NewSection, PermissionGroup,
    Section, UserSegment,
};

/// First ID handed out for created records, far from typical fixture IDs.
const FIRST_CREATED_ID: u64 = 90_000;

/// Mock Help Center for testing.
///
/// Stores records in memory and assigns fresh IDs on create. Use the builder
/// methods to seed existing content and inject failures.
///
/// # Example
///
/// ```ignore
/// use kbm_zendesk::{HelpCenter, MockHelpCenter, NewCategory};
///
/// let target = MockHelpCenter::new().with_category(existing_faq);
/// let created = target.create_category(&new_category).unwrap();
/// assert_eq!(target.categories().len(), 2);
/// ```
#[derive(Debug)]
pub struct MockHelpCenter {
    state: RefCell<MockState>,
}

#[derive(Debug)]
struct MockState {
    categories: Vec<Category>,
    sections: Vec<Section>,
    articles: Vec<Article>,
    permission_groups: Vec<PermissionGroup>,
    user_segments: Vec<UserSegment>,
    next_id: u64,
    create_calls: usize,
    update_calls: usize,
    failing_names: HashSet<String>,
    missing_locales: HashSet<String>,
    reject_auth: bool,
}

impl Default for MockHelpCenter {
    fn default() -> Self {
        Self {
            state: RefCell::new(MockState {
                categories: Vec::new(),
                sections: Vec::new(),
                articles: Vec::new(),
                permission_groups: Vec::new(),
                user_segments: Vec::new(),
                next_id: FIRST_CREATED_ID,
                create_calls: 0,
                update_calls: 0,
                failing_names: HashSet::new(),
                missing_locales: HashSet::new(),
                reject_auth: false,
            }),
        }
    }
}

impl MockHelpCenter {
    /// Create a new empty mock instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing category.
    #[must_use]
    pub fn with_category(self, category: Category) -> Self {
        self.state.borrow_mut().categories.push(category);
        self
    }

    /// Seed an existing section.
    #[must_use]
    pub fn with_section(self, section: Section) -> Self {
        self.state.borrow_mut().sections.push(section);
        self
    }

    /// Seed an existing article.
    #[must_use]
    pub fn with_article(self, article: Article) -> Self {
        self.state.borrow_mut().articles.push(article);
        self
    }

    /// Seed a permission group.
    #[must_use]
    pub fn with_permission_group(self, id: u64, name: &str) -> Self {
        self.state.borrow_mut().permission_groups.push(PermissionGroup {
            id,
            name: name.to_owned(),
        });
        self
    }

    /// Seed a user segment.
    #[must_use]
    pub fn with_user_segment(self, id: u64, name: &str) -> Self {
        self.state.borrow_mut().user_segments.push(UserSegment {
            id,
            name: name.to_owned(),
        });
        self
    }

    /// Reject creates and updates of records with this name or title (HTTP 422).
    #[must_use]
    pub fn failing_on(self, name: &str) -> Self {
        self.state.borrow_mut().failing_names.insert(name.to_owned());
        self
    }

    /// Answer list requests for `locale` with 404, as for a disabled locale.
    #[must_use]
    pub fn without_locale(self, locale: &str) -> Self {
        self.state.borrow_mut().missing_locales.insert(locale.to_owned());
        self
    }

    /// Reject every request with 401.
    #[must_use]
    pub fn rejecting_auth(self) -> Self {
        self.state.borrow_mut().reject_auth = true;
        self
    }

    /// Current categories.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.state.borrow().categories.clone()
    }

    /// Current sections.
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        self.state.borrow().sections.clone()
    }

    /// Current articles.
    #[must_use]
    pub fn articles(&self) -> Vec<Article> {
        self.state.borrow().articles.clone()
    }

    /// Number of successful create calls.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.state.borrow().create_calls
    }

    /// Number of successful update calls.
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.state.borrow().update_calls
    }

    fn list<T: Clone + 'static>(
        &self,
        locale: Option<&str>,
        select: impl FnOnce(&MockState) -> Vec<T>,
    ) -> Listing<'_, T> {
        let state = self.state.borrow();
        if state.reject_auth {
            return Box::new(std::iter::once(Err(auth_error())));
        }
        if let Some(locale) = locale
            && state.missing_locales.contains(locale)
        {
            return Box::new(std::iter::once(Err(ZendeskError::NotFound {
                url: format!("mock://{locale}"),
            })));
        }
        Box::new(select(&state).into_iter().map(Ok))
    }

    /// Shared guard for write operations.
    fn check_write(&self, name: &str) -> Result<(), ZendeskError> {
        let state = self.state.borrow();
        if state.reject_auth {
            return Err(auth_error());
        }
        if state.failing_names.contains(name) {
            return Err(ZendeskError::HttpResponse {
                status: 422,
                body: format!("mock rejected '{name}'"),
            });
        }
        Ok(())
    }

    fn allocate_id(state: &mut MockState) -> u64 {
        let id = state.next_id;
        state.next_id += 1;
        state.create_calls += 1;
        id
    }
}

fn auth_error() -> ZendeskError {
    ZendeskError::Auth {
        status: 401,
        body: "mock credentials rejected".to_owned(),
    }
}

impl HelpCenter for MockHelpCenter {
    fn list_categories(&self, locale: &str) -> Listing<'_, Category> {
        self.list(Some(locale), |s| {
            s.categories
                .iter()
                .filter(|c| c.locale == locale)
                .cloned()
                .collect()
        })
    }

    fn list_sections(&self, locale: &str) -> Listing<'_, Section> {
        self.list(Some(locale), |s| {
            s.sections
                .iter()
                .filter(|c| c.locale == locale)
                .cloned()
                .collect()
        })
    }

    fn list_articles(&self, locale: &str) -> Listing<'_, Article> {
        self.list(Some(locale), |s| {
            s.articles
                .iter()
                .filter(|a| a.locale == locale)
                .cloned()
                .collect()
        })
    }

    fn list_permission_groups(&self) -> Listing<'_, PermissionGroup> {
        self.list(None, |s| s.permission_groups.clone())
    }

    fn list_user_segments(&self) -> Listing<'_, UserSegment> {
        self.list(None, |s| s.user_segments.clone())
    }

    fn get_article(&self, locale: &str, id: u64) -> Result<Article, ZendeskError> {
        let state = self.state.borrow();
        if state.reject_auth {
            return Err(auth_error());
        }
        state
            .articles
            .iter()
            .find(|a| a.id == id && a.locale == locale)
            .cloned()
            .ok_or_else(|| ZendeskError::NotFound {
                url: format!("mock://{locale}/articles/{id}"),
            })
    }

    fn create_category(&self, category: &NewCategory) -> Result<Category, ZendeskError> {
        self.check_write(&category.name)?;
        let mut state = self.state.borrow_mut();
        let created = Category {
            id: Self::allocate_id(&mut state),
            name: category.name.clone(),
            description: category.description.clone(),
            locale: category.locale.clone(),
            position: category.position,
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn create_section(
        &self,
        category_id: u64,
        section: &NewSection,
    ) -> Result<Section, ZendeskError> {
        self.check_write(&section.name)?;
        let mut state = self.state.borrow_mut();
        if !state.categories.iter().any(|c| c.id == category_id) {
            return Err(ZendeskError::NotFound {
                url: format!("mock://categories/{category_id}"),
            });
        }
        let created = Section {
            id: Self::allocate_id(&mut state),
            category_id: Some(category_id),
            name: section.name.clone(),
            description: section.description.clone(),
            locale: section.locale.clone(),
            position: section.position,
        };
        state.sections.push(created.clone());
        Ok(created)
    }

    fn create_article(
        &self,
        section_id: u64,
        article: &NewArticle,
    ) -> Result<Article, ZendeskError> {
        self.check_write(&article.title)?;
        let mut state = self.state.borrow_mut();
        if !state.sections.iter().any(|s| s.id == section_id) {
            return Err(ZendeskError::NotFound {
                url: format!("mock://sections/{section_id}"),
            });
        }
        let created = Article {
            id: Self::allocate_id(&mut state),
            section_id: Some(section_id),
            title: article.title.clone(),
            body: Some(article.body.clone()),
            locale: article.locale.clone(),
            draft: article.draft,
            position: article.position,
            permission_group_id: article.permission_group_id,
            user_segment_id: article.user_segment_id,
        };
        state.articles.push(created.clone());
        Ok(created)
    }

    fn update_article(
        &self,
        article_id: u64,
        locale: &str,
        translation: &ArticleTranslation,
    ) -> Result<(), ZendeskError> {
        self.check_write(&translation.title)?;
        let mut state = self.state.borrow_mut();
        let Some(existing) = state.articles.iter().position(|a| a.id == article_id) else {
            return Err(ZendeskError::NotFound {
                url: format!("mock://articles/{article_id}"),
            });
        };
        let slot = match state
            .articles
            .iter()
            .position(|a| a.id == article_id && a.locale == locale)
        {
            Some(slot) => slot,
            None => {
                let mut added = state.articles[existing].clone();
                locale.clone_into(&mut added.locale);
                state.articles.push(added);
                state.articles.len() - 1
            }
        };
        let article = &mut state.articles[slot];
        article.title.clone_from(&translation.title);
        article.body = Some(translation.body.clone());
        article.draft = translation.draft;
        state.update_calls += 1;
        Ok(())
    }
}
