//! Help Center record and payload types.

mod access;
mod article;
mod category;
mod section;

pub use access::{PermissionGroup, UserSegment};
pub use article::{Article, ArticleTranslation, NewArticle};
pub use category::{Category, NewCategory};
pub use section::{NewSection, Section};
