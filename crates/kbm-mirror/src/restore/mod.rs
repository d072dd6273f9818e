//! Reconciling a snapshot onto a target instance.
//!
//! Entities are processed strictly top-down: all categories of a locale,
//! then its sections, then its articles. Each entity is matched against the
//! target by name (title for articles) within its resolved parent; a match is
//! reused, otherwise the entity is created. Matched articles get their
//! content overwritten so the target converges on the snapshot.
//!
//! Every resolved entity is recorded in a [`TranslationMap`], which children
//! use to find their parent's target ID. An entity whose parent failed or was
//! skipped is itself skipped.

mod access;
mod lookup;
mod translation;

use std::collections::HashSet;

use kbm_snapshot::{LocaleSnapshot, SnapshotError};
use kbm_zendesk::{
    Article, ArticleTranslation, Category, HelpCenter, NewArticle, NewCategory, NewSection, Section,
};

pub use access::AccessOverrides;
pub use lookup::Lookup;
use lookup::{Resolved, TargetIndex, find_or_create};
pub use translation::TranslationMap;

use crate::ErrorPolicy;
use crate::entity::EntityRef;
use crate::error::{EntityError, MirrorError};
use crate::events::{Event, EventSink, Phase};
use crate::summary::{Failure, Outcome, RestoreSummary, SnapshotFailure};

/// Final state of a restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Outcome counts and failures.
    pub summary: RestoreSummary,
    /// Source → target IDs of everything resolved.
    pub translations: TranslationMap,
}

/// Target ID plus how it was obtained.
#[derive(Debug, Clone, Copy)]
struct Resolution {
    target_id: u64,
    outcome: Outcome,
}

impl From<Resolved> for Resolution {
    fn from(resolved: Resolved) -> Self {
        match resolved {
            Resolved::Existing(target_id) => Self {
                target_id,
                outcome: Outcome::Matched,
            },
            Resolved::Created(target_id) => Self {
                target_id,
                outcome: Outcome::Created,
            },
        }
    }
}

/// Restores locale snapshots onto a target, one locale at a time.
///
/// The translation map and summary accumulate across locales, so the same
/// reconciler should be used for every locale of a run.
///
/// # Example
///
/// ```ignore
/// let mut reconciler = Reconciler::new(&target, &TracingSink, ErrorPolicy::Continue,
///     AccessOverrides::default());
/// reconciler.restore_locale(&reader.load("en-us")?)?;
/// let report = reconciler.finish();
/// println!("{} created", report.summary.total_created());
/// ```
pub struct Reconciler<'a> {
    target: &'a dyn HelpCenter,
    events: &'a dyn EventSink,
    policy: ErrorPolicy,
    overrides: AccessOverrides,
    access: Option<AccessOverrides>,
    translations: TranslationMap,
    /// Failed or skipped entities; their descendants are skipped.
    blocked: HashSet<EntityRef>,
    summary: RestoreSummary,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler writing to `target`.
    #[must_use]
    pub fn new(
        target: &'a dyn HelpCenter,
        events: &'a dyn EventSink,
        policy: ErrorPolicy,
        overrides: AccessOverrides,
    ) -> Self {
        Self {
            target,
            events,
            policy,
            overrides,
            access: None,
            translations: TranslationMap::new(),
            blocked: HashSet::new(),
            summary: RestoreSummary::default(),
        }
    }

    /// Mappings recorded so far.
    #[must_use]
    pub fn translations(&self) -> &TranslationMap {
        &self.translations
    }

    /// Counts recorded so far.
    #[must_use]
    pub fn summary(&self) -> &RestoreSummary {
        &self.summary
    }

    /// Reconcile one locale's snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Auth`] if the target rejects the credentials,
    /// [`MirrorError::Listing`] if existing target content cannot be listed,
    /// and [`MirrorError::Aborted`] on the first entity failure under
    /// [`ErrorPolicy::FailFast`].
    pub fn restore_locale(&mut self, snapshot: &LocaleSnapshot) -> Result<(), MirrorError> {
        let locale = snapshot.locale.as_str();
        self.events.emit(&Event::LocaleStarted {
            phase: Phase::Restore,
            locale,
        });

        for warning in &snapshot.warnings {
            let message = warning.to_string();
            self.events.emit(&Event::Warning {
                locale,
                message: &message,
            });
            self.summary.warnings.push(format!("{locale}: {message}"));
        }

        self.restore_categories(locale, &snapshot.categories)?;
        self.restore_sections(locale, &snapshot.sections)?;
        self.restore_articles(locale, &snapshot.articles)
    }

    /// Record a locale whose snapshot could not be loaded.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::FailFast`] the snapshot error is returned after
    /// it has been recorded.
    pub fn snapshot_failed(&mut self, locale: &str, err: SnapshotError) -> Result<(), MirrorError> {
        let message = err.to_string();
        self.events.emit(&Event::LocaleFailed {
            phase: Phase::Restore,
            locale,
            error: &message,
        });
        self.summary.snapshot_errors.push(SnapshotFailure {
            locale: locale.to_owned(),
            message,
        });
        match self.policy {
            ErrorPolicy::FailFast => Err(err.into()),
            ErrorPolicy::Continue => Ok(()),
        }
    }

    /// Consume the reconciler and return its results.
    #[must_use]
    pub fn finish(self) -> RestoreReport {
        RestoreReport {
            summary: self.summary,
            translations: self.translations,
        }
    }

    fn restore_categories(
        &mut self,
        locale: &str,
        categories: &[Category],
    ) -> Result<(), MirrorError> {
        if categories.is_empty() {
            return Ok(());
        }
        let mut index = TargetIndex::build(self.target.list_categories(locale), |c| {
            (None, c.name.as_str(), c.id)
        })
        .map_err(|e| MirrorError::listing("categories", locale, e))?;

        for category in categories {
            let entity = EntityRef::category(category.id);
            let result = self.reconcile_category(category, locale, &mut index);
            self.settle(entity, &category.name, locale, result)?;
        }
        Ok(())
    }

    fn restore_sections(&mut self, locale: &str, sections: &[Section]) -> Result<(), MirrorError> {
        if sections.is_empty() {
            return Ok(());
        }
        let mut index = TargetIndex::build(self.target.list_sections(locale), |s| {
            (s.category_id, s.name.as_str(), s.id)
        })
        .map_err(|e| MirrorError::listing("sections", locale, e))?;

        for section in sections {
            let entity = EntityRef::section(section.id);
            let parent = section.category_id.map(EntityRef::category);
            if let Some(parent) = parent.filter(|p| self.blocked.contains(p)) {
                self.skip(entity, &section.name, parent);
                continue;
            }
            let result = self.parent_target(parent).and_then(|category_target| {
                self.reconcile_section(section, category_target, locale, &mut index)
            });
            self.settle(entity, &section.name, locale, result)?;
        }
        Ok(())
    }

    fn restore_articles(&mut self, locale: &str, articles: &[Article]) -> Result<(), MirrorError> {
        if articles.is_empty() {
            return Ok(());
        }
        let access = self.access()?;
        let mut index = TargetIndex::build(self.target.list_articles(locale), |a| {
            (a.section_id, a.title.as_str(), a.id)
        })
        .map_err(|e| MirrorError::listing("articles", locale, e))?;

        for article in articles {
            let entity = EntityRef::article(article.id);
            let parent = article.section_id.map(EntityRef::section);
            if let Some(parent) = parent.filter(|p| self.blocked.contains(p)) {
                self.skip(entity, &article.title, parent);
                continue;
            }
            let result = self.parent_target(parent).and_then(|section_target| {
                self.reconcile_article(article, section_target, locale, access, &mut index)
            });
            self.settle(entity, &article.title, locale, result)?;
        }
        Ok(())
    }

    fn reconcile_category(
        &self,
        category: &Category,
        locale: &str,
        index: &mut TargetIndex,
    ) -> Result<Resolution, EntityError> {
        if let Some(target_id) = self.translations.get(EntityRef::category(category.id)) {
            return Ok(Resolution {
                target_id,
                outcome: Outcome::Matched,
            });
        }

        let resolved = find_or_create(index.lookup(None, &category.name), || {
            let payload = NewCategory {
                locale: locale.to_owned(),
                ..NewCategory::from(category)
            };
            self.target.create_category(&payload).map(|c| c.id)
        })?;
        if let Resolved::Created(id) = resolved {
            index.insert(None, &category.name, id);
        }
        Ok(resolved.into())
    }

    fn reconcile_section(
        &self,
        section: &Section,
        category_target: u64,
        locale: &str,
        index: &mut TargetIndex,
    ) -> Result<Resolution, EntityError> {
        if let Some(target_id) = self.translations.get(EntityRef::section(section.id)) {
            return Ok(Resolution {
                target_id,
                outcome: Outcome::Matched,
            });
        }

        let parent = Some(category_target);
        let resolved = find_or_create(index.lookup(parent, &section.name), || {
            let payload = NewSection {
                locale: locale.to_owned(),
                ..NewSection::from(section)
            };
            self.target
                .create_section(category_target, &payload)
                .map(|s| s.id)
        })?;
        if let Resolved::Created(id) = resolved {
            index.insert(parent, &section.name, id);
        }
        Ok(resolved.into())
    }

    fn reconcile_article(
        &self,
        article: &Article,
        section_target: u64,
        locale: &str,
        access: AccessOverrides,
        index: &mut TargetIndex,
    ) -> Result<Resolution, EntityError> {
        let locale = if article.locale.is_empty() {
            locale
        } else {
            article.locale.as_str()
        };
        let parent = Some(section_target);
        let existing = match self.translations.get(EntityRef::article(article.id)) {
            Some(target_id) => Lookup::Found(target_id),
            None => index.lookup(parent, &article.title),
        };

        let resolved = find_or_create(existing, || {
            let payload = NewArticle {
                title: article.title.clone(),
                body: article.body_html().to_owned(),
                locale: locale.to_owned(),
                draft: article.draft,
                position: article.position,
                permission_group_id: access.permission_group_id,
                user_segment_id: access.user_segment_id,
            };
            self.target
                .create_article(section_target, &payload)
                .map(|a| a.id)
        })?;

        match resolved {
            Resolved::Created(id) => {
                index.insert(parent, &article.title, id);
                Ok(resolved.into())
            }
            Resolved::Existing(target_id) => {
                let translation = ArticleTranslation {
                    title: article.title.clone(),
                    body: article.body_html().to_owned(),
                    draft: article.draft,
                };
                self.target
                    .update_article(target_id, locale, &translation)?;
                Ok(Resolution {
                    target_id,
                    outcome: Outcome::Updated,
                })
            }
        }
    }

    /// Target ID of a parent that is known not to be blocked.
    fn parent_target(&self, parent: Option<EntityRef>) -> Result<u64, EntityError> {
        let parent = parent.ok_or(EntityError::Orphan)?;
        self.translations
            .get(parent)
            .ok_or(EntityError::UnresolvedParent { parent })
    }

    /// Visibility for created articles, resolved once per run.
    fn access(&mut self) -> Result<AccessOverrides, MirrorError> {
        if let Some(access) = self.access {
            return Ok(access);
        }
        let access = access::resolve(self.target, self.overrides).map_err(MirrorError::Auth)?;
        self.access = Some(access);
        Ok(access)
    }

    /// Record the outcome of one entity, applying the error policy.
    fn settle(
        &mut self,
        entity: EntityRef,
        label: &str,
        locale: &str,
        result: Result<Resolution, EntityError>,
    ) -> Result<(), MirrorError> {
        match result {
            Ok(resolution) => {
                let target_id = self.translations.insert(entity, resolution.target_id);
                self.summary.record(entity.kind, resolution.outcome);
                self.events.emit(&Event::Reconciled {
                    entity,
                    label,
                    outcome: resolution.outcome,
                    target_id,
                });
                Ok(())
            }
            Err(EntityError::Api(err)) if err.is_auth() => Err(MirrorError::Auth(err)),
            Err(err) => {
                let message = err.to_string();
                self.events.emit(&Event::Failed {
                    entity,
                    label,
                    error: &message,
                });
                self.blocked.insert(entity);
                self.summary.record_failure(Failure {
                    entity,
                    label: label.to_owned(),
                    locale: locale.to_owned(),
                    message,
                });
                match self.policy {
                    ErrorPolicy::FailFast => Err(MirrorError::Aborted {
                        entity,
                        source: err,
                    }),
                    ErrorPolicy::Continue => Ok(()),
                }
            }
        }
    }

    fn skip(&mut self, entity: EntityRef, label: &str, parent: EntityRef) {
        self.events.emit(&Event::Skipped {
            entity,
            label,
            parent,
        });
        self.blocked.insert(entity);
        self.summary.record_skip(entity);
    }
}

#[cfg(test)]
mod tests {
    use kbm_zendesk::MockHelpCenter;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entity::EntityKind;
    use crate::summary::Counts;
    use crate::testing::{RecordingSink, article, category, section};

    fn snapshot(
        locale: &str,
        categories: Vec<Category>,
        sections: Vec<Section>,
        articles: Vec<Article>,
    ) -> LocaleSnapshot {
        LocaleSnapshot {
            locale: locale.to_owned(),
            categories,
            sections,
            articles,
            warnings: Vec::new(),
        }
    }

    fn faq_snapshot() -> LocaleSnapshot {
        snapshot(
            "en-us",
            vec![category(1, "FAQ", "en-us")],
            vec![section(10, 1, "Billing", "en-us")],
            vec![article(100, 10, "How to pay", "en-us")],
        )
    }

    fn restore(
        target: &MockHelpCenter,
        policy: ErrorPolicy,
        snapshots: &[LocaleSnapshot],
    ) -> Result<RestoreReport, MirrorError> {
        let sink = RecordingSink::default();
        let mut reconciler = Reconciler::new(target, &sink, policy, AccessOverrides::default());
        for snapshot in snapshots {
            reconciler.restore_locale(snapshot)?;
        }
        Ok(reconciler.finish())
    }

    fn created(n: usize) -> Counts {
        Counts {
            created: n,
            ..Counts::default()
        }
    }

    #[test]
    fn test_restore_into_empty_target_creates_hierarchy() {
        let target = MockHelpCenter::new();
        let report = restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap();

        assert_eq!(report.summary.categories, created(1));
        assert_eq!(report.summary.sections, created(1));
        assert_eq!(report.summary.articles, created(1));
        assert_eq!(report.translations.len(), 3);

        let categories = target.categories();
        let sections = target.sections();
        let articles = target.articles();
        assert_eq!(categories[0].name, "FAQ");
        assert_eq!(sections[0].category_id, Some(categories[0].id));
        assert_eq!(articles[0].section_id, Some(sections[0].id));
        assert_eq!(articles[0].body_html(), "<p>How to pay</p>");
        assert_eq!(
            report.translations.get(EntityRef::article(100)),
            Some(articles[0].id)
        );
    }

    #[test]
    fn test_second_run_creates_nothing() {
        let target = MockHelpCenter::new();
        restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap();
        let creates = target.create_calls();

        let report = restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap();

        assert_eq!(target.create_calls(), creates);
        assert_eq!(report.summary.total_created(), 0);
        assert_eq!(report.summary.categories.matched, 1);
        assert_eq!(report.summary.sections.matched, 1);
        assert_eq!(report.summary.articles.updated, 1);
        assert_eq!(target.articles().len(), 1);
    }

    #[test]
    fn test_existing_content_is_matched_case_insensitively_and_overwritten() {
        let target = MockHelpCenter::new()
            .with_category(category(500, "faq", "en-us"))
            .with_section(section(501, 500, "BILLING", "en-us"))
            .with_article(Article {
                body: Some("<p>stale</p>".to_owned()),
                ..article(502, 501, "How to pay", "en-us")
            });

        let report = restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap();

        assert_eq!(target.create_calls(), 0);
        assert_eq!(report.translations.get(EntityRef::category(1)), Some(500));
        assert_eq!(report.translations.get(EntityRef::section(10)), Some(501));
        assert_eq!(
            target.get_article("en-us", 502).unwrap().body_html(),
            "<p>How to pay</p>"
        );
    }

    #[test]
    fn test_same_name_under_different_parent_is_created() {
        let target = MockHelpCenter::new()
            .with_category(category(500, "Other", "en-us"))
            .with_section(section(501, 500, "Billing", "en-us"));

        let report = restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap();

        assert_eq!(report.summary.sections, created(1));
        assert_ne!(report.translations.get(EntityRef::section(10)), Some(501));
    }

    #[test]
    fn test_failed_section_skips_its_articles_only() {
        let target = MockHelpCenter::new().failing_on("Broken");
        let snapshot = snapshot(
            "en-us",
            vec![category(1, "FAQ", "en-us")],
            vec![
                section(10, 1, "Broken", "en-us"),
                section(11, 1, "Healthy", "en-us"),
            ],
            vec![
                article(100, 10, "Lost A", "en-us"),
                article(101, 10, "Lost B", "en-us"),
                article(102, 11, "Kept", "en-us"),
            ],
        );

        let report = restore(&target, ErrorPolicy::Continue, &[snapshot]).unwrap();

        assert_eq!(report.summary.sections.failed, 1);
        assert_eq!(report.summary.sections.created, 1);
        assert_eq!(report.summary.articles.skipped, 2);
        assert_eq!(report.summary.articles.created, 1);
        assert_eq!(
            report.summary.skipped,
            vec![EntityRef::article(100), EntityRef::article(101)]
        );
        assert_eq!(report.summary.failures[0].entity, EntityRef::section(10));
        assert!(report.summary.has_failures());
    }

    #[test]
    fn test_failed_category_skips_whole_subtree() {
        let target = MockHelpCenter::new().failing_on("FAQ");
        let report = restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap();

        assert_eq!(report.summary.categories.failed, 1);
        assert_eq!(report.summary.sections.skipped, 1);
        assert_eq!(report.summary.articles.skipped, 1);
        assert_eq!(target.create_calls(), 0);
        assert!(report.translations.is_empty());
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let target = MockHelpCenter::new().failing_on("Broken");
        let snapshot = snapshot(
            "en-us",
            vec![category(1, "FAQ", "en-us")],
            vec![
                section(10, 1, "Broken", "en-us"),
                section(11, 1, "Healthy", "en-us"),
            ],
            vec![article(102, 11, "Kept", "en-us")],
        );

        let err = restore(&target, ErrorPolicy::FailFast, &[snapshot]).unwrap_err();

        assert!(matches!(
            err,
            MirrorError::Aborted { entity, .. } if entity == EntityRef::section(10)
        ));
        assert!(target.sections().is_empty());
        assert!(target.articles().is_empty());
    }

    #[test]
    fn test_unresolved_parent_is_a_failure() {
        let target = MockHelpCenter::new();
        let snapshot = snapshot(
            "en-us",
            vec![],
            vec![section(10, 99, "Stray", "en-us")],
            vec![],
        );

        let report = restore(&target, ErrorPolicy::Continue, &[snapshot.clone()]).unwrap();
        assert_eq!(report.summary.sections.failed, 1);
        assert!(report.summary.failures[0].message.contains("category 99"));

        let err = restore(&target, ErrorPolicy::FailFast, &[snapshot]).unwrap_err();
        assert!(matches!(
            err,
            MirrorError::Aborted {
                source: EntityError::UnresolvedParent { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_orphan_article_fails() {
        let target = MockHelpCenter::new();
        let snapshot = snapshot(
            "en-us",
            vec![],
            vec![],
            vec![Article {
                section_id: None,
                ..article(100, 0, "Floating", "en-us")
            }],
        );
        let report = restore(&target, ErrorPolicy::Continue, &[snapshot]).unwrap();
        assert_eq!(report.summary.articles.failed, 1);
    }

    #[test]
    fn test_auth_failure_aborts_even_when_continuing() {
        let target = MockHelpCenter::new().rejecting_auth();
        let err = restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap_err();
        assert!(matches!(err, MirrorError::Auth(_)));
    }

    #[test]
    fn test_missing_locale_on_target_creates_everything() {
        let target = MockHelpCenter::new().without_locale("de");
        let report = restore(
            &target,
            ErrorPolicy::Continue,
            &[snapshot("de", vec![category(1, "Hilfe", "de")], vec![], vec![])],
        )
        .unwrap();
        assert_eq!(report.summary.categories, created(1));
    }

    #[test]
    fn test_translation_map_is_shared_across_locales() {
        let target = MockHelpCenter::new();
        let german = snapshot(
            "de",
            vec![category(1, "Hilfe", "de")],
            vec![section(10, 1, "Rechnungen", "de")],
            vec![article(100, 10, "Wie bezahle ich", "de")],
        );

        let report = restore(&target, ErrorPolicy::Continue, &[faq_snapshot(), german]).unwrap();

        assert_eq!(report.translations.len(), 3);
        assert_eq!(report.summary.categories.created, 1);
        assert_eq!(report.summary.categories.matched, 1);
        assert_eq!(report.summary.articles.updated, 1);
        let target_article = report
            .translations
            .get(EntityRef::article(100))
            .unwrap();
        assert_eq!(
            target.get_article("de", target_article).unwrap().title,
            "Wie bezahle ich"
        );
        assert_eq!(target.get_article("en-us", target_article).unwrap().title, "How to pay");
    }

    #[test]
    fn test_created_articles_get_resolved_access() {
        let target = MockHelpCenter::new()
            .with_permission_group(7, "Managers")
            .with_user_segment(8, "Everyone");

        restore(&target, ErrorPolicy::Continue, &[faq_snapshot()]).unwrap();

        let created = &target.articles()[0];
        assert_eq!(created.permission_group_id, Some(7));
        assert_eq!(created.user_segment_id, Some(8));
    }

    #[test]
    fn test_snapshot_failure_follows_policy() {
        let target = MockHelpCenter::new();
        let sink = RecordingSink::default();
        let corrupt = || SnapshotError::Corrupt {
            path: "backup/fr".into(),
            reason: "no folder for locale 'fr'".to_owned(),
        };

        let mut continuing =
            Reconciler::new(&target, &sink, ErrorPolicy::Continue, AccessOverrides::default());
        continuing.snapshot_failed("fr", corrupt()).unwrap();
        assert_eq!(continuing.summary().snapshot_errors.len(), 1);
        assert_eq!(sink.lines(), vec!["locale-failed fr".to_owned()]);

        let mut strict =
            Reconciler::new(&target, &sink, ErrorPolicy::FailFast, AccessOverrides::default());
        assert!(matches!(
            strict.snapshot_failed("fr", corrupt()),
            Err(MirrorError::Snapshot(_))
        ));
        assert_eq!(strict.summary().snapshot_errors[0].locale, "fr");
    }

    #[test]
    fn test_events_follow_processing_order() {
        let target = MockHelpCenter::new();
        let sink = RecordingSink::default();
        let mut reconciler =
            Reconciler::new(&target, &sink, ErrorPolicy::Continue, AccessOverrides::default());
        reconciler.restore_locale(&faq_snapshot()).unwrap();

        assert_eq!(
            sink.lines(),
            vec![
                "start restore en-us".to_owned(),
                "created category 1".to_owned(),
                "created section 10".to_owned(),
                "created article 100".to_owned(),
            ]
        );
        assert_eq!(sink.count("created"), 3);
        assert_eq!(reconciler.translations().count(EntityKind::Section), 1);
    }
}
