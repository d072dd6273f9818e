//! Source instance → on-disk snapshot.

use kbm_snapshot::SnapshotWriter;
use kbm_zendesk::{Category, HelpCenter, Section};

use crate::ErrorPolicy;
use crate::entity::EntityRef;
use crate::error::{EntityError, MirrorError};
use crate::events::{Event, EventSink, Phase};
use crate::summary::Failure;

/// Totals for a backup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    /// Locales written.
    pub locales: Vec<String>,
    /// Categories written, all locales.
    pub categories: usize,
    /// Sections written, all locales.
    pub sections: usize,
    /// Articles written, all locales.
    pub articles: usize,
    /// Draft articles left out.
    pub drafts_skipped: usize,
    /// Articles that could not be fetched or written.
    pub failures: Vec<Failure>,
    /// Articles that disappeared between listing and fetching.
    pub warnings: Vec<String>,
}

impl BackupReport {
    /// True if any article failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Copies a source instance into a snapshot.
pub struct Backup<'a> {
    source: &'a dyn HelpCenter,
    writer: &'a SnapshotWriter,
    events: &'a dyn EventSink,
    policy: ErrorPolicy,
    include_drafts: bool,
}

impl<'a> Backup<'a> {
    /// Create a backup from `source` into `writer`.
    #[must_use]
    pub fn new(
        source: &'a dyn HelpCenter,
        writer: &'a SnapshotWriter,
        events: &'a dyn EventSink,
        policy: ErrorPolicy,
    ) -> Self {
        Self {
            source,
            writer,
            events,
            policy,
            include_drafts: false,
        }
    }

    /// Also back up draft articles.
    #[must_use]
    pub fn include_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    /// Back up every locale in order.
    ///
    /// # Errors
    ///
    /// Listing and disk errors end the run, as do authentication failures.
    /// Article fetch failures end it only under [`ErrorPolicy::FailFast`].
    pub fn run(&self, locales: &[String]) -> Result<BackupReport, MirrorError> {
        let mut report = BackupReport::default();
        self.run_into(locales, &mut report)?;
        Ok(report)
    }

    /// Like [`run`](Self::run), accumulating into `report` so the totals
    /// gathered before an early exit stay available.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_into(
        &self,
        locales: &[String],
        report: &mut BackupReport,
    ) -> Result<(), MirrorError> {
        for locale in locales {
            self.backup_locale(locale, report)?;
            report.locales.push(locale.clone());
        }
        Ok(())
    }

    fn backup_locale(&self, locale: &str, report: &mut BackupReport) -> Result<(), MirrorError> {
        self.events.emit(&Event::LocaleStarted {
            phase: Phase::Backup,
            locale,
        });

        let categories: Vec<Category> = self
            .source
            .list_categories(locale)
            .collect::<Result<_, _>>()
            .map_err(|e| MirrorError::listing("categories", locale, e))?;
        let sections: Vec<Section> = self
            .source
            .list_sections(locale)
            .collect::<Result<_, _>>()
            .map_err(|e| MirrorError::listing("sections", locale, e))?;

        self.writer.write_structure(locale, &categories, &sections)?;
        report.categories += categories.len();
        report.sections += sections.len();
        self.events.emit(&Event::StructureSaved {
            locale,
            categories: categories.len(),
            sections: sections.len(),
        });

        for listed in self.source.list_articles(locale) {
            let listed = listed.map_err(|e| MirrorError::listing("articles", locale, e))?;
            if listed.draft && !self.include_drafts {
                report.drafts_skipped += 1;
                continue;
            }

            match self.source.get_article(locale, listed.id) {
                Ok(article) => {
                    self.writer.write_article(locale, &article)?;
                    report.articles += 1;
                    self.events.emit(&Event::ArticleSaved {
                        locale,
                        article_id: article.id,
                        title: &article.title,
                    });
                }
                Err(err) if err.is_auth() => return Err(MirrorError::Auth(err)),
                Err(err) if err.is_not_found() => {
                    let message = format!("article {} was deleted during backup", listed.id);
                    self.events.emit(&Event::Warning {
                        locale,
                        message: &message,
                    });
                    report.warnings.push(format!("{locale}: {message}"));
                }
                Err(err) => {
                    let entity = EntityRef::article(listed.id);
                    let source = EntityError::from(err);
                    let message = source.to_string();
                    self.events.emit(&Event::Failed {
                        entity,
                        label: &listed.title,
                        error: &message,
                    });
                    report.failures.push(Failure {
                        entity,
                        label: listed.title.clone(),
                        locale: locale.to_owned(),
                        message,
                    });
                    if self.policy == ErrorPolicy::FailFast {
                        return Err(MirrorError::Aborted { entity, source });
                    }
                }
            }
        }
        Ok(())
    }
}
