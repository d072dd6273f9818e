//! Fixtures shared by unit tests.

use std::cell::RefCell;

use kbm_zendesk::{Article, Category, Section};

use crate::events::{Event, EventSink};
use crate::summary::Outcome;

/// Sink that keeps a compact log of events.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    lines: RefCell<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.lines
            .borrow()
            .iter()
            .filter(|l| l.starts_with(prefix))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &Event<'_>) {
        let line = match *event {
            Event::LocaleStarted { phase, locale } => format!("start {phase} {locale}"),
            Event::StructureSaved { locale, .. } => format!("structure {locale}"),
            Event::ArticleSaved { article_id, .. } => format!("saved {article_id}"),
            Event::Reconciled {
                entity, outcome, ..
            } => {
                let verb = match outcome {
                    Outcome::Created => "created",
                    Outcome::Matched => "matched",
                    Outcome::Updated => "updated",
                };
                format!("{verb} {entity}")
            }
            Event::Failed { entity, .. } => format!("failed {entity}"),
            Event::Skipped { entity, .. } => format!("skipped {entity}"),
            Event::Warning { message, .. } => format!("warning {message}"),
            Event::LocaleFailed { locale, .. } => format!("locale-failed {locale}"),
        };
        self.lines.borrow_mut().push(line);
    }
}

pub(crate) fn category(id: u64, name: &str, locale: &str) -> Category {
    Category {
        id,
        name: name.to_owned(),
        description: None,
        locale: locale.to_owned(),
        position: 0,
    }
}

pub(crate) fn section(id: u64, category_id: u64, name: &str, locale: &str) -> Section {
    Section {
        id,
        category_id: Some(category_id),
        name: name.to_owned(),
        description: None,
        locale: locale.to_owned(),
        position: 0,
    }
}

pub(crate) fn article(id: u64, section_id: u64, title: &str, locale: &str) -> Article {
    Article {
        id,
        section_id: Some(section_id),
        title: title.to_owned(),
        body: Some(format!("<p>{title}</p>")),
        locale: locale.to_owned(),
        draft: false,
        position: 0,
        permission_group_id: None,
        user_segment_id: None,
    }
}

