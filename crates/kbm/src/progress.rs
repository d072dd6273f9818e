//! Live progress lines for a run.

use kbm_mirror::{Event, EventSink, Outcome};

use crate::output::Output;

/// Prints one line per event.
pub(crate) struct ConsoleSink<'a> {
    output: &'a Output,
}

impl<'a> ConsoleSink<'a> {
    pub(crate) fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl EventSink for ConsoleSink<'_> {
    fn emit(&self, event: &Event<'_>) {
        let out = self.output;
        match *event {
            Event::LocaleStarted { phase, locale } => {
                out.highlight(&format!("\n{phase} [{locale}]"));
            }
            Event::StructureSaved {
                categories,
                sections,
                ..
            } => out.info(&format!("  {categories} categories, {sections} sections")),
            Event::ArticleSaved {
                article_id, title, ..
            } => out.detail(&format!("  saved {article_id} \"{title}\"")),
            Event::Reconciled {
                entity,
                label,
                outcome,
                target_id,
            } => {
                let line = format!("{entity} \"{label}\" -> {target_id}");
                match outcome {
                    Outcome::Created => out.success(&format!("  + {line}")),
                    Outcome::Updated => out.info(&format!("  ~ {line}")),
                    Outcome::Matched => out.detail(&format!("  = {line}")),
                }
            }
            Event::Failed {
                entity,
                label,
                error,
            } => out.error(&format!("  ! {entity} \"{label}\": {error}")),
            Event::Skipped {
                entity,
                label,
                parent,
            } => out.warning(&format!("  - {entity} \"{label}\" skipped ({parent} failed)")),
            Event::Warning { message, .. } => out.warning(&format!("  warning: {message}")),
            Event::LocaleFailed { locale, error, .. } => {
                out.error(&format!("  locale {locale} failed: {error}"));
            }
        }
    }
}
