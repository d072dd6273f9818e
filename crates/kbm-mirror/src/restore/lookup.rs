//! Matching snapshot entities to existing target entities.

use std::collections::HashMap;

use kbm_zendesk::{Listing, ZendeskError};

/// Result of searching the target for a counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// A counterpart exists.
    Found(T),
    /// No counterpart exists.
    Missing,
}

/// Whether a find-or-create reused or created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolved {
    Existing(u64),
    Created(u64),
}

/// Reuse the counterpart if `lookup` found one, otherwise call `create`.
pub(crate) fn find_or_create<E>(
    lookup: Lookup<u64>,
    create: impl FnOnce() -> Result<u64, E>,
) -> Result<Resolved, E> {
    match lookup {
        Lookup::Found(id) => Ok(Resolved::Existing(id)),
        Lookup::Missing => create().map(Resolved::Created),
    }
}

/// Existing target entities of one kind in one locale, keyed by parent
/// target ID and case-folded name.
///
/// When the target already holds duplicates, the first listed wins.
#[derive(Debug, Default)]
pub(crate) struct TargetIndex {
    ids: HashMap<(Option<u64>, String), u64>,
}

impl TargetIndex {
    /// Build from a listing. A listing whose first page answers 404 (locale
    /// not enabled on the target) yields an empty index; a 404 after records
    /// were listed is an error.
    pub(crate) fn build<T>(
        listing: Listing<'_, T>,
        key: impl Fn(&T) -> (Option<u64>, &str, u64),
    ) -> Result<Self, ZendeskError> {
        let mut index = Self::default();
        let mut listed = 0_usize;
        for record in listing {
            match record {
                Ok(record) => {
                    let (parent, name, id) = key(&record);
                    index.insert(parent, name, id);
                    listed += 1;
                }
                Err(err) if err.is_not_found() && listed == 0 => return Ok(Self::default()),
                Err(err) => return Err(err),
            }
        }
        Ok(index)
    }

    pub(crate) fn lookup(&self, parent: Option<u64>, name: &str) -> Lookup<u64> {
        match self.ids.get(&(parent, fold(name))) {
            Some(&id) => Lookup::Found(id),
            None => Lookup::Missing,
        }
    }

    pub(crate) fn insert(&mut self, parent: Option<u64>, name: &str, id: u64) {
        self.ids.entry((parent, fold(name))).or_insert(id);
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
