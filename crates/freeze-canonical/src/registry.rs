//! Identity bookkeeping for a single traversal.

use std::collections::{HashMap, HashSet};

use crate::value::Identity;

/// Per-traversal identity bookkeeping. Created fresh for every top-level
/// call and dropped when it returns.
///
/// Identities are mapped to small sequential tokens on first sight so that
/// stand-ins and markers read the same from run to run.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    tokens: HashMap<Identity, u64>,
    seen: HashSet<u64>,
    duplicates: HashSet<u64>,
    active: HashSet<u64>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn token(&mut self, identity: Identity) -> u64 {
        let next = self.tokens.len() as u64 + 1;
        *self.tokens.entry(identity).or_insert(next)
    }

    /// Records a visit. Returns `true` the first time a token is seen.
    pub(crate) fn visit(&mut self, token: u64) -> bool {
        self.seen.insert(token)
    }

    pub(crate) fn mark_duplicate(&mut self, token: u64) {
        self.duplicates.insert(token);
    }

    pub(crate) fn is_duplicate(&self, token: u64) -> bool {
        self.duplicates.contains(&token)
    }

    /// Pushes a token onto the active path. Returns `false` if it is already
    /// on it, i.e. the traversal is following a back-edge.
    pub(crate) fn enter(&mut self, token: u64) -> bool {
        self.active.insert(token)
    }

    pub(crate) fn leave(&mut self, token: u64) {
        self.active.remove(&token);
    }
}
