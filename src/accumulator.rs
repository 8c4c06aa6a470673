use crate::types::Repository;
use std::collections::HashSet;

/// Deduplicated union of every repository page fetched for the current query.
///
/// Insertion order follows first sighting. Entries are never removed except by
/// [`RepoAccumulator::reset`].
#[derive(Debug, Default, Clone)]
pub struct RepoAccumulator {
    repos: Vec<Repository>,
    seen: HashSet<u64>,
}

impl RepoAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.repos.clear();
        self.seen.clear();
    }

    /// Add repositories whose id is not yet present. Returns how many were new.
    pub fn merge(&mut self, page: &[Repository]) -> usize {
        let before = self.repos.len();
        for repo in page {
            if self.seen.insert(repo.id) {
                self.repos.push(repo.clone());
            }
        }
        self.repos.len() - before
    }

    pub fn repos(&self) -> &[Repository] {
        &self.repos
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}
