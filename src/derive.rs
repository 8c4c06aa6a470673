//! Pure transforms over repository lists: display ordering and the language chart.

use crate::models::{LanguageStat, SortKey};
use crate::types::Repository;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Bucket used for repositories without a detected language.
pub const OTHER_LANGUAGE: &str = "Other";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("C#", "#239120"),
    ("PHP", "#4F5D95"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#F18E33"),
    ("Dart", "#00B4AB"),
    ("Shell", "#89e051"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Vue", "#41b883"),
    ("Jupyter Notebook", "#DA5B0B"),
    (OTHER_LANGUAGE, FALLBACK_COLOR),
];

pub const FALLBACK_COLOR: &str = "#6c757d";

pub fn language_color(name: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(lang, _)| *lang == name)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Return a new ordering of `repos`. Ties keep their input order.
pub fn sort_repositories(repos: &[Repository], key: SortKey) -> Vec<Repository> {
    let mut sorted = repos.to_vec();
    match key {
        SortKey::Stars => sorted.sort_by_key(|r| Reverse(r.stargazers_count)),
        SortKey::Forks => sorted.sort_by_key(|r| Reverse(r.forks_count)),
        SortKey::Recent => sorted.sort_by_key(|r| Reverse(r.updated_at)),
        SortKey::Unsorted => {}
    }
    sorted
}

/// Count repositories per language, largest bucket first.
///
/// Buckets with equal counts stay in the order their language was first seen.
pub fn language_statistics(repos: &[Repository]) -> Vec<LanguageStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<LanguageStat> = Vec::new();

    for repo in repos {
        let name = repo.language.as_deref().unwrap_or(OTHER_LANGUAGE);
        match index.get(name) {
            Some(&i) => stats[i].count += 1,
            None => {
                index.insert(name, stats.len());
                stats.push(LanguageStat {
                    name: name.to_string(),
                    count: 1,
                    color: language_color(name),
                });
            }
        }
    }

    stats.sort_by_key(|s| Reverse(s.count));
    stats
}
