use crate::models::{CategoryMap, Quote};
use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(RustEmbed)]
#[folder = "resources/"]
struct Asset;

const QUOTES_FILE: &str = "quotes.json";
const BYFILE_FILE: &str = "quotes.byfile.json";

/// The immutable quote dataset: ordered quotes plus their category grouping.
#[derive(Debug, Clone)]
pub struct Corpus {
    quotes: Vec<Quote>,
    categories: CategoryMap,
    code_to_idx: HashMap<String, usize>,
}

impl Corpus {
    pub fn new(quotes: Vec<Quote>, categories: CategoryMap) -> Self {
        let mut code_to_idx = HashMap::with_capacity(quotes.len());
        for (i, q) in quotes.iter().enumerate() {
            // last occurrence wins on duplicate codes
            code_to_idx.insert(q.code.clone(), i);
        }

        for (name, list) in &categories {
            let unknown = list
                .iter()
                .filter(|q| !code_to_idx.contains_key(&q.code))
                .count();
            if unknown > 0 {
                warn!(category = %name, unknown, "category lists codes missing from the corpus");
            }
        }

        Self {
            quotes,
            categories,
            code_to_idx,
        }
    }

    pub fn load_embedded() -> Result<Self> {
        let quotes: Vec<Quote> = read_embedded_json(QUOTES_FILE)?;
        let categories: CategoryMap = read_embedded_json(BYFILE_FILE)?;
        Ok(Self::new(quotes, categories))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Quote> {
        self.quotes.get(idx)
    }

    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.code_to_idx.get(code).copied()
    }

    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.quotes.len()).collect()
    }

    /// Corpus indices whose codes are in `codes`, or every index when
    /// nothing matches.
    pub fn indices_for(&self, codes: &HashSet<String>) -> Vec<usize> {
        let picked: Vec<usize> = self
            .quotes
            .iter()
            .enumerate()
            .filter(|(_, q)| codes.contains(&q.code))
            .map(|(i, _)| i)
            .collect();
        if picked.is_empty() {
            self.all_indices()
        } else {
            picked
        }
    }
}

fn read_embedded_json<T: serde::de::DeserializeOwned>(name: &str) -> Result<T> {
    let file = Asset::get(name).context(format!("Could not find embedded data file: {}", name))?;
    let raw = std::str::from_utf8(file.data.as_ref())?;
    let parsed = serde_json::from_str(raw).context(format!("Malformed data file: {}", name))?;
    Ok(parsed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn quote(code: &str) -> Quote {
        Quote {
            code: code.to_string(),
            content: format!("content {}", code),
            content_id: format!("isi {}", code),
            credit: format!("credit {}", code),
        }
    }

    pub(crate) fn corpus_of(codes: &[&str], cats: &[(&str, &[&str])]) -> Corpus {
        let quotes = codes.iter().map(|c| quote(c)).collect();
        let categories = cats
            .iter()
            .map(|(name, list)| (name.to_string(), list.iter().map(|c| quote(c)).collect()))
            .collect();
        Corpus::new(quotes, categories)
    }

    #[test]
    fn embedded_dataset_is_consistent() {
        let corpus = Corpus::load_embedded().unwrap();
        assert!(!corpus.is_empty());
        assert!(!corpus.categories().is_empty());
        for list in corpus.categories().values() {
            for q in list {
                assert!(corpus.index_of(&q.code).is_some(), "unknown code {}", q.code);
            }
        }
    }

    #[test]
    fn index_lookup_by_code() {
        let corpus = corpus_of(&["a", "b", "c"], &[]);
        assert_eq!(corpus.index_of("b"), Some(1));
        assert_eq!(corpus.index_of("zzz"), None);
    }

    #[test]
    fn indices_for_falls_back_when_nothing_matches() {
        let corpus = corpus_of(&["a", "b", "c"], &[]);
        let codes: HashSet<String> = ["nope".to_string()].into_iter().collect();
        assert_eq!(corpus.indices_for(&codes), vec![0, 1, 2]);

        let codes: HashSet<String> = ["c".to_string(), "a".to_string()].into_iter().collect();
        assert_eq!(corpus.indices_for(&codes), vec![0, 2]);
    }

    #[test]
    fn duplicate_codes_resolve_to_last_entry() {
        let corpus = corpus_of(&["a", "b", "a"], &[]);
        assert_eq!(corpus.index_of("a"), Some(2));
        assert_eq!(corpus.index_of("b"), Some(1));
        assert_eq!(corpus.len(), 3);
    }
}
