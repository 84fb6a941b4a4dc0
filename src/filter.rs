use crate::corpus::Corpus;
use crate::models::CategoryMap;
use std::collections::HashSet;

/// Codes permitted for random selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedCodes {
    All,
    Codes(HashSet<String>),
}

impl AllowedCodes {
    pub fn is_all(&self) -> bool {
        matches!(self, AllowedCodes::All)
    }

    /// Corpus indices to draw from. Never empty for a non-empty corpus.
    pub fn indices(&self, corpus: &Corpus) -> Vec<usize> {
        match self {
            AllowedCodes::All => corpus.all_indices(),
            AllowedCodes::Codes(codes) => corpus.indices_for(codes),
        }
    }
}

pub fn allowed_codes(selected: &[String], map: &CategoryMap) -> AllowedCodes {
    if selected.is_empty() {
        return AllowedCodes::All;
    }

    let codes: HashSet<String> = selected
        .iter()
        .filter_map(|cat| map.get(cat))
        .flatten()
        .map(|q| q.code.clone())
        .collect();

    if codes.is_empty() {
        AllowedCodes::All
    } else {
        AllowedCodes::Codes(codes)
    }
}

/// Category selection as the user manipulates it. An empty persisted
/// selection means "everything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    names: Vec<String>,
}

impl CategorySelection {
    pub fn restore(saved: Option<Vec<String>>, all: &[String]) -> Self {
        match saved {
            Some(names) if !names.is_empty() => Self { names },
            _ => Self { names: all.to_vec() },
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn toggle(&mut self, name: &str) {
        if self.contains(name) {
            self.names.retain(|n| n != name);
        } else {
            self.names.push(name.to_string());
        }
    }

    pub fn select_all(&mut self, all: &[String]) {
        self.names = all.to_vec();
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn allowed(&self, map: &CategoryMap) -> AllowedCodes {
        allowed_codes(&self.names, map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::tests::corpus_of;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_selection_is_unfiltered() {
        let corpus = corpus_of(&["a", "b"], &[("life", &["a"])]);
        let allowed = allowed_codes(&[], corpus.categories());
        assert_eq!(allowed, AllowedCodes::All);
        assert_eq!(allowed.indices(&corpus), vec![0, 1]);
    }

    #[test]
    fn union_across_overlapping_categories() {
        let corpus = corpus_of(
            &["a", "b", "c", "d"],
            &[("life", &["a", "b"]), ("work", &["b", "d"])],
        );
        let allowed = allowed_codes(&names(&["life", "work"]), corpus.categories());
        let AllowedCodes::Codes(codes) = &allowed else {
            panic!("expected a filtered set");
        };
        assert_eq!(codes.len(), 3);
        assert_eq!(allowed.indices(&corpus), vec![0, 1, 3]);
    }

    #[test]
    fn empty_categories_fall_back_to_all() {
        let corpus = corpus_of(&["a", "b"], &[("empty", &[])]);
        let allowed = allowed_codes(&names(&["empty", "missing"]), corpus.categories());
        assert!(allowed.is_all());
    }

    #[test]
    fn selection_defaults_to_every_category() {
        let all = names(&["life", "work"]);
        assert_eq!(CategorySelection::restore(None, &all).names(), all.as_slice());
        assert_eq!(
            CategorySelection::restore(Some(Vec::new()), &all).names(),
            all.as_slice()
        );
        assert_eq!(
            CategorySelection::restore(Some(names(&["work"])), &all).names(),
            names(&["work"]).as_slice()
        );
    }

    #[test]
    fn toggle_adds_and_removes() {
        let all = names(&["life", "work"]);
        let mut sel = CategorySelection::restore(None, &all);
        sel.toggle("life");
        assert!(!sel.contains("life"));
        sel.toggle("life");
        assert!(sel.contains("life"));
        sel.clear();
        assert!(sel.names().is_empty());
        sel.select_all(&all);
        assert_eq!(sel.names().len(), 2);
    }
}
