use crate::corpus::Corpus;
use crate::filter::AllowedCodes;
use crate::models::Quote;
use crate::storage::{keys, PreferenceStore};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Browser-style back/forward navigation over visited quote codes.
///
/// Every mutating operation writes `quoteHistory` and `quotePtr` through to
/// the store before returning. `pointer` is `None` only while `history` is
/// empty; otherwise `history[pointer]` is the code of the quote at `current`.
pub struct NavigationEngine<S: PreferenceStore, R: Rng = ThreadRng> {
    corpus: Arc<Corpus>,
    store: S,
    rng: R,
    pool: Vec<usize>,
    current: Option<usize>,
    history: Vec<String>,
    pointer: Option<usize>,
}

impl<S: PreferenceStore> NavigationEngine<S, ThreadRng> {
    pub fn new(corpus: Arc<Corpus>, store: S) -> Self {
        Self::with_rng(corpus, store, rand::rng())
    }
}

impl<S: PreferenceStore, R: Rng> NavigationEngine<S, R> {
    pub fn with_rng(corpus: Arc<Corpus>, store: S, rng: R) -> Self {
        let pool = corpus.all_indices();
        Self {
            corpus,
            store,
            rng,
            pool,
            current: None,
            history: Vec::new(),
            pointer: None,
        }
    }

    /// Restore persisted history if it still points at a known quote,
    /// otherwise start over with one random pick from the whole corpus.
    pub fn initialize(&mut self) {
        if self.corpus.is_empty() {
            return;
        }

        match self.recover() {
            Some((history, ptr, idx)) => {
                self.history = history;
                self.pointer = Some(ptr);
                self.current = Some(idx);
            }
            None => {
                debug!("no usable navigation state, starting fresh");
                let all = self.corpus.all_indices();
                if let Some(idx) = self.pick(&all) {
                    self.history = vec![self.corpus.quotes()[idx].code.clone()];
                    self.pointer = Some(0);
                    self.current = Some(idx);
                }
            }
        }
        self.persist();
    }

    fn recover(&self) -> Option<(Vec<String>, usize, usize)> {
        let history: Vec<String> = self.store.get_json(keys::HISTORY).unwrap_or_default();
        let ptr: i64 = self
            .store
            .get(keys::POINTER)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(-1);

        if history.is_empty() || ptr < 0 {
            return None;
        }
        let ptr = usize::try_from(ptr).ok()?;
        let code = history.get(ptr)?;
        let idx = self.corpus.index_of(code)?;
        Some((history, ptr, idx))
    }

    /// Restrict future random picks without touching history.
    pub fn set_pool(&mut self, allowed: &AllowedCodes) {
        self.pool = allowed.indices(&self.corpus);
    }

    /// Jump to a random quote from the active pool, discarding forward history.
    pub fn select_random(&mut self) {
        let pool = std::mem::take(&mut self.pool);
        let picked = self.pick(&pool);
        self.pool = pool;
        let Some(idx) = picked else {
            return;
        };

        let keep = self.pointer.map_or(0, |p| p + 1);
        self.history.truncate(keep);
        self.history.push(self.corpus.quotes()[idx].code.clone());
        self.pointer = Some(self.history.len() - 1);
        self.current = Some(idx);
        self.persist();
    }

    pub fn go_previous(&mut self) {
        let Some(p) = self.pointer.filter(|&p| p > 0) else {
            return;
        };
        self.pointer = Some(p - 1);
        let code = self.history[p - 1].clone();
        self.select_by_code(&code);
        self.persist();
    }

    /// Redo when forward history exists, otherwise a fresh random pick.
    pub fn go_next(&mut self) {
        match self.pointer {
            Some(p) if p + 1 < self.history.len() => {
                self.pointer = Some(p + 1);
                let code = self.history[p + 1].clone();
                self.select_by_code(&code);
                self.persist();
            }
            _ => self.select_random(),
        }
    }

    /// Start a new browsing session inside `allowed`: history collapses to
    /// a single fresh pick.
    pub fn reset_to_fresh_pick(&mut self, allowed: &AllowedCodes) {
        self.set_pool(allowed);
        let pool = std::mem::take(&mut self.pool);
        let picked = self.pick(&pool);
        self.pool = pool;
        let Some(idx) = picked else {
            return;
        };

        self.history = vec![self.corpus.quotes()[idx].code.clone()];
        self.pointer = Some(0);
        self.current = Some(idx);
        self.persist();
    }

    /// Unknown codes are ignored.
    pub fn select_by_code(&mut self, code: &str) {
        if let Some(idx) = self.corpus.index_of(code) {
            self.current = Some(idx);
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.current_index().and_then(|i| self.corpus().get(i))
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    pub fn can_go_previous(&self) -> bool {
        self.pointer.is_some_and(|p| p > 0)
    }

    pub fn has_forward(&self) -> bool {
        self.pointer.is_some_and(|p| p + 1 < self.history.len())
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    fn pick(&mut self, pool: &[usize]) -> Option<usize> {
        if self.corpus.is_empty() {
            return None;
        }
        if pool.is_empty() {
            return Some(self.rng.random_range(0..self.corpus.len()));
        }
        Some(pool[self.rng.random_range(0..pool.len())])
    }

    fn persist(&self) {
        self.store.set_json(keys::HISTORY, &self.history);
        let ptr = self.pointer.map_or_else(|| "-1".to_string(), |p| p.to_string());
        self.store.set(keys::POINTER, &ptr);
    }
}
