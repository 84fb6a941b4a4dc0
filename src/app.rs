use crate::clipboard::Clipboard;
use crate::config::AppConfig;
use crate::corpus::Corpus;
use crate::filter::CategorySelection;
use crate::i18n::{t, Msg};
use crate::models::{ImageSize, Language, Panel, Quote};
use crate::navigation::NavigationEngine;
use crate::render::{render_quote_image, ExportOptions};
use crate::storage::{keys, PreferenceStore};
use crate::themes::{self, ThemeEntry};
use anyhow::Result;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

struct ExportSettings {
    dir: PathBuf,
    brand_candidates: Vec<PathBuf>,
    font_candidates: Vec<PathBuf>,
}

type ExportResult = Result<Option<PathBuf>>;

pub struct App<S: PreferenceStore> {
    pub should_quit: bool,
    pub corpus: Arc<Corpus>,
    pub nav: NavigationEngine<Rc<S>>,
    pub lang: Language,
    pub theme: &'static ThemeEntry,
    pub categories: CategorySelection,
    pub category_names: Vec<String>,
    pub panel: Panel,
    pub panel_cursor: usize,
    pub toast: Option<Toast>,

    store: Rc<S>,
    toast_duration: Duration,
    clipboard: Option<Clipboard>,
    export: ExportSettings,
    pending_exports: Vec<Receiver<ExportResult>>,
}

impl<S: PreferenceStore> App<S> {
    /// Restores preferences from `store`; explicit `lang`/`theme` win over
    /// what was saved and are saved in turn.
    pub fn new(
        corpus: Arc<Corpus>,
        store: Rc<S>,
        config: &AppConfig,
        lang: Option<Language>,
        theme: Option<String>,
    ) -> Self {
        let lang = lang
            .or_else(|| store.get(keys::LANG).and_then(|s| Language::from_slug(&s)))
            .unwrap_or_default();
        let theme_slug = theme
            .or_else(|| store.get(keys::THEME))
            .unwrap_or_else(|| themes::DEFAULT_THEME.to_string());
        let theme = themes::get_theme(&theme_slug);

        let category_names = corpus.category_names();
        let saved: Option<Vec<String>> = store.get_json(keys::CATEGORIES);
        let categories = CategorySelection::restore(saved, &category_names);

        let mut nav = NavigationEngine::new(Arc::clone(&corpus), Rc::clone(&store));
        nav.set_pool(&categories.allowed(corpus.categories()));
        nav.initialize();

        store.set(keys::LANG, lang.slug());
        store.set(keys::THEME, theme.slug);

        Self {
            should_quit: false,
            corpus,
            nav,
            lang,
            theme,
            categories,
            category_names,
            panel: Panel::None,
            panel_cursor: 0,
            toast: None,
            store,
            toast_duration: Duration::from_millis(config.ui.toast_ms),
            clipboard: None,
            export: ExportSettings {
                dir: config.export_dir(),
                brand_candidates: config.brand_candidates(),
                font_candidates: config.font_candidates(),
            },
            pending_exports: Vec::new(),
        }
    }

    pub fn quit(&mut self) { self.should_quit = true; }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.nav.current_quote()
    }

    pub fn previous(&mut self) { self.nav.go_previous(); }
    pub fn next(&mut self) { self.nav.go_next(); }
    pub fn shuffle(&mut self) { self.nav.select_random(); }

    pub fn toggle_language(&mut self) {
        self.lang = self.lang.toggle();
        self.store.set(keys::LANG, self.lang.slug());
    }

    pub fn set_theme(&mut self, theme: &'static ThemeEntry) {
        self.theme = theme;
        self.store.set(keys::THEME, theme.slug);
    }

    pub fn cycle_theme(&mut self) {
        self.set_theme(self.theme.next());
    }

    pub fn toggle_light_dark(&mut self) {
        self.set_theme(self.theme.toggled_light_dark());
    }

    pub fn toggle_category(&mut self, name: &str) {
        self.categories.toggle(name);
        self.categories_changed();
    }

    pub fn select_all_categories(&mut self) {
        self.categories.select_all(&self.category_names);
        self.categories_changed();
    }

    pub fn clear_categories(&mut self) {
        self.categories.clear();
        self.categories_changed();
    }

    /// A new filter starts a new browsing session.
    fn categories_changed(&mut self) {
        self.store.set_json(keys::CATEGORIES, self.categories.names());
        let allowed = self.categories.allowed(self.corpus.categories());
        debug!(selected = self.categories.names().len(), all = allowed.is_all(), "category filter changed");
        self.nav.reset_to_fresh_pick(&allowed);
    }

    pub fn copy_current(&mut self) {
        let Some(text) = self.current_quote().map(|q| q.attributed(self.lang)) else {
            return;
        };
        let clipboard = self.clipboard.get_or_insert_with(Clipboard::new);
        let msg = match clipboard.copy(&text) {
            Ok(method) => {
                debug!(?method, "quote copied");
                Msg::Copied
            }
            Err(e) => {
                warn!(error = %e, "copy failed");
                Msg::CopyFailed
            }
        };
        self.show_toast(t(self.lang, msg).to_string());
    }

    /// Renders on a worker thread; the outcome is picked up by
    /// [`App::poll_exports`].
    pub fn export(&mut self, size: ImageSize) {
        let Some(quote) = self.current_quote() else {
            return;
        };
        let text = quote.text(self.lang).to_string();
        let credit = quote.credit.clone();
        let opts = ExportOptions {
            palette: self.theme.palette(),
            brand_candidates: self.export.brand_candidates.clone(),
            font_candidates: self.export.font_candidates.clone(),
            output_dir: self.export.dir.clone(),
            filename: None,
        };

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(render_quote_image(&text, &credit, size, &opts));
        });
        self.pending_exports.push(rx);
        self.show_toast(t(self.lang, Msg::Exporting).to_string());
    }

    pub fn poll_exports(&mut self) {
        for rx in std::mem::take(&mut self.pending_exports) {
            match rx.try_recv() {
                Err(TryRecvError::Empty) => self.pending_exports.push(rx),
                Ok(Ok(Some(path))) => {
                    let msg = format!("{}: {}", t(self.lang, Msg::Exported), path.display());
                    self.show_toast(msg);
                }
                // nothing to draw with, stay quiet
                Ok(Ok(None)) => self.toast = None,
                Ok(Err(e)) => {
                    warn!(error = %e, "export failed");
                    self.show_toast(t(self.lang, Msg::ExportFailed).to_string());
                }
                Err(TryRecvError::Disconnected) => {
                    warn!("export worker exited without a result");
                    self.show_toast(t(self.lang, Msg::ExportFailed).to_string());
                }
            }
        }
    }

    pub fn exports_in_flight(&self) -> usize {
        self.pending_exports.len()
    }

    pub fn show_toast(&mut self, message: String) {
        self.toast = Some(Toast {
            message,
            shown_at: Instant::now(),
        });
    }

    pub fn tick(&mut self) {
        self.poll_exports();
        if let Some(toast) = &self.toast {
            if toast.shown_at.elapsed() >= self.toast_duration {
                self.toast = None;
            }
        }
    }

    pub fn open_panel(&mut self, panel: Panel) {
        self.panel_cursor = match panel {
            Panel::Themes => themes::position(self.theme.slug),
            _ => 0,
        };
        self.panel = panel;
    }

    pub fn close_panel(&mut self) {
        self.panel = Panel::None;
    }

    fn panel_len(&self) -> usize {
        match self.panel {
            Panel::None => 0,
            Panel::Categories => self.category_names.len(),
            Panel::Themes => themes::THEME_LIST.len(),
        }
    }

    pub fn panel_up(&mut self) {
        let len = self.panel_len();
        if len > 0 {
            self.panel_cursor = (self.panel_cursor + len - 1) % len;
        }
    }

    pub fn panel_down(&mut self) {
        let len = self.panel_len();
        if len > 0 {
            self.panel_cursor = (self.panel_cursor + 1) % len;
        }
    }

    /// Space/enter inside a panel.
    pub fn panel_activate(&mut self) {
        match self.panel {
            Panel::None => {}
            Panel::Categories => {
                if let Some(name) = self.category_names.get(self.panel_cursor).cloned() {
                    self.toggle_category(&name);
                }
            }
            Panel::Themes => {
                if let Some(theme) = themes::THEME_LIST.get(self.panel_cursor) {
                    self.set_theme(theme);
                    self.close_panel();
                }
            }
        }
    }

    /// "3/5" style position in the visit history.
    pub fn history_position(&self) -> Option<(usize, usize)> {
        self.nav.pointer().map(|p| (p + 1, self.nav.history().len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::tests::corpus_of;
    use crate::storage::MemoryStore;

    fn app_with(store: &Rc<MemoryStore>) -> App<MemoryStore> {
        let corpus = corpus_of(
            &["a", "b", "c", "d"],
            &[("life", &["a", "b"]), ("work", &["c"])],
        );
        App::new(Arc::new(corpus), Rc::clone(store), &AppConfig::default(), None, None)
    }

    #[test]
    fn first_run_uses_defaults() {
        let store = Rc::new(MemoryStore::new());
        let app = app_with(&store);
        assert_eq!(app.lang, Language::En);
        assert_eq!(app.theme.slug, "light");
        assert_eq!(app.categories.names(), ["life", "work"]);
        assert_eq!(app.history_position(), Some((1, 1)));
        assert_eq!(store.get(keys::POINTER).as_deref(), Some("0"));
    }

    #[test]
    fn preferences_survive_restart() {
        let store = Rc::new(MemoryStore::new());
        {
            let mut app = app_with(&store);
            app.toggle_language();
            app.toggle_light_dark();
            app.shuffle();
            app.shuffle();
            app.previous();
        }
        let app = app_with(&store);
        assert_eq!(app.lang, Language::Id);
        assert_eq!(app.theme.slug, "dark");
        assert_eq!(app.history_position(), Some((2, 3)));
    }

    #[test]
    fn unknown_saved_values_fall_back() {
        let store = Rc::new(MemoryStore::new());
        store.set(keys::LANG, "fr");
        store.set(keys::THEME, "plaid");
        let app = app_with(&store);
        assert_eq!(app.lang, Language::En);
        assert_eq!(app.theme.slug, "light");
    }

    #[test]
    fn category_change_restarts_history_inside_new_pool() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with(&store);
        app.shuffle();
        app.shuffle();

        app.toggle_category("life");
        assert_eq!(app.categories.names(), ["work"]);
        assert_eq!(app.nav.history(), ["c"]);
        assert_eq!(app.history_position(), Some((1, 1)));
        assert_eq!(store.get(keys::CATEGORIES).as_deref(), Some(r#"["work"]"#));

        app.next();
        assert_eq!(app.current_quote().map(|q| q.code.as_str()), Some("c"));

        app.clear_categories();
        assert!(app.categories.names().is_empty());
        assert_eq!(app.nav.history().len(), 1);
        assert_eq!(store.get(keys::CATEGORIES).as_deref(), Some("[]"));
    }

    #[test]
    fn theme_panel_selects_and_closes() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with(&store);
        app.open_panel(Panel::Themes);
        assert_eq!(app.panel_cursor, 0);
        app.panel_up();
        assert_eq!(app.panel_cursor, themes::THEME_LIST.len() - 1);
        app.panel_activate();
        assert_eq!(app.theme.slug, "neon");
        assert_eq!(app.panel, Panel::None);
        assert_eq!(store.get(keys::THEME).as_deref(), Some("neon"));
    }

    fn pending(app: &mut App<MemoryStore>, result: Option<ExportResult>) {
        let (tx, rx) = mpsc::channel();
        if let Some(result) = result {
            tx.send(result).unwrap();
        }
        app.pending_exports.push(rx);
    }

    fn toast_text(app: &App<MemoryStore>) -> Option<&str> {
        app.toast.as_ref().map(|t| t.message.as_str())
    }

    #[test]
    fn finished_export_reports_saved_path() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with(&store);
        pending(&mut app, Some(Ok(Some(PathBuf::from("/tmp/quote-square.png")))));

        app.poll_exports();
        assert_eq!(app.exports_in_flight(), 0);
        assert_eq!(toast_text(&app), Some("Image saved: /tmp/quote-square.png"));
    }

    #[test]
    fn export_without_font_clears_toast_silently() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with(&store);
        app.show_toast(t(app.lang, Msg::Exporting).to_string());
        pending(&mut app, Some(Ok(None)));

        app.poll_exports();
        assert!(app.toast.is_none());
    }

    #[test]
    fn failed_or_vanished_export_shows_failure() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with(&store);
        app.toggle_language();
        pending(&mut app, Some(Err(anyhow::anyhow!("disk full"))));
        app.poll_exports();
        assert_eq!(toast_text(&app), Some("Gagal mengekspor"));

        app.toast = None;
        // sender dropped without a result
        pending(&mut app, None);
        app.poll_exports();
        assert_eq!(app.exports_in_flight(), 0);
        assert_eq!(toast_text(&app), Some("Gagal mengekspor"));
    }

    #[test]
    fn unfinished_export_stays_pending() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with(&store);
        let (tx, rx) = mpsc::channel();
        app.pending_exports.push(rx);

        app.poll_exports();
        assert_eq!(app.exports_in_flight(), 1);

        tx.send(Ok(Some(PathBuf::from("late.png")))).unwrap();
        app.poll_exports();
        assert_eq!(app.exports_in_flight(), 0);
        assert_eq!(toast_text(&app), Some("Image saved: late.png"));
    }

    #[test]
    fn export_runs_on_worker_and_reports_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.export.font_candidates = Vec::new();
        config.export.dir = Some(dir.path().display().to_string());

        let store = Rc::new(MemoryStore::new());
        let corpus = corpus_of(&["a"], &[]);
        let mut app = App::new(Arc::new(corpus), store, &config, None, None);

        app.export(ImageSize::Story);
        assert_eq!(app.exports_in_flight(), 1);
        assert_eq!(toast_text(&app), Some("Rendering image..."));

        for _ in 0..500 {
            app.poll_exports();
            if app.exports_in_flight() == 0 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(app.exports_in_flight(), 0);
        // no font configured: nothing written, no error toast
        assert!(app.toast.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn toast_expires() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with(&store);
        app.toast_duration = Duration::from_millis(0);
        app.show_toast("hello".to_string());
        app.tick();
        assert!(app.toast.is_none());
    }
}
