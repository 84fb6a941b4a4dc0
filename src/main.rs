mod app;
mod clipboard;
mod config;
mod corpus;
mod filter;
mod history;
mod i18n;
mod logging;
mod models;
mod navigation;
mod render;
mod server;
mod storage;
mod themes;
mod ui;

use anyhow::{bail, Context, Result};
use app::App;
use clap::{ArgAction, ArgGroup, Parser};
use config::AppConfig;
use corpus::Corpus;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use filter::CategorySelection;
use models::{ImageSize, Language, Panel};
use navigation::NavigationEngine;
use ratatui::{backend::CrosstermBackend, Terminal};
use render::{render_quote_image, ExportOptions};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use storage::{keys, FileStore, MemoryStore, PreferenceStore};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "katahari")]
#[command(version)]
#[command(about = "Bilingual quotes in your terminal", long_about = None)]
// disable the default flags so they can be listed under "Flags" below
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "\
{name} {version}
{about-section}
{usage-heading} {usage}

{all-args}
")]
#[command(group(
    ArgGroup::new("mode")
        .required(false)
        .args(&["serve", "export", "history"])
))]
struct Cli {
    /// Serve GET /quotes and /quotes/byfile (address defaults to the configured one)
    #[arg(long, value_name = "ADDR", num_args = 0..=1, default_missing_value = "")]
    serve: Option<String>,

    /// Export the current quote as a PNG and exit: "square" or "story"
    #[arg(short, long, value_name = "SIZE", value_parser = ["square", "story"])]
    export: Option<String>,

    /// File name for --export (default: quote-{size}-{timestamp}.png in the export dir)
    #[arg(short, long, value_name = "FILE", requires = "export")]
    output: Option<String>,

    /// Language: "en" or "id" (remembered for next time)
    #[arg(short, long)]
    lang: Option<String>,

    /// Theme slug, e.g. "light", "dark", "ocean" (remembered for next time)
    #[arg(short, long)]
    theme: Option<String>,

    /// Browse without reading or writing saved preferences
    #[arg(long, default_value_t = false, conflicts_with = "history", help_heading = "Flags")]
    no_save: bool,

    /// Show the quotes visited so far
    #[arg(long, default_value_t = false, help_heading = "Flags")]
    history: bool,

    /// Print help
    #[arg(short, long, action = ArgAction::Help, help_heading = "Flags")]
    help: Option<bool>,

    /// Print version
    #[arg(short = 'V', long, action = ArgAction::Version, help_heading = "Flags")]
    version: Option<bool>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config, using defaults. Error: {}",
            e
        );
        AppConfig::default()
    });

    let interactive = cli.serve.is_none() && cli.export.is_none() && !cli.history;
    let log_result = if interactive {
        let log_path = config::project_dirs()
            .map(|d| d.data_local_dir().join("katahari.log"))
            .unwrap_or_else(|| PathBuf::from("katahari.log"));
        logging::init_file(&log_path)
    } else {
        logging::init_stderr()
    };
    if let Err(e) = log_result {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let lang = match cli.lang.as_deref() {
        Some(s) => match Language::from_slug(s) {
            Some(l) => Some(l),
            None => bail!("unknown language '{}', expected \"en\" or \"id\"", s),
        },
        None => None,
    };
    if let Some(slug) = cli.theme.as_deref() {
        if !themes::is_known(slug) {
            bail!("unknown theme '{}'", slug);
        }
    }

    let corpus = Arc::new(Corpus::load_embedded()?);
    info!(quotes = corpus.len(), categories = corpus.categories().len(), "corpus loaded");

    if cli.history {
        let store = open_store();
        let lang = lang.unwrap_or_else(|| saved_language(&store));
        return history::show_history(&store, &corpus, lang);
    }

    if let Some(addr) = cli.serve {
        let addr = if addr.is_empty() { app_config.server.addr.clone() } else { addr };
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("invalid listen address '{}'", addr))?;
        let runtime = tokio::runtime::Runtime::new()?;
        return runtime.block_on(server::serve(corpus, addr, app_config.server.cache_max_age));
    }

    if let Some(size) = cli.export {
        let size = if size == "story" { ImageSize::Story } else { ImageSize::Square };
        let request = ExportRequest { size, output: cli.output, lang, theme: cli.theme };
        return if cli.no_save {
            export_headless(corpus, &app_config, MemoryStore::new(), request)
        } else {
            export_headless(corpus, &app_config, open_store(), request)
        };
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = if cli.no_save {
        let mut app = App::new(corpus, Rc::new(MemoryStore::new()), &app_config, lang, cli.theme);
        run_app(&mut terminal, &mut app)
    } else {
        let mut app = App::new(corpus, Rc::new(open_store()), &app_config, lang, cli.theme);
        run_app(&mut terminal, &mut app)
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn open_store() -> FileStore {
    let store = FileStore::open(
        storage::default_prefs_path().unwrap_or_else(|| PathBuf::from("katahari-prefs.json")),
    );
    info!(path = %store.path().display(), "preferences");
    store
}

fn saved_language<S: PreferenceStore>(store: &S) -> Language {
    store
        .get(keys::LANG)
        .and_then(|s| Language::from_slug(&s))
        .unwrap_or_default()
}

struct ExportRequest {
    size: ImageSize,
    output: Option<String>,
    lang: Option<Language>,
    theme: Option<String>,
}

/// Renders whatever quote the last session was looking at.
fn export_headless<S: PreferenceStore>(
    corpus: Arc<Corpus>,
    app_config: &AppConfig,
    store: S,
    request: ExportRequest,
) -> Result<()> {
    let lang = request.lang.unwrap_or_else(|| saved_language(&store));
    let theme = themes::get_theme(
        &request
            .theme
            .or_else(|| store.get(keys::THEME))
            .unwrap_or_else(|| themes::DEFAULT_THEME.to_string()),
    );
    let names = corpus.category_names();
    let categories = CategorySelection::restore(store.get_json(keys::CATEGORIES), &names);

    let mut nav = NavigationEngine::new(Arc::clone(&corpus), store);
    nav.set_pool(&categories.allowed(corpus.categories()));
    nav.initialize();

    let Some(quote) = nav.current_quote() else {
        bail!("the quote collection is empty");
    };

    let output_dir = match request.output {
        Some(_) => PathBuf::from("."),
        None => app_config.export_dir(),
    };
    let opts = ExportOptions {
        palette: theme.palette(),
        brand_candidates: app_config.brand_candidates(),
        font_candidates: app_config.font_candidates(),
        output_dir,
        filename: request.output,
    };

    match render_quote_image(quote.text(lang), &quote.credit, request.size, &opts)? {
        Some(path) => println!("{}", path.display()),
        None => warn!("no usable font found, nothing exported (see export.font_candidates)"),
    }
    Ok(())
}

fn run_app<S: PreferenceStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;
        app.tick();

        if event::poll(std::time::Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.quit();
                } else if app.panel != Panel::None {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => app.close_panel(),
                        KeyCode::Up | KeyCode::Char('k') => app.panel_up(),
                        KeyCode::Down | KeyCode::Char('j') => app.panel_down(),
                        KeyCode::Enter | KeyCode::Char(' ') => app.panel_activate(),
                        KeyCode::Char('a') if app.panel == Panel::Categories => {
                            app.select_all_categories()
                        }
                        KeyCode::Char('x') if app.panel == Panel::Categories => {
                            app.clear_categories()
                        }
                        KeyCode::Char('d') if app.panel == Panel::Themes => app.toggle_light_dark(),
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
                        KeyCode::Left | KeyCode::Char('h') => app.previous(),
                        KeyCode::Right | KeyCode::Char('l') => app.next(),
                        KeyCode::Char(' ') | KeyCode::Char('s') => app.shuffle(),
                        KeyCode::Char('c') => app.copy_current(),
                        KeyCode::Char('L') => app.toggle_language(),
                        KeyCode::Char('t') => app.cycle_theme(),
                        KeyCode::Char('T') => app.open_panel(Panel::Themes),
                        KeyCode::Char('d') => app.toggle_light_dark(),
                        KeyCode::Char('g') => app.open_panel(Panel::Categories),
                        KeyCode::Char('e') => app.export(ImageSize::Square),
                        KeyCode::Char('E') => app.export(ImageSize::Story),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
