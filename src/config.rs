use anyhow::Result;
use config::{Config, Environment, File};
use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CACHE_MAX_AGE: u64 = 3600;
const DEFAULT_TOAST_MS: u64 = 2000;

const BRAND_CANDIDATES: [&str; 4] = [
    "assets/brand-logo.png",
    "assets/apple-touch-icon.png",
    "assets/logo.png",
    "assets/favicon.png",
];

const FONT_CANDIDATES: [&str; 9] = [
    "assets/fonts/quote.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub cache_max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    pub dir: Option<String>,
    pub brand_candidates: Vec<String>,
    pub font_candidates: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub toast_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub export: ExportConfig,
    pub ui: UiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: DEFAULT_ADDR.to_string(),
                cache_max_age: DEFAULT_CACHE_MAX_AGE,
            },
            export: ExportConfig {
                dir: None,
                brand_candidates: to_strings(&BRAND_CANDIDATES),
                font_candidates: to_strings(&FONT_CANDIDATES),
            },
            ui: UiConfig {
                toast_ms: DEFAULT_TOAST_MS,
            },
        }
    }
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// List values in env vars are split like `PATH`.
#[cfg(windows)]
const LIST_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const LIST_SEPARATOR: &str = ":";

fn environment() -> Environment {
    Environment::with_prefix("KATAHARI")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(LIST_SEPARATOR)
        .with_list_parse_key("export.font_candidates")
        .with_list_parse_key("export.brand_candidates")
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "katahari")
}

impl AppConfig {
    /// Defaults, then `config.toml` in the platform config dir, then
    /// `KATAHARI_SECTION__KEY` environment variables.
    pub fn load() -> Result<Self> {
        let config_path = project_dirs().map(|d| d.config_dir().join("config.toml"));
        Self::load_from(config_path, environment())
    }

    fn load_from(config_path: Option<PathBuf>, env: Environment) -> Result<Self> {
        let defaults = AppConfig::default();

        let mut builder = Config::builder()
            .set_default("server.addr", defaults.server.addr)?
            .set_default("server.cache_max_age", defaults.server.cache_max_age)?
            .set_default("export.brand_candidates", defaults.export.brand_candidates)?
            .set_default("export.font_candidates", defaults.export.font_candidates)?
            .set_default("ui.toast_ms", defaults.ui.toast_ms)?;

        if let Some(config_path) = config_path {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path));
            }
        }

        let cfg = builder.add_source(env).build()?;
        let app_config: AppConfig = cfg.try_deserialize()?;
        Ok(app_config)
    }

    /// Configured directory, else the user's downloads, else the cwd.
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.export.dir {
            return PathBuf::from(dir);
        }
        UserDirs::new()
            .and_then(|u| u.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn brand_candidates(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.export.brand_candidates.iter().map(PathBuf::from).collect();
        if let Some(proj_dirs) = project_dirs() {
            paths.push(proj_dirs.config_dir().join("brand-logo.png"));
        }
        paths
    }

    pub fn font_candidates(&self) -> Vec<PathBuf> {
        self.export.font_candidates.iter().map(PathBuf::from).collect()
    }
}
