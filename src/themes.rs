#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeEntry {
    pub slug: &'static str,
    pub name: &'static str,
    pub swatch_a: &'static str, // background / gradient start
    pub swatch_b: &'static str, // accent / gradient end
}

const fn theme(
    slug: &'static str,
    name: &'static str,
    swatch_a: &'static str,
    swatch_b: &'static str,
) -> ThemeEntry {
    ThemeEntry {
        slug,
        name,
        swatch_a,
        swatch_b,
    }
}

pub const THEME_LIST: [ThemeEntry; 24] = [
    theme("light", "Light", "#ffffff", "#e2e8f0"),
    theme("dark", "Dark", "#0a0a0a", "#111827"),
    theme("violet", "Violet", "#0b0614", "#a855f7"),
    theme("ocean", "Ocean", "#03141c", "#0ea5e9"),
    theme("rose", "Rose", "#fff1f2", "#f43f5e"),
    theme("flamingo", "Flamingo", "#fff0f6", "#ec4899"),
    theme("bubblegum", "Bubblegum", "#fdf2f8", "#db2777"),
    theme("sunset", "Sunset", "#fff7ed", "#f97316"),
    theme("amber", "Amber", "#fffbeb", "#f59e0b"),
    theme("gold", "Gold", "#fffbea", "#eab308"),
    theme("sand", "Sand", "#faf7f1", "#78716c"),
    theme("lime", "Lime", "#f7fee7", "#84cc16"),
    theme("mint", "Mint", "#f0fdf4", "#22c55e"),
    theme("emerald", "Emerald", "#ecfdf5", "#10b981"),
    theme("forest", "Forest", "#051b15", "#10b981"),
    theme("aqua", "Aqua", "#ecfeff", "#06b6d4"),
    theme("sky", "Sky", "#f0f9ff", "#0ea5e9"),
    theme("azure", "Azure", "#eff6ff", "#3b82f6"),
    theme("indigo", "Indigo", "#111827", "#6366f1"),
    theme("midnight", "Midnight", "#0b1220", "#1e40af"),
    theme("dracula", "Dracula", "#0f0b1f", "#7c3aed"),
    theme("coffee", "Coffee", "#1b140f", "#92400e"),
    theme("lava", "Lava", "#180606", "#ef4444"),
    theme("neon", "Neon", "#070a0a", "#10b981"),
];

const DARK_THEMES: [&str; 10] = [
    "dark", "violet", "ocean", "forest", "indigo", "midnight", "dracula", "coffee", "lava", "neon",
];

pub const DEFAULT_THEME: &str = "light";

/// Unknown slugs resolve to the light theme.
pub fn get_theme(slug: &str) -> &'static ThemeEntry {
    THEME_LIST
        .iter()
        .find(|t| t.slug == slug)
        .unwrap_or(&THEME_LIST[0])
}

pub fn is_known(slug: &str) -> bool {
    THEME_LIST.iter().any(|t| t.slug == slug)
}

pub fn position(slug: &str) -> usize {
    THEME_LIST.iter().position(|t| t.slug == slug).unwrap_or(0)
}

impl ThemeEntry {
    pub fn is_dark(&self) -> bool {
        DARK_THEMES.contains(&self.slug)
    }

    pub fn next(&self) -> &'static ThemeEntry {
        &THEME_LIST[(position(self.slug) + 1) % THEME_LIST.len()]
    }

    /// Dark-like themes flip to light, everything else to dark.
    pub fn toggled_light_dark(&self) -> &'static ThemeEntry {
        if self.is_dark() {
            get_theme("light")
        } else {
            get_theme("dark")
        }
    }

    pub fn palette(&self) -> Palette {
        let (fg, muted) = if self.is_dark() {
            ("#f8fafc", "#94a3b8")
        } else {
            ("#0f172a", "#64748b")
        };
        Palette {
            bg: self.swatch_a,
            fg,
            muted,
            accent: self.swatch_b,
        }
    }
}

/// Colours shared by the terminal UI and the image renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: &'static str,
    pub fg: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
}

/// `#rrggbb` to components; malformed input reads as white.
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 && hex.is_ascii() {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
        (r, g, b)
    } else {
        (255, 255, 255)
    }
}
