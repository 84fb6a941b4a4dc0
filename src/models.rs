use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Quote {
    pub code: String,
    pub content: String,
    /// Indonesian rendition of `content`
    pub content_id: String,
    pub credit: String,
}

impl Quote {
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::En => &self.content,
            Language::Id => &self.content_id,
        }
    }

    /// Clipboard form: "{text} — {credit}"
    pub fn attributed(&self, language: Language) -> String {
        format!("{} — {}", self.text(language), self.credit)
    }
}

pub type CategoryMap = BTreeMap<String, Vec<Quote>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Id,
}

impl Language {
    pub fn slug(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Id => "id",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "id" => Some(Language::Id),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::Id,
            Language::Id => Language::En,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Square,
    Story,
}

impl ImageSize {
    pub fn slug(self) -> &'static str {
        match self {
            ImageSize::Square => "square",
            ImageSize::Story => "story",
        }
    }

    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ImageSize::Square => (1080, 1080),
            ImageSize::Story => (1080, 1920),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Panel {
    None,
    Categories,
    Themes,
}
