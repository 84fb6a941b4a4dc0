use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Copied,
    CopyFailed,
    Category,
    SelectAll,
    Clear,
    LightMode,
    DarkMode,
    Themes,
    Exporting,
    Exported,
    ExportFailed,
    Previous,
    Next,
    Shuffle,
    Copy,
    Share,
    Close,
}

pub fn t(lang: Language, msg: Msg) -> &'static str {
    use Language::{En, Id};
    match (msg, lang) {
        (Msg::Copied, En) => "Copied to clipboard",
        (Msg::Copied, Id) => "Tersalin ke clipboard",
        (Msg::CopyFailed, En) => "Copy failed",
        (Msg::CopyFailed, Id) => "Gagal menyalin",
        (Msg::Category, En) => "Category",
        (Msg::Category, Id) => "Kategori",
        (Msg::SelectAll, En) => "Select all",
        (Msg::SelectAll, Id) => "Pilih semua",
        (Msg::Clear, En) => "Clear",
        (Msg::Clear, Id) => "Bersihkan",
        (Msg::LightMode, En) => "Light mode",
        (Msg::LightMode, Id) => "Mode Terang",
        (Msg::DarkMode, En) => "Dark mode",
        (Msg::DarkMode, Id) => "Mode Gelap",
        (Msg::Themes, En) => "Select Theme",
        (Msg::Themes, Id) => "Pilih Tema",
        (Msg::Exporting, En) => "Rendering image...",
        (Msg::Exporting, Id) => "Membuat gambar...",
        (Msg::Exported, En) => "Image saved",
        (Msg::Exported, Id) => "Gambar tersimpan",
        (Msg::ExportFailed, En) => "Export failed",
        (Msg::ExportFailed, Id) => "Gagal mengekspor",
        (Msg::Previous, En) => "prev",
        (Msg::Previous, Id) => "sebelumnya",
        (Msg::Next, En) => "next",
        (Msg::Next, Id) => "berikutnya",
        (Msg::Shuffle, En) => "shuffle",
        (Msg::Shuffle, Id) => "acak",
        (Msg::Copy, En) => "copy",
        (Msg::Copy, Id) => "salin",
        (Msg::Share, En) => "image",
        (Msg::Share, Id) => "gambar",
        (Msg::Close, En) => "close",
        (Msg::Close, Id) => "tutup",
    }
}
