pub mod panels;
pub mod quote;
pub mod utils;

use crate::app::App;
use crate::storage::PreferenceStore;
use crate::ui::utils::hex_to_rgb;
use ratatui::{
    style::Style,
    widgets::Block,
    Frame,
};

pub fn render<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    let bg_color = hex_to_rgb(app.theme.palette().bg);
    f.render_widget(
        Block::default().style(Style::default().bg(bg_color)),
        f.area(),
    );

    quote::draw(f, app);
    panels::draw(f, app);
}
