use crate::app::App;
use crate::i18n::{t, Msg};
use crate::models::Panel;
use crate::storage::PreferenceStore;
use crate::themes::THEME_LIST;
use crate::ui::utils::{centered_rect, hex_to_rgb};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    match app.panel {
        Panel::None => {}
        Panel::Categories => draw_categories(f, app),
        Panel::Themes => draw_themes(f, app),
    }
}

fn draw_categories<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    let palette = app.theme.palette();
    let lang = app.lang;

    let mut lines: Vec<Line> = app
        .category_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mark = if app.categories.contains(name) { "[x]" } else { "[ ]" };
            let count = app.corpus.categories().get(name).map_or(0, Vec::len);
            let mut style = Style::default().fg(hex_to_rgb(palette.fg));
            if i == app.panel_cursor {
                style = style.bg(hex_to_rgb(palette.accent)).add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(format!(" {} {} ({})", mark, name, count), style))
        })
        .collect();

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(
            " space toggle · a {} · x {} · esc {}",
            t(lang, Msg::SelectAll).to_lowercase(),
            t(lang, Msg::Clear).to_lowercase(),
            t(lang, Msg::Close)
        ),
        Style::default().fg(hex_to_rgb(palette.muted)),
    )));

    let area = centered_rect(50, lines.len() as u16 + 2, f.area());
    let block = Block::default()
        .title(format!(" {} ", t(lang, Msg::Category)))
        .borders(Borders::ALL)
        .style(Style::default().bg(hex_to_rgb(palette.bg)).fg(hex_to_rgb(palette.muted)));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_themes<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    let palette = app.theme.palette();
    let lang = app.lang;

    let mode = if app.theme.is_dark() { Msg::LightMode } else { Msg::DarkMode };
    let mut lines: Vec<Line> = THEME_LIST
        .iter()
        .enumerate()
        .map(|(i, theme)| {
            let current = if theme.slug == app.theme.slug { "●" } else { " " };
            let mut name_style = Style::default().fg(hex_to_rgb(palette.fg));
            if i == app.panel_cursor {
                name_style = name_style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            Line::from(vec![
                Span::styled(format!(" {} ", current), name_style),
                Span::styled("██", Style::default().fg(hex_to_rgb(theme.swatch_a))),
                Span::styled("██", Style::default().fg(hex_to_rgb(theme.swatch_b))),
                Span::styled(format!(" {:<10}", theme.name), name_style),
            ])
        })
        .collect();

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(" enter select · d {} · esc {}", t(lang, mode).to_lowercase(), t(lang, Msg::Close)),
        Style::default().fg(hex_to_rgb(palette.muted)),
    )));

    let area = centered_rect(40, lines.len() as u16 + 2, f.area());
    let block = Block::default()
        .title(format!(" {} ", t(lang, Msg::Themes)))
        .borders(Borders::ALL)
        .style(Style::default().bg(hex_to_rgb(palette.bg)).fg(hex_to_rgb(palette.muted)));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
