use crate::app::App;
use crate::i18n::{t, Msg};
use crate::storage::PreferenceStore;
use ratatui::style::Color;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn hex_to_rgb(hex: &str) -> Color {
    let (r, g, b) = crate::themes::hex_to_rgb(hex);
    Color::Rgb(r, g, b)
}

/// Centre a `percent_x` wide, `height` tall box inside `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_x),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

pub fn render_header<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    let palette = app.theme.palette();
    let sub = Style::default().fg(hex_to_rgb(palette.muted));

    let selected = app.categories.names().len();
    let total = app.category_names.len();
    let header_spans = vec![
        Span::styled(
            "katahari",
            Style::default()
                .fg(hex_to_rgb(palette.fg))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" quotes", sub),
        Span::styled(
            format!(
                " | {} | {} | {}: {}/{}",
                app.lang.slug().to_uppercase(),
                app.theme.name,
                t(app.lang, Msg::Category).to_lowercase(),
                selected,
                total
            ),
            sub,
        ),
    ];

    let header_row_area = Rect::new(0, 1, f.area().width, 1);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(82),
            Constraint::Fill(1),
        ])
        .split(header_row_area);

    f.render_widget(Paragraph::new(Line::from(header_spans)), header_layout[1]);
}

/// Bottom navigation bar; arrows dim when there is nowhere to go.
pub fn render_footer<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    let palette = app.theme.palette();
    let sub = Style::default().fg(hex_to_rgb(palette.muted));
    let active = Style::default()
        .fg(hex_to_rgb(palette.accent))
        .add_modifier(Modifier::BOLD);
    let lang = app.lang;

    let prev_style = if app.nav.can_go_previous() { active } else { sub };
    // past the end of history "next" draws a fresh quote
    let next_style = if app.nav.has_forward() { active } else { sub.add_modifier(Modifier::BOLD) };
    let spans = vec![
        Span::styled(format!("← {}", t(lang, Msg::Previous)), prev_style),
        Span::styled("  ·  ", sub),
        Span::styled(format!("space {}", t(lang, Msg::Shuffle)), active),
        Span::styled("  ·  ", sub),
        Span::styled(format!("{} →", t(lang, Msg::Next)), next_style),
        Span::styled("  |  ", sub),
        Span::styled(format!("c {}", t(lang, Msg::Copy)), sub),
        Span::styled(format!("  e/E {}", t(lang, Msg::Share)), sub),
        Span::styled("  g ", sub),
        Span::styled(t(lang, Msg::Category).to_lowercase(), sub),
        Span::styled("  t/T/d theme  L lang  q quit", sub),
    ];

    let height = f.area().height;
    if height == 0 {
        return;
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        Rect::new(0, height - 1, f.area().width, 1),
    );
}

pub fn render_toast<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    let Some(toast) = &app.toast else {
        return;
    };
    let palette = app.theme.palette();
    let height = f.area().height;
    if height < 3 {
        return;
    }
    let style = Style::default()
        .fg(hex_to_rgb(palette.bg))
        .bg(hex_to_rgb(palette.fg));
    let width = (toast.message.chars().count() as u16 + 4).min(f.area().width);
    let x = (f.area().width - width) / 2;
    f.render_widget(
        Paragraph::new(format!("  {}  ", toast.message))
            .style(style)
            .alignment(Alignment::Center),
        Rect::new(x, height - 3, width, 1),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(50, 10, area);
        assert_eq!(r.height, 10);
        assert_eq!(r.width, 50);
        assert_eq!(r.y, 15);
        assert!(r.x + r.width <= area.width);
    }
}
