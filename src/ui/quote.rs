use crate::app::App;
use crate::storage::PreferenceStore;
use crate::ui::utils::{hex_to_rgb, render_footer, render_header, render_toast};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use textwrap::Options;

pub fn draw<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    render_header(f, app);

    let palette = app.theme.palette();
    let area = f.area();

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(70),
            Constraint::Fill(1),
        ])
        .split(area);
    let column = horizontal_layout[1];
    let wrap_width = column.width.saturating_sub(2).max(10) as usize;

    let (text, credit) = match app.current_quote() {
        Some(q) => (q.text(app.lang).to_string(), format!("— {}", q.credit)),
        None => (String::new(), String::new()),
    };

    let text_lines: Vec<String> = textwrap::wrap(&text, Options::new(wrap_width))
        .into_iter()
        .map(|c| c.into_owned())
        .collect();
    let credit_lines: Vec<String> = textwrap::wrap(&credit, Options::new(wrap_width))
        .into_iter()
        .map(|c| c.into_owned())
        .collect();

    // quote, blank, credit, blank, position
    let block_height = (text_lines.len() + 1 + credit_lines.len() + 2) as u16;

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(block_height),
            Constraint::Fill(1),
        ])
        .split(column);

    let fg = Style::default()
        .fg(hex_to_rgb(palette.fg))
        .add_modifier(Modifier::BOLD);
    let muted = Style::default()
        .fg(hex_to_rgb(palette.muted))
        .add_modifier(Modifier::ITALIC);

    let mut lines: Vec<Line> = text_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, fg)))
        .collect();
    lines.push(Line::default());
    lines.extend(
        credit_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, muted))),
    );
    lines.push(Line::default());

    if let Some((pos, total)) = app.history_position() {
        let mut status = format!("{}/{}", pos, total);
        if app.exports_in_flight() > 0 {
            status.push_str("  ·  …");
        }
        lines.push(Line::from(Span::styled(
            status,
            Style::default().fg(hex_to_rgb(palette.accent)),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Left),
        vertical_layout[1],
    );

    render_toast(f, app);
    render_footer(f, app);
}
