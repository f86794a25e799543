use crate::app::{App, InputMode, LoadState, NO_RESULTS_NOTICE, ROW_HEIGHT};
use crate::catalog::format_price;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SEARCH_LABEL_EDITING: &str = " 🔍 Search product (Enter/Esc to finish): ";
const SEARCH_LABEL_NORMAL: &str = " 🔍 Search product (/): ";

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + search(3) + table(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_text = format!(
        " Catalog Explorer   [{}/{} products]",
        app.filtered_indices.len(),
        app.catalog.len()
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        SEARCH_LABEL_EDITING
    } else {
        SEARCH_LABEL_NORMAL
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.search))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search ")
                .title_bottom(Line::from(" Esc: clear ").alignment(Alignment::Right)),
        );
    frame.render_widget(search_bar, chunks[1]);

    if app.input_mode == InputMode::Editing {
        let cursor_x = chunks[1].x + 1 + search_label.width() as u16 + app.search.width() as u16;
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    // ── Products ──
    if app.filtered_indices.is_empty() {
        render_notice(app, frame, chunks[2]);
    } else {
        render_table(app, frame, chunks[2]);
    }

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ↑↓", key_style),
        Span::raw(" Navigate  "),
        Span::styled("/", key_style),
        Span::raw(" Search  "),
        Span::styled("Enter", key_style),
        Span::raw(" Detail  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[3]);
}

fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""), Line::from(format!(" {NO_RESULTS_NOTICE}"))];
    match &app.load_state {
        LoadState::Loading => lines.push(Line::styled(
            " Loading catalog...",
            Style::default().fg(Color::DarkGray),
        )),
        LoadState::Failed(message) => lines.push(Line::styled(
            format!(" Failed to load catalog: {message}"),
            Style::default().fg(Color::Red),
        )),
        LoadState::Loaded => {}
    }

    let notice = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Products "),
    );
    frame.render_widget(notice, area);
}

fn render_table(app: &App, frame: &mut Frame, area: Rect) {
    let thumb_width = (area.width as usize * 20 / 100).saturating_sub(3);
    let name_width = (area.width as usize * 70 / 100).saturating_sub(1);

    let rows: Vec<Row> = app
        .visible_rows()
        .iter()
        .filter_map(|&idx| app.catalog.get(idx))
        .map(|product| {
            let name = Text::from(vec![
                Line::styled(
                    truncate_str(&product.title, name_width),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    truncate_str(&product.description, name_width),
                    Style::default().fg(Color::Gray),
                ),
            ]);
            Row::new(vec![
                Cell::from(truncate_str(&product.thumbnail, thumb_width))
                    .style(Style::default().fg(Color::Blue)),
                Cell::from(name),
                Cell::from(format_price(product.price, &app.currency_symbol)).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
            .height(ROW_HEIGHT)
        })
        .collect();

    let header = Row::new(vec!["Thumbnail", "Name", "Price"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let page_info = format!(
        " {}-{} of {} ",
        app.table_offset + 1,
        app.table_offset + app.visible_rows().len(),
        app.filtered_indices.len()
    );

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(70),
            Constraint::Percentage(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Products ")
            .title_bottom(Line::from(page_info).alignment(Alignment::Right)),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");

    let mut state = TableState::default().with_selected(Some(app.table_selected));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}
