use crate::app::App;
use crate::catalog::{Product, format_price};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::help::centered_rect;

/// Detail overlay for the selected product, drawn over the table.
pub fn render(app: &App, frame: &mut Frame) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    // A visible overlay without a selection renders an empty body.
    let lines = app
        .selected_product()
        .map(|product| product_lines(product, &app.currency_symbol))
        .unwrap_or_default();

    let overlay = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Product ")
                .title_bottom(
                    Line::from(" Esc close · o open thumbnail ")
                        .style(Style::default().fg(Color::DarkGray)),
                ),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(overlay, area);
}

fn product_lines<'a>(product: &'a Product, currency_symbol: &str) -> Vec<Line<'a>> {
    let label = Style::default().fg(Color::DarkGray);

    let mut facts = Vec::new();
    if !product.brand.is_empty() {
        facts.push(Span::styled(" Brand: ", label));
        facts.push(Span::raw(product.brand.as_str()));
    }
    facts.extend([
        Span::styled(" Rating: ", label),
        Span::raw(format!("{:.2}", product.rating)),
        Span::styled("  Stock: ", label),
        Span::raw(product.stock.to_string()),
        Span::styled("  Discount: ", label),
        Span::raw(format!("{:.2}%", product.discount_percentage)),
    ]);

    let mut lines = vec![
        Line::styled(format!(" {}", product.category.to_uppercase()), label),
        Line::styled(
            format!(" {}", product.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!(" {}", product.description)),
        Line::from(""),
        Line::styled(
            format!(" {}", format_price(product.price, currency_symbol)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(facts),
        Line::from(""),
        Line::styled(
            " MORE IMAGES",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    let images = product.overlay_images();
    if images.is_empty() {
        lines.push(Line::styled("   (none)", label));
    }
    for image in images {
        lines.push(Line::from(vec![
            Span::raw("   • "),
            Span::styled(
                image.as_str(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    lines
}
