mod detail;
mod help;
mod table;

use crate::app::App;
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    table::render(app, frame);

    if app.overlay_visible {
        detail::render(app, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NO_RESULTS_NOTICE;
    use crate::catalog::{CatalogError, Product};
    use ratatui::{Terminal, backend::TestBackend};

    fn product(id: u64, title: &str, images: usize) -> Product {
        Product {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            price: 19.999,
            discount_percentage: 12.5,
            rating: 4.2,
            stock: 7,
            brand: "Acme".to_string(),
            category: "smartphones".to_string(),
            thumbnail: format!("https://cdn.example.com/{id}/thumb.png"),
            images: (1..=images)
                .map(|i| format!("https://cdn.example.com/{id}/img{i}.png"))
                .collect(),
        }
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        screen
    }

    #[test]
    fn test_empty_catalog_shows_notice_not_table() {
        let mut app = App::new("₱");
        app.finish_loading(Ok(Vec::new()));
        app.apply_filter("anything");
        let screen = draw(&app);
        assert!(screen.contains(NO_RESULTS_NOTICE));
        assert!(!screen.contains("Thumbnail"));
    }

    #[test]
    fn test_loading_and_failure_notices() {
        let mut app = App::new("₱");
        let screen = draw(&app);
        assert!(screen.contains(NO_RESULTS_NOTICE));
        assert!(screen.contains("Loading catalog"));

        app.finish_loading(Err(CatalogError::Interrupted));
        let screen = draw(&app);
        assert!(screen.contains(NO_RESULTS_NOTICE));
        assert!(screen.contains("Failed to load catalog"));
    }

    #[test]
    fn test_table_lists_filtered_products() {
        let mut app = App::new("₱");
        app.update_page_size(40);
        app.finish_loading(Ok(vec![product(1, "Apple Watch", 1), product(2, "Samsung TV", 1)]));
        app.apply_filter("tv");

        let screen = draw(&app);
        assert!(screen.contains("Thumbnail"));
        assert!(screen.contains("Samsung TV"));
        assert!(!screen.contains("Apple Watch"));
        assert!(screen.contains("₱20.00"));
    }

    #[test]
    fn test_overlay_shows_details_and_four_images() {
        let mut app = App::new("₱");
        app.finish_loading(Ok(vec![product(1, "Galaxy Phone", 6)]));
        app.select(0);

        let screen = draw(&app);
        assert!(screen.contains("SMARTPHONES"));
        assert!(screen.contains("Galaxy Phone description"));
        assert!(screen.contains("MORE IMAGES"));
        assert!(screen.contains("img4.png"));
        assert!(!screen.contains("img5.png"));
    }

    #[test]
    fn test_dismissed_overlay_is_not_drawn() {
        let mut app = App::new("₱");
        app.finish_loading(Ok(vec![product(1, "Galaxy Phone", 2)]));
        app.select(0);
        app.dismiss();

        let screen = draw(&app);
        assert!(!screen.contains("MORE IMAGES"));
    }

    #[test]
    fn test_overlay_without_selection_does_not_panic() {
        let mut app = App::new("₱");
        app.overlay_visible = true;
        let screen = draw(&app);
        assert!(!screen.contains("MORE IMAGES"));
    }

    #[test]
    fn test_overlay_without_images() {
        let mut app = App::new("₱");
        let mut sparse = product(1, "Plain Item", 0);
        sparse.brand.clear();
        sparse.category.clear();
        app.finish_loading(Ok(vec![sparse]));
        app.select(0);

        let screen = draw(&app);
        assert!(screen.contains("MORE IMAGES"));
        assert!(screen.contains("(none)"));
        assert!(!screen.contains("Brand:"));
    }
}
