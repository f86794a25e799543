mod app;
mod catalog;
mod config;
mod loader;
mod logging;
mod ui;

use app::{App, InputMode, NO_RESULTS_NOTICE};
use catalog::{CatalogClient, format_price};
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use loader::CatalogLoader;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// TUI explorer for a remote product catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog endpoint returning `{ "products": [...] }`
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Currency symbol placed before every price
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Where to write the log file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI explorer (default)
    Run,
    /// Fetch the catalog once and print the products matching QUERY
    Search {
        /// Case-insensitive text matched against titles and descriptions
        #[arg(default_value = "")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config.with_overrides(cli.url, cli.currency, cli.log_file),
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    match config.log_path() {
        Ok(path) => {
            if let Err(e) = logging::init(&path) {
                eprintln!("Warning: logging disabled ({}): {}", path.display(), e);
            }
        }
        Err(e) => eprintln!("Warning: logging disabled: {}", e.user_message()),
    }
    info!(endpoint = %config.endpoint, "starting catalog explorer");

    let client = match CatalogClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Search { query } => run_search(&client, &config, &query).await,
        Commands::Run => run_tui(client, &config).await,
    }
}

async fn run_search(
    client: &CatalogClient,
    config: &Config,
    query: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = match client.fetch().await {
        Ok(products) => products,
        Err(e) => {
            error!(error = %e, url = client.endpoint(), "catalog fetch failed");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    let mut app = App::new(config.currency_symbol.clone());
    app.finish_loading(Ok(products));
    app.apply_filter(query);
    if app.filtered_indices.is_empty() {
        println!("{}", NO_RESULTS_NOTICE);
        return Ok(());
    }

    for product in app.filtered_products() {
        println!(
            "{:>5}  {}  {}",
            product.id,
            product.title,
            format_price(product.price, &app.currency_symbol)
        );
    }
    Ok(())
}

async fn run_tui(client: CatalogClient, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config.currency_symbol.clone());
    let mut loader = CatalogLoader::spawn(client);

    // Init terminal
    let mut terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(e.into());
    }

    // Main loop
    let result = match terminal.size() {
        Ok(size) => {
            app.update_page_size(size.height);
            run_app(&mut terminal, &mut app, &mut loader)
        }
        Err(e) => Err(e.into()),
    };

    // Restore terminal
    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(e) = result {
        error!(error = %e, "terminal loop failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if loader.is_pending() {
        info!("quit before the catalog finished loading");
    }
    Ok(())
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    loader: &mut CatalogLoader,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Some(result) = loader.poll() {
            app.finish_loading(result);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                Event::Resize(_, height) => {
                    app.update_page_size(height);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.overlay_visible {
        handle_overlay_key(app, key);
    } else if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
    } else {
        handle_table_key(app, key);
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.pop_search_char();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }
        KeyCode::Char(c) => {
            app.push_search_char(c);
        }
        _ => {}
    }
}

fn handle_table_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Down | KeyCode::Char('j') => app.table_next(),
        KeyCode::Up | KeyCode::Char('k') => app.table_prev(),
        KeyCode::PageDown => app.table_page_down(),
        KeyCode::PageUp => app.table_page_up(),
        KeyCode::Char('g') => app.table_first(),
        KeyCode::Char('G') => app.table_last(),
        KeyCode::Enter => app.select_highlighted(),
        KeyCode::Esc => {
            if !app.search.is_empty() {
                app.clear_filter();
            }
        }
        _ => {}
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.dismiss(),
        KeyCode::Char('o') => {
            let Some(link) = app.selected_product().map(|p| p.thumbnail.clone()) else {
                return;
            };
            if link.is_empty() {
                app.status_msg = "No thumbnail for this product".to_string();
            } else if std::process::Command::new("xdg-open").arg(&link).spawn().is_ok() {
                app.status_msg = format!("Opening: {}", link);
            } else {
                app.status_msg = format!("Thumbnail: {} (no opener available)", link);
            }
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.show_help = false;
            } else if app.overlay_visible {
                app.dismiss();
            } else if let Some(row) = app.row_at(mouse.row) {
                // The overlay takes over input from the search bar.
                app.input_mode = InputMode::Normal;
                app.click_row(row);
            }
        }
        MouseEventKind::ScrollDown if !app.overlay_visible => app.table_next(),
        MouseEventKind::ScrollUp if !app.overlay_visible => app.table_prev(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TABLE_ROWS_TOP;
    use crate::catalog::parse_catalog;

    fn loaded_app() -> App {
        let products = parse_catalog(
            r#"{"products": [
                {"id": 1, "title": "Apple Watch", "description": "wearable"},
                {"id": 2, "title": "Samsung TV", "description": "4k display"}
            ]}"#,
        )
        .unwrap();
        let mut app = App::new("₱");
        app.update_page_size(40);
        app.finish_loading(Ok(products));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, row: u16) {
        handle_mouse(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 10,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    #[test]
    fn test_search_typing_and_clear() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Editing);

        type_str(&mut app, "tv");
        assert_eq!(app.search, "tv");
        assert_eq!(app.filtered_indices, vec![1]);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search, "t");

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(app.search, "");

        type_str(&mut app, "tv");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search, "tv");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.search, "");
        assert_eq!(app.filtered_indices, vec![0, 1]);
    }

    #[test]
    fn test_question_mark_is_typed_while_editing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('?'));
        assert!(!app.show_help);
        assert_eq!(app.search, "?");
    }

    #[test]
    fn test_enter_selects_and_keys_dismiss() {
        for dismiss_key in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Enter] {
            let mut app = loaded_app();
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Enter);
            assert!(app.overlay_visible);
            assert_eq!(app.selected_product().map(|p| p.id), Some(2));

            press(&mut app, dismiss_key);
            assert!(!app.overlay_visible);
            assert!(!app.should_quit);
        }
    }

    #[test]
    fn test_click_selects_and_click_dismisses() {
        let mut app = loaded_app();
        click(&mut app, TABLE_ROWS_TOP);
        assert!(app.overlay_visible);
        assert_eq!(app.selected_product().map(|p| p.id), Some(1));

        click(&mut app, TABLE_ROWS_TOP + 5);
        assert!(!app.overlay_visible);
    }

    #[test]
    fn test_click_while_editing_leaves_search_bar() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        click(&mut app, TABLE_ROWS_TOP);
        assert!(app.overlay_visible);
        assert_eq!(app.input_mode, InputMode::Normal);

        // Keys now reach the overlay, not the search bar.
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.search, "");
        assert_eq!(app.filtered_indices, vec![0, 1]);

        press(&mut app, KeyCode::Esc);
        assert!(!app.overlay_visible);
    }

    #[test]
    fn test_help_toggle_and_quit() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
