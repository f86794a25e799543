use tracing::{info, warn};

use crate::catalog::{CatalogError, Product};

pub const NO_RESULTS_NOTICE: &str = "No products matched your search keyword.";

/// Terminal rows taken by everything except table rows:
/// header(3) + search(3) + table borders(2) + column header(1) + status(1).
pub const TABLE_OVERHEAD: u16 = 10;

/// First terminal row holding a product row.
pub const TABLE_ROWS_TOP: u16 = 8;

/// Each product row shows the title and the description on separate lines.
pub const ROW_HEIGHT: u16 = 2;

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Progress of the one-shot catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Indices of the products whose title or description contains `query`,
/// ignoring case, in catalog order.
pub fn filter_indices(catalog: &[Product], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .enumerate()
        .filter(|(_, product)| product.matches(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub currency_symbol: String,
    pub load_state: LoadState,

    pub catalog: Vec<Product>,
    pub filtered_indices: Vec<usize>,
    pub search: String,

    // Table paging
    pub table_selected: usize, // Index within visible page
    pub table_offset: usize,   // Offset into filtered_indices
    pub page_size: usize,

    // Detail overlay
    pub selected: Option<usize>, // Index into catalog
    pub overlay_visible: bool,

    pub status_msg: String,
}

impl App {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            currency_symbol: currency_symbol.into(),
            load_state: LoadState::Loading,

            catalog: Vec::new(),
            filtered_indices: Vec::new(),
            search: String::new(),

            table_selected: 0,
            table_offset: 0,
            page_size: 10, // Replaced on first resize

            selected: None,
            overlay_visible: false,

            status_msg: "Loading catalog...".to_string(),
        }
    }

    /// Publish the fetch result. Runs once per session.
    pub fn finish_loading(&mut self, result: Result<Vec<Product>, CatalogError>) {
        match result {
            Ok(products) => {
                info!(count = products.len(), "catalog published");
                self.catalog = products;
                self.load_state = LoadState::Loaded;
                let query = std::mem::take(&mut self.search);
                self.apply_filter(&query);
                self.status_msg = format!("{} products loaded", self.catalog.len());
            }
            Err(e) => {
                warn!(error = %e, "catalog load failed");
                self.load_state = LoadState::Failed(e.user_message());
                self.status_msg = "Catalog unavailable".to_string();
            }
        }
    }

    /// Record `query` as typed and recompute the filtered view.
    pub fn apply_filter(&mut self, query: &str) {
        self.search = query.to_string();
        self.filtered_indices = filter_indices(&self.catalog, query);

        self.table_offset = 0;
        self.table_selected = 0;

        self.status_msg = format!(
            "{} products found for \"{}\"",
            self.filtered_indices.len(),
            if self.search.is_empty() { "all" } else { &self.search }
        );
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter("");
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut query = self.search.clone();
        query.push(c);
        self.apply_filter(&query);
    }

    pub fn pop_search_char(&mut self) {
        let mut query = self.search.clone();
        if query.pop().is_some() {
            self.apply_filter(&query);
        }
    }

    /// Products in the filtered view, in catalog order.
    pub fn filtered_products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.filtered_indices
            .iter()
            .filter_map(|&idx| self.catalog.get(idx))
    }

    /// Catalog indices on the current table page.
    pub fn visible_rows(&self) -> &[usize] {
        let start = self.table_offset.min(self.filtered_indices.len());
        let end = (start + self.page_size).min(self.filtered_indices.len());
        &self.filtered_indices[start..end]
    }

    /// Position of the table cursor within the filtered view.
    pub fn cursor(&self) -> usize {
        self.table_offset + self.table_selected
    }

    /// Show the detail overlay for the product at `catalog_index`.
    pub fn select(&mut self, catalog_index: usize) {
        self.selected = Some(catalog_index);
        self.overlay_visible = true;
    }

    pub fn select_highlighted(&mut self) {
        if let Some(&idx) = self.filtered_indices.get(self.cursor()) {
            self.select(idx);
        }
    }

    /// Hide the overlay. The selection is kept.
    pub fn dismiss(&mut self) {
        self.overlay_visible = false;
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected.and_then(|idx| self.catalog.get(idx))
    }

    /// Update page size based on terminal height.
    pub fn update_page_size(&mut self, terminal_height: u16) {
        let rows = terminal_height.saturating_sub(TABLE_OVERHEAD) / ROW_HEIGHT;
        let cursor = self.cursor();
        self.page_size = (rows as usize).max(1);
        self.table_offset = (cursor / self.page_size) * self.page_size;
        self.table_selected = cursor - self.table_offset;
    }

    /// Map a terminal row to a row index on the current page.
    pub fn row_at(&self, y: u16) -> Option<usize> {
        let row = (y.checked_sub(TABLE_ROWS_TOP)? / ROW_HEIGHT) as usize;
        (row < self.visible_rows().len()).then_some(row)
    }

    /// Mouse click on a table row: highlight it and open the overlay.
    pub fn click_row(&mut self, row: usize) {
        if row < self.visible_rows().len() {
            self.table_selected = row;
            self.select_highlighted();
        }
    }

    /// Move selection down in the table.
    pub fn table_next(&mut self) {
        let visible = self.visible_rows().len();
        if visible == 0 {
            return;
        }
        if self.table_selected + 1 < visible {
            self.table_selected += 1;
        } else {
            // Next page
            let new_offset = self.table_offset + self.page_size;
            if new_offset < self.filtered_indices.len() {
                self.table_offset = new_offset;
                self.table_selected = 0;
            }
        }
    }

    /// Move selection up in the table.
    pub fn table_prev(&mut self) {
        if self.table_selected > 0 {
            self.table_selected -= 1;
        } else if self.table_offset > 0 {
            // Prev page
            self.table_offset = self.table_offset.saturating_sub(self.page_size);
            self.table_selected = self.visible_rows().len().saturating_sub(1);
        }
    }

    pub fn table_page_down(&mut self) {
        let new_offset = self.table_offset + self.page_size;
        if new_offset < self.filtered_indices.len() {
            self.table_offset = new_offset;
            self.table_selected = 0;
        } else {
            self.table_last();
        }
    }

    pub fn table_page_up(&mut self) {
        self.table_offset = self.table_offset.saturating_sub(self.page_size);
        self.table_selected = 0;
    }

    pub fn table_first(&mut self) {
        self.table_offset = 0;
        self.table_selected = 0;
    }

    pub fn table_last(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        let last = self.filtered_indices.len() - 1;
        self.table_offset = (last / self.page_size) * self.page_size;
        self.table_selected = last - self.table_offset;
    }
}
