use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use tracing::info;

use super::tab::Tab;
use crate::app::{LoadOutcome, LoadState, LoadStatus};
use crate::directory::{BiodataView, InfografikView, PageSize, Record};

/// Whether keystrokes go to the search box or to commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    None,
    Reload,
    Quit,
}

/// Application state
pub struct App {
    /// Is the app running?
    pub running: bool,
    /// Current dataset and load status
    pub load: LoadState,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub biodata: BiodataView,
    pub infografik: InfografikView,
    /// Selected row within the current page
    pub table_state: TableState,
    /// Detail popup for the selected row
    pub detail_open: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Where the sheet is read from, for the loading view
    pub source_location: String,
    /// "Tambah Guru" form link
    pub form_url: Option<String>,
}

impl App {
    /// Create a new app instance with an empty dataset
    pub fn new(source_location: String, form_url: Option<String>, page_size: PageSize) -> Self {
        let load = LoadState::new();
        let dataset = load.dataset();

        Self {
            running: true,
            biodata: BiodataView::new(dataset.clone(), page_size),
            infografik: InfografikView::new(dataset),
            load,
            tab: Tab::default(),
            input_mode: InputMode::default(),
            table_state: TableState::default(),
            detail_open: false,
            status_message: None,
            source_location,
            form_url,
        }
    }

    /// Mark a fetch as started and return its ticket
    pub fn begin_load(&mut self) -> u64 {
        self.clear_status();
        self.load.begin()
    }

    /// Apply a finished fetch; views pick up the new snapshot
    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        if self.load.apply(outcome) {
            let dataset = self.load.dataset();
            info!("Showing {} records", dataset.len());
            self.biodata.set_dataset(dataset.clone());
            self.infografik.set_dataset(dataset);
            self.detail_open = false;
            self.reset_row_selection();
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Record under the row cursor, if the page has any rows
    pub fn selected_record(&self) -> Option<&Record> {
        let row = self.table_state.selected()?;
        self.biodata.page_records().get(row).copied()
    }

    fn reset_row_selection(&mut self) {
        let has_rows = !self.biodata.page().items.is_empty();
        self.table_state.select(if has_rows { Some(0) } else { None });
    }

    fn move_row(&mut self, down: bool) {
        let rows = self.biodata.page().items.len();
        if rows == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(rows - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return KeyOutcome::Quit;
        }

        match self.load.status() {
            LoadStatus::Idle | LoadStatus::Loading => return self.handle_loading_key(key),
            LoadStatus::Failed(_) => return self.handle_error_key(key),
            LoadStatus::Ready => {}
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key);
            return KeyOutcome::None;
        }

        if self.detail_open {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail_open = false;
            }
            return KeyOutcome::None;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return KeyOutcome::Quit;
            }
            KeyCode::Char('r') => return KeyOutcome::Reload,
            KeyCode::Tab => self.tab = self.tab.cycle(),
            KeyCode::BackTab => self.tab = self.tab.cycle_reverse(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(tab) = Tab::from_digit(c) {
                    self.tab = tab;
                }
            }
            _ => match self.tab {
                Tab::Biodata => self.handle_biodata_key(key),
                Tab::Infografik => self.handle_infografik_key(key),
                Tab::TambahGuru => {}
            },
        }

        KeyOutcome::None
    }

    fn handle_loading_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Char('q') {
            self.quit();
            return KeyOutcome::Quit;
        }
        KeyOutcome::None
    }

    fn handle_error_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                KeyOutcome::Quit
            }
            KeyCode::Char('r') => KeyOutcome::Reload,
            KeyCode::Esc => {
                self.load.dismiss_error();
                self.reset_row_selection();
                KeyOutcome::None
            }
            _ => KeyOutcome::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.biodata.pop_search();
                self.reset_row_selection();
            }
            KeyCode::Char(c) => {
                self.biodata.push_search(c);
                self.reset_row_selection();
            }
            _ => {}
        }
    }

    fn handle_biodata_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                return;
            }
            KeyCode::Char('g') => self.biodata.cycle_grade(true),
            KeyCode::Char('G') => self.biodata.cycle_grade(false),
            KeyCode::Char('s') => self.biodata.cycle_specialization(true),
            KeyCode::Char('S') => self.biodata.cycle_specialization(false),
            KeyCode::Char('p') => self.biodata.cycle_page_size(),
            KeyCode::Char('x') => {
                self.biodata.reset();
                self.set_status("Penapis diset semula");
            }
            KeyCode::Right | KeyCode::PageDown => self.biodata.next_page(),
            KeyCode::Left | KeyCode::PageUp => self.biodata.prev_page(),
            KeyCode::Home => self.biodata.first_page(),
            KeyCode::End => self.biodata.last_page(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_row(true);
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_row(false);
                return;
            }
            KeyCode::Enter => {
                self.detail_open = self.selected_record().is_some();
                return;
            }
            _ => return,
        }
        self.reset_row_selection();
    }

    fn handle_infografik_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('g') => self.infografik.cycle_focus(true),
            KeyCode::Char('G') => self.infografik.cycle_focus(false),
            _ => {}
        }
    }
}
