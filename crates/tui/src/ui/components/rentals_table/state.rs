use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::TableState};
use rentals_types::RentalEntity;

/// Rentals listed on the table route.
#[derive(Debug)]
pub struct RentalsTableState {
    rentals: Vec<RentalEntity>,
    pub table_state: TableState,
    loading: bool,
    last_error: Option<String>,
    pub focus: FocusFlag,
    pub last_area: Rect,
}

impl Default for RentalsTableState {
    fn default() -> Self {
        Self {
            rentals: Vec::new(),
            table_state: TableState::default(),
            loading: false,
            last_error: None,
            focus: FocusFlag::new().with_name("rentals_table"),
            last_area: Rect::default(),
        }
    }
}

impl RentalsTableState {
    pub fn rentals(&self) -> &[RentalEntity] {
        &self.rentals
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Replaces the list, keeping the selection within range.
    pub fn set_rentals(&mut self, rentals: Vec<RentalEntity>) {
        self.loading = false;
        self.last_error = None;
        let selected = match (self.table_state.selected(), rentals.len()) {
            (_, 0) => None,
            (Some(index), len) => Some(index.min(len - 1)),
            (None, _) => Some(0),
        };
        self.rentals = rentals;
        self.table_state.select(selected);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.last_error = Some(message.into());
    }

    pub fn selected(&self) -> Option<&RentalEntity> {
        self.table_state.selected().and_then(|index| self.rentals.get(index))
    }

    pub fn select_next(&mut self) {
        self.step(1);
    }

    pub fn select_previous(&mut self) {
        self.step(-1);
    }

    pub fn select_index(&mut self, index: usize) {
        if index < self.rentals.len() {
            self.table_state.select(Some(index));
        }
    }

    fn step(&mut self, delta: isize) {
        let len = self.rentals.len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match self.table_state.selected() {
            Some(index) => index.saturating_add_signed(delta).min(len - 1),
            None => 0,
        };
        self.table_state.select(Some(next));
    }
}

impl HasFocus for RentalsTableState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}
