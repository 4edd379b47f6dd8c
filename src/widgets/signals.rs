/// Signal list shown by the kill prompt

use crate::utils::SIGNALS;

use super::table::{Scrollable, TableModel, TextRow};

#[derive(Debug, Clone)]
pub struct SignalList {
    table: TableModel<TextRow>,
}

impl Default for SignalList {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalList {
    pub fn new() -> Self {
        let rows = SIGNALS
            .iter()
            .map(|(num, name, desc)| TextRow::new([num.to_string(), name.to_string(), desc.to_string()]))
            .collect();
        let mut table = TableModel::new(["#", "Signal", "Description"]).with_rows(rows);
        table.enable_cursor();
        Self { table }
    }

    pub fn table(&self) -> &TableModel<TextRow> {
        &self.table
    }

    /// Number of the highlighted signal
    pub fn selected_signal(&self) -> i32 {
        SIGNALS
            .get(self.table.selected())
            .map(|(num, _, _)| *num)
            .unwrap_or(SIGNALS[0].0)
    }

    /// Highlight signal `number`; returns false when no such signal exists
    pub fn select_by_number(&mut self, number: usize) -> bool {
        if number == 0 || number > SIGNALS.len() {
            return false;
        }
        self.table.scroll_to_index(number - 1);
        true
    }

    pub fn reset(&mut self) {
        self.table.scroll_top();
    }

    pub fn set_visible_height(&mut self, height: usize) {
        self.table.set_visible_height(height);
    }
}

impl Scrollable for SignalList {
    fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn selected(&self) -> usize {
        self.table.selected()
    }

    fn visible_height(&self) -> usize {
        self.table.visible_height()
    }

    fn scroll_by(&mut self, delta: isize) {
        self.table.scroll_by(delta);
    }

    fn scroll_to_index(&mut self, idx: usize) {
        self.table.scroll_to_index(idx);
    }

    fn enable_cursor(&mut self) {
        self.table.enable_cursor();
    }

    fn disable_cursor(&mut self) {
        self.table.disable_cursor();
    }

    fn cursor_enabled(&self) -> bool {
        self.table.cursor_enabled()
    }
}
