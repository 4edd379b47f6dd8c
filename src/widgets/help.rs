/// Scrollable key binding reference

use crate::utils::{help_keybindings, HelpCommand};

use super::table::{Scrollable, TableModel, TextRow};

#[derive(Debug, Clone)]
pub struct HelpMenu {
    command: HelpCommand,
    table: TableModel<TextRow>,
}

impl HelpMenu {
    pub fn new(command: HelpCommand) -> Self {
        let rows = help_keybindings(command).into_iter().map(|l| TextRow::new([l])).collect();
        Self { command, table: TableModel::new(["Keybindings"]).with_rows(rows) }
    }

    pub fn command(&self) -> HelpCommand {
        self.command
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.table.visible_rows().map(|(_, r)| r.0[0].as_str())
    }

    /// Longest line, used to size the popup
    pub fn width(&self) -> usize {
        help_keybindings(self.command).iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    pub fn set_visible_height(&mut self, height: usize) {
        self.table.set_visible_height(height);
    }
}

impl Scrollable for HelpMenu {
    fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn selected(&self) -> usize {
        self.table.selected()
    }

    fn visible_height(&self) -> usize {
        self.table.visible_height()
    }

    // Help has no cursor: moving the selection moves the window
    fn scroll_by(&mut self, delta: isize) {
        let height = self.visible_height() as isize;
        let sel = self.selected() as isize;
        let top = self.table.top() as isize;
        let target = if delta < 0 { top + delta } else { top + height - 1 + delta };
        self.table.scroll_by(target - sel);
    }

    fn scroll_to_index(&mut self, idx: usize) {
        self.table.scroll_to_index(idx);
    }

    fn enable_cursor(&mut self) {}

    fn disable_cursor(&mut self) {}

    fn cursor_enabled(&self) -> bool {
        false
    }
}
