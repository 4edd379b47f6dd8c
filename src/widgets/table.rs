/// Scrollable, sortable table model shared by every list-backed widget
///
/// Selection movement of any kind is a delta on the selected index followed
/// by one clamp-and-rewindow step (`Viewport::settle`).

use std::cmp::Ordering;

use crate::utils::constants::{DOWN_ARROW, UP_ARROW};

/// Emphasis a renderer may give a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Good,
    Warn,
    Bad,
}

/// A row a `TableModel` can display, identify and sort
pub trait TableRow {
    fn cells(&self) -> Vec<String>;

    fn tone(&self, _column: usize) -> Tone {
        Tone::Plain
    }

    /// Key that lets the cursor follow this row across refreshes
    fn unique_key(&self) -> String {
        self.cells().into_iter().next().unwrap_or_default()
    }

    fn compare(&self, other: &Self, column: usize) -> Ordering {
        let a = self.cells();
        let b = other.cells();
        a.get(column).cmp(&b.get(column))
    }
}

/// Navigation capabilities of a list-backed widget
pub trait Scrollable {
    fn row_count(&self) -> usize;
    fn selected(&self) -> usize;
    fn visible_height(&self) -> usize;

    /// Move the selection by `delta` rows, clamped to the rows
    fn scroll_by(&mut self, delta: isize);

    /// Select `idx`; out-of-range indices are ignored
    fn scroll_to_index(&mut self, idx: usize);

    fn enable_cursor(&mut self);
    fn disable_cursor(&mut self);
    fn cursor_enabled(&self) -> bool;

    fn scroll_up(&mut self) {
        self.scroll_by(-1);
    }

    fn scroll_down(&mut self) {
        self.scroll_by(1);
    }

    fn scroll_top(&mut self) {
        self.scroll_by(-(self.selected() as isize));
    }

    fn scroll_bottom(&mut self) {
        let last = self.row_count().saturating_sub(1) as isize;
        self.scroll_by(last - self.selected() as isize);
    }

    fn scroll_half_page_up(&mut self) {
        self.scroll_by(-((self.visible_height() / 2).max(1) as isize));
    }

    fn scroll_half_page_down(&mut self) {
        self.scroll_by((self.visible_height() / 2).max(1) as isize);
    }

    fn scroll_page_up(&mut self) {
        self.scroll_by(-(self.visible_height() as isize));
    }

    fn scroll_page_down(&mut self) {
        self.scroll_by(self.visible_height() as isize);
    }
}

/// Selected row and the first visible row of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub selected: usize,
    pub top: usize,
    pub height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { selected: 0, top: 0, height: 1 }
    }
}

impl Viewport {
    /// Apply a selection delta, then settle
    pub fn shift(&mut self, delta: isize, row_count: usize) {
        self.selected = if delta < 0 {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta as usize)
        };
        self.settle(row_count);
    }

    /// Clamp the selection into the rows and move the window by the least
    /// amount that keeps the selection visible.
    pub fn settle(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = 0;
            self.top = 0;
            return;
        }

        let height = self.height.max(1);
        self.selected = self.selected.min(row_count - 1);

        if self.selected < self.top {
            self.top = self.selected;
        }
        if self.selected >= self.top + height {
            self.top = self.selected + 1 - height;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub ascending: bool,
}

#[derive(Debug, Clone)]
pub struct TableModel<R> {
    header: Vec<String>,
    /// Rows in arrival order; every sort starts from here
    arrived: Vec<R>,
    rows: Vec<R>,
    sort: Option<SortSpec>,
    viewport: Viewport,
    cursor_key: Option<String>,
    show_cursor: bool,
}

impl<R: TableRow + Clone> TableModel<R> {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            arrived: Vec::new(),
            rows: Vec::new(),
            sort: None,
            viewport: Viewport::default(),
            cursor_key: None,
            show_cursor: false,
        }
    }

    pub fn with_rows(mut self, rows: Vec<R>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Replace the rows, re-applying the active sort and keeping the cursor
    /// on the same subject when it is still present.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.arrived = rows;
        self.rebuild();
    }

    /// Sort by `column`, starting from arrival order
    pub fn sort_by(&mut self, column: usize, ascending: bool) {
        if column >= self.header.len() {
            return;
        }
        self.sort = Some(SortSpec { column, ascending });
        self.rebuild();
    }

    /// Drop the sort and return to arrival order
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.rebuild();
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Active sort column, or -1 when unsorted
    pub fn sort_column_index(&self) -> isize {
        self.sort.map(|s| s.column as isize).unwrap_or(-1)
    }

    fn rebuild(&mut self) {
        let mut rows = self.arrived.clone();
        if let Some(SortSpec { column, ascending }) = self.sort {
            rows.sort_by(|a, b| {
                let ord = a.compare(b, column);
                if ascending { ord } else { ord.reverse() }
            });
        }
        self.rows = rows;

        if let Some(key) = &self.cursor_key {
            if let Some(pos) = self.rows.iter().position(|r| &r.unique_key() == key) {
                self.viewport.selected = pos;
            }
        }
        self.settle();
    }

    fn settle(&mut self) {
        self.viewport.settle(self.rows.len());
        self.cursor_key = self.rows.get(self.viewport.selected).map(|r| r.unique_key());
    }

    /// Header with the sort column annotated
    pub fn header(&self) -> Vec<String> {
        let mut header = self.header.clone();
        if let Some(SortSpec { column, ascending }) = self.sort {
            if let Some(h) = header.get_mut(column) {
                let arrow = if ascending { UP_ARROW } else { DOWN_ARROW };
                *h = format!("{} {}", h, arrow);
            }
        }
        header
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&R> {
        self.rows.get(self.viewport.selected)
    }

    pub fn top(&self) -> usize {
        self.viewport.top
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Rows inside the window, with their absolute index
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &R)> {
        self.rows
            .iter()
            .enumerate()
            .skip(self.viewport.top)
            .take(self.viewport.height.max(1))
    }

    pub fn set_visible_height(&mut self, height: usize) {
        self.viewport.height = height.max(1);
        self.settle();
    }

    /// (first visible, last visible, total), 1-based for display
    pub fn location(&self) -> (usize, usize, usize) {
        let total = self.rows.len();
        if total == 0 {
            return (0, 0, 0);
        }
        let first = self.viewport.top + 1;
        let last = (self.viewport.top + self.viewport.height.max(1)).min(total);
        (first, last, total)
    }
}

impl<R: TableRow + Clone> Scrollable for TableModel<R> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn selected(&self) -> usize {
        self.viewport.selected
    }

    fn visible_height(&self) -> usize {
        self.viewport.height
    }

    fn scroll_by(&mut self, delta: isize) {
        self.viewport.shift(delta, self.rows.len());
        self.cursor_key = self.rows.get(self.viewport.selected).map(|r| r.unique_key());
    }

    fn scroll_to_index(&mut self, idx: usize) {
        if idx >= self.rows.len() {
            return;
        }
        let delta = idx as isize - self.viewport.selected as isize;
        self.scroll_by(delta);
    }

    fn enable_cursor(&mut self) {
        self.show_cursor = true;
    }

    fn disable_cursor(&mut self) {
        self.show_cursor = false;
    }

    fn cursor_enabled(&self) -> bool {
        self.show_cursor
    }
}

/// Plain string row, compared cell by cell as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow(pub Vec<String>);

impl TextRow {
    pub fn new<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self(cells.into_iter().map(Into::into).collect())
    }
}

impl TableRow for TextRow {
    fn cells(&self) -> Vec<String> {
        self.0.clone()
    }
}
