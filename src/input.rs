//! Input plumbing: event types, click targets, and pixel-to-cell conversion.
//!
//! Renderers register targets each frame; the mouse handler converts the
//! pointer position to a terminal cell and asks `hit_test` which action it hit.

use ratzilla::ratatui::layout::Rect;

/// Keyboard and pointer input, normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard.
    Key(char),
    /// A click/tap on a registered target, identified by its action ID.
    Click(u16),
}

/// A region on screen that triggers an action when tapped.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared between the render loop (writes targets) and the mouse handler
/// (reads them).
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame at the given terminal size.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Register a full-width row of `area`. Rows outside the area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register targets for a row of tabs laid out left to right.
    ///
    /// `tab_widths` holds `(display_width, action_id)` per padded label.
    /// Each target covers its label plus half of each neighbouring separator;
    /// the first tab reaches the left edge and the last tab the right edge.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        area: Rect,
    ) {
        let n = tab_widths.len();
        if n == 0 || area.width == 0 {
            return;
        }

        let mut bounds = Vec::with_capacity(n);
        let mut cursor = 0u16;
        for &(w, _) in tab_widths {
            bounds.push((cursor, cursor + w));
            cursor += w + separator_width;
        }

        for (i, &(_, action_id)) in tab_widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                bounds[i].0 - separator_width / 2 - separator_width % 2
            };
            let right = if i == n - 1 {
                area.width
            } else {
                (bounds[i].1 + separator_width / 2).min(area.width)
            };
            if right > left {
                self.add_click_target(
                    Rect::new(area.x + left, area.y, right - left, area.height),
                    action_id,
                );
            }
        }
    }

    /// Action at a terminal cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Convert a pointer position relative to the grid's top-left corner,
    /// given the grid's pixel size, into a terminal cell.
    pub fn cell_at(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<(u16, u16)> {
        let col = pixel_to_cell(x, grid_width, self.terminal_cols)?;
        let row = pixel_to_cell(y, grid_height, self.terminal_rows)?;
        Some((col, row))
    }
}

/// Narrow screens stack the panels vertically.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 70
}

/// Map a pixel offset along one axis to a cell index.
fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 || !offset.is_finite() {
        return None;
    }
    let cell = (offset / (extent / f64::from(cells))) as u16;
    (cell < cells).then_some(cell)
}
