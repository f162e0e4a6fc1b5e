//! Scrolling text console
//!
//! Turns a paged monochrome display into a text-only terminal with
//! autoscrolling. Characters go into a fixed ring of row buffers, one
//! per display page; nothing touches the device until [`redraw`] is
//! called, and a redraw only happens when the buffer actually changed.
//!
//! There is no off-device framebuffer: a redraw renders each row and
//! then erases the columns after it, so stale pixels from a previously
//! longer line never survive.
//!
//! [`redraw`]: Console::redraw

use heapless::String;

use crate::display::{GlyphSource, PagedDisplay, TextStyle};

/// Text console over a page-addressed display.
///
/// `PAGES` must equal `D::PAGES`; `ROW_CHARS` is the per-row character
/// capacity, normally `D::COLUMNS / 4` (no glyph is narrower than
/// 3 pixels plus the gap). Both are const parameters because the row
/// arena is sized statically; [`Console::new`] checks them against the
/// device geometry.
///
/// One console owns one device binding. Construct it at startup and
/// pass it by reference to whoever prints.
pub struct Console<D, G, const PAGES: usize, const ROW_CHARS: usize> {
    display: D,
    font: G,
    rows: [String<ROW_CHARS>; PAGES],
    cursor_row: usize,
    cursor_col: usize,
    /// Accumulated pixel width of the active row, including one gap
    /// column per glyph. Drives the wrap decision.
    row_width: u16,
    /// Completed rows above the active one. Saturates at `PAGES - 1`
    /// once the ring wraps, so active + above never exceed the page
    /// count.
    rows_above: usize,
    dirty: bool,
}

impl<D, G, const PAGES: usize, const ROW_CHARS: usize> Console<D, G, PAGES, ROW_CHARS>
where
    D: PagedDisplay,
    G: GlyphSource,
{
    pub fn new(display: D, font: G) -> Self {
        debug_assert_eq!(PAGES, D::PAGES as usize);
        debug_assert!(ROW_CHARS >= D::COLUMNS as usize / 4);
        Self {
            display,
            font,
            rows: core::array::from_fn(|_| String::new()),
            cursor_row: 0,
            cursor_col: 0,
            row_width: 0,
            rows_above: 0,
            dirty: false,
        }
    }

    /// Write one character into the buffer.
    ///
    /// Printable characters append to the active row, wrapping to a
    /// fresh row first when either the character capacity or the pixel
    /// budget would be exceeded. `\n` feeds a line, `\r` returns the
    /// cursor to column 0 so the row gets overwritten in place. Other
    /// control characters are ignored.
    pub fn write_char(&mut self, ch: char) {
        if ch >= ' ' {
            let width = self.font.width(ch);
            if self.cursor_col >= ROW_CHARS || self.row_width + width as u16 >= D::COLUMNS as u16 {
                self.line_feed();
            }
            let row = &mut self.rows[self.cursor_row];
            // After a carriage return the cursor sits inside old text;
            // appending drops everything from the cursor on.
            row.truncate(self.cursor_col);
            if row.push(ch).is_ok() {
                self.cursor_col = row.len();
                self.row_width += width as u16 + 1; // 1px inter-glyph gap
                self.dirty = true;
            }
        } else if ch == '\n' {
            self.line_feed();
        } else if ch == '\r' {
            self.cursor_col = 0;
            self.row_width = 0;
        }
    }

    /// Write every character of `text` in order.
    pub fn print(&mut self, text: &str) {
        for ch in text.chars() {
            self.write_char(ch);
        }
    }

    /// Advance to a fresh row, scrolling the ring.
    fn line_feed(&mut self) {
        self.cursor_col = 0;
        self.row_width = 0;
        self.cursor_row = (self.cursor_row + 1) % PAGES;
        if self.rows_above < PAGES - 1 {
            self.rows_above += 1;
        }
        // The ring reuses the oldest row; it starts over empty.
        self.rows[self.cursor_row].clear();
        self.dirty = true;
    }

    /// Empty the buffer without touching the device.
    ///
    /// The blank state reaches the screen on the next [`redraw`].
    ///
    /// [`redraw`]: Console::redraw
    pub fn clear(&mut self) {
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.row_width = 0;
        self.rows_above = 0;
        for row in &mut self.rows {
            row.clear();
        }
        self.dirty = true;
    }

    /// Transfer the buffer to the device if it changed.
    ///
    /// Rows are drawn oldest-first, top to bottom, the active row last.
    /// After each row the remaining columns of that page are cleared,
    /// which erases leftovers of any longer line previously shown
    /// there.
    pub fn redraw(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        for page in 0..PAGES {
            let logical = (self.cursor_row + PAGES - self.rows_above + page) % PAGES;
            let consumed = self.font.draw(
                &mut self.display,
                0,
                page as u8,
                D::COLUMNS,
                self.rows[logical].as_str(),
                TextStyle::default(),
            );
            if consumed < D::COLUMNS {
                self.display.clear_page(consumed, D::COLUMNS - 1, page as u8, 0);
            }
        }
    }

    /// The text a redraw would show at physical page `page`: the
    /// oldest retained row at page 0, the active row last.
    pub fn line(&self, page: usize) -> &str {
        let logical = (self.cursor_row + PAGES - self.rows_above + page) % PAGES;
        self.rows[logical].as_str()
    }

    /// Rows currently holding content: the active row plus the
    /// completed rows above it. Never exceeds the page count.
    pub fn filled_rows(&self) -> usize {
        self.rows_above + 1
    }

    /// True if the buffer differs from what the device shows.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The underlying display, e.g. for contrast control.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Give the display and glyph source back.
    pub fn release(self) -> (D, G) {
        (self.display, self.font)
    }
}

impl<D, G, const PAGES: usize, const ROW_CHARS: usize> core::fmt::Write
    for Console<D, G, PAGES, ROW_CHARS>
where
    D: PagedDisplay,
    G: GlyphSource,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.print(s);
        Ok(())
    }
}
