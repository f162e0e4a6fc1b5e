//! Paged monochrome display protocol
//!
//! Targets displays with the SSD1306/SH1106 memory layout: the screen
//! is split into horizontal *pages* of 8 pixel rows, and one data byte
//! addresses the 8 vertically stacked pixels of one column within one
//! page.
//!
//! ```text
//!           C C       C
//!           O O  ...  O
//!           L L       L
//!           0 1       N
//!          +-+-+-----+-+
//!          |0|0|     |0|  ROW P * 8
//!          |1|1|     |1|  ROW P * 8 + 1
//!   PAGE P |.|.| ... |.|
//!          |7|7|     |7|  ROW P * 8 + 7
//!          +-+-+-----+-+
//! ```
//!
//! Drivers implement the three primitives (begin, stream, end); the
//! bulk helpers and the [`Console`] are built purely on top of them.

mod console;
mod glyph;

pub use console::Console;
pub use glyph::{GlyphSource, TextStyle};

/// Direct-output protocol of a page-addressed monochrome display.
///
/// The protocol performs no clipping: the caller keeps every write
/// inside the geometry given by [`PAGES`](Self::PAGES) and
/// [`COLUMNS`](Self::COLUMNS). Every `begin_write` must be paired with
/// an `end_write`; use [`write_page`](Self::write_page) to get that
/// pairing enforced by a scoped session.
pub trait PagedDisplay {
    /// Number of 8-pixel-tall pages.
    const PAGES: u8;

    /// Number of pixel columns per page.
    const COLUMNS: u8;

    /// Position the device's write cursor at `(start_col, page)` and
    /// open a data transfer.
    fn begin_write(&mut self, start_col: u8, page: u8);

    /// Stream one column of pixel data into the open transfer.
    fn write_byte(&mut self, b: u8);

    /// Close the transfer, leaving the device address pointer in a
    /// defined state.
    fn end_write(&mut self);

    /// Open a write session that cannot be left unclosed: the transfer
    /// ends when the returned guard drops, on every exit path.
    fn write_page(&mut self, start_col: u8, page: u8) -> PageWrite<'_, Self>
    where
        Self: Sized,
    {
        self.begin_write(start_col, page);
        PageWrite { display: self }
    }

    /// Fill the columns `start_col..=end_col` of one page with `data`.
    ///
    /// `data` is expected to hold at least `end_col - start_col + 1`
    /// bytes; extra bytes are ignored.
    fn fill_page(&mut self, start_col: u8, end_col: u8, page: u8, data: &[u8])
    where
        Self: Sized,
    {
        let mut session = self.write_page(start_col, page);
        for (_, &b) in (start_col..=end_col).zip(data) {
            session.write(b);
        }
    }

    /// Fill the columns `start_col..=end_col` of one page with a
    /// constant byte.
    fn clear_page(&mut self, start_col: u8, end_col: u8, page: u8, filler: u8)
    where
        Self: Sized,
    {
        let mut session = self.write_page(start_col, page);
        for _ in start_col..=end_col {
            session.write(filler);
        }
    }

    /// Fill the page-aligned rectangle spanned by `(start_col,
    /// start_page)` and `(end_col, end_page)`, one session per page.
    fn clear_region(&mut self, start_col: u8, start_page: u8, end_col: u8, end_page: u8, filler: u8)
    where
        Self: Sized,
    {
        for page in start_page..=end_page {
            self.clear_page(start_col, end_col, page, filler);
        }
    }
}

/// An open page-write session.
///
/// Created by [`PagedDisplay::write_page`]. Closes the transfer when
/// dropped, so a `begin_write` can never be left dangling.
pub struct PageWrite<'a, D: PagedDisplay> {
    display: &'a mut D,
}

impl<D: PagedDisplay> PageWrite<'_, D> {
    /// Stream one column byte.
    pub fn write(&mut self, b: u8) {
        self.display.write_byte(b);
    }

    /// Stream a run of column bytes.
    pub fn write_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.display.write_byte(b);
        }
    }
}

impl<D: PagedDisplay> Drop for PageWrite<'_, D> {
    fn drop(&mut self) {
        self.display.end_write();
    }
}
