//! Glyph rendering seam
//!
//! Fonts live in driver crates (or user code); the console only needs
//! to know how wide a character will be and how to draw a run of text
//! through the paged protocol.

use crate::display::PagedDisplay;

/// Pass-through drawing options.
///
/// The console forwards these untouched; only the glyph source
/// interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    /// Horizontal magnification. 1 is natural size.
    pub scale: u8,
    /// XOR mask applied to every emitted column byte. `0xFF` inverts.
    pub xor_mask: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            scale: 1,
            xor_mask: 0,
        }
    }
}

/// Looks up glyph metrics and renders text runs.
pub trait GlyphSource {
    /// Pixel width of `ch` at natural scale, not counting the
    /// inter-glyph gap. Unknown characters report 0 and render as a
    /// zero-cost glyph, never as an error.
    fn width(&self, ch: char) -> u8;

    /// Render `text` starting at `(col, page)`, using at most
    /// `max_width` columns, and return the pixel width consumed.
    fn draw<D: PagedDisplay>(
        &self,
        display: &mut D,
        col: u8,
        page: u8,
        max_width: u8,
        text: &str,
        style: TextStyle,
    ) -> u8;
}

impl<G: GlyphSource> GlyphSource for &G {
    fn width(&self, ch: char) -> u8 {
        (*self).width(ch)
    }

    fn draw<D: PagedDisplay>(
        &self,
        display: &mut D,
        col: u8,
        page: u8,
        max_width: u8,
        text: &str,
        style: TextStyle,
    ) -> u8 {
        (*self).draw(display, col, page, max_width, text, style)
    }
}
