//! SH1106 OLED display driver
//!
//! Binds 128x64 SH1106-based OLEDs on blocking I2C to the
//! [`PagedDisplay`] protocol from `glint-core`: 8 pages of 128
//! columns, written through begin/stream/end sessions. A session's
//! data bytes are batched locally and go out as one I2C transfer when
//! the session ends.
//!
//! Bus errors on the protocol path are swallowed: the paged protocol
//! is infallible by contract, and a failed transfer just leaves stale
//! pixels until the next redraw. [`init`](Sh1106::init) reports
//! errors, since a display that never answered is worth knowing about
//! at startup.

#![no_std]

mod font;

pub use font::Font5x8;

use embedded_hal::i2c::I2c;
use glint_core::display::PagedDisplay;
use heapless::Vec;

/// SH1106 I2C address (0x3C, or 0x3D with the address pin high).
pub const DEFAULT_ADDRESS: u8 = 0x3C;

const WIDTH: usize = 128;
const PAGES: usize = 8;

/// The SH1106 RAM is 132 columns wide; a 128-column panel sits
/// centered, so visible column 0 is RAM column 2.
const COLUMN_OFFSET: u8 = 2;

/// SH1106 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte prefixes for I2C transfers.
const CONTROL_CMD: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    address: u8,
    /// Data bytes of the open page session, including the data-mode
    /// control prefix. Flushed by `end_write`.
    pending: Vec<u8, { WIDTH + 1 }>,
}

impl<I2C> Sh1106<I2C>
where
    I2C: I2c,
{
    /// Create a driver at the default I2C address.
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            pending: Vec::new(),
        }
    }

    /// Power up and configure the panel.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE | 0x00,
            cmd::SET_CHARGE_PUMP,
            0x14,                  // Enable charge pump
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF, // High contrast
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }

        Ok(())
    }

    /// Set display contrast (0-255).
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), I2C::Error> {
        self.command(cmd::SET_CONTRAST)?;
        self.command(contrast)
    }

    /// Turn the panel on or off.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), I2C::Error> {
        if on {
            self.command(cmd::DISPLAY_ON)
        } else {
            self.command(cmd::DISPLAY_OFF)
        }
    }

    /// Invert display colors.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), I2C::Error> {
        if inverted {
            self.command(cmd::SET_INVERSE)
        } else {
            self.command(cmd::SET_NORMAL)
        }
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, c: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[CONTROL_CMD, c])
    }
}

impl<I2C> PagedDisplay for Sh1106<I2C>
where
    I2C: I2c,
{
    const PAGES: u8 = PAGES as u8;
    const COLUMNS: u8 = WIDTH as u8;

    fn begin_write(&mut self, start_col: u8, page: u8) {
        let col = start_col + COLUMN_OFFSET;
        let _ = self.command(cmd::SET_PAGE_ADDR | (page & 0x07));
        let _ = self.command(cmd::SET_LOW_COLUMN | (col & 0x0F));
        let _ = self.command(cmd::SET_HIGH_COLUMN | (col >> 4));
        self.pending.clear();
        // Infallible: capacity is one byte past the full page width.
        let _ = self.pending.push(CONTROL_DATA);
    }

    fn write_byte(&mut self, b: u8) {
        // Bytes past the device width have nowhere to go; the protocol
        // contract puts staying in range on the caller.
        let _ = self.pending.push(b);
    }

    fn end_write(&mut self) {
        if self.pending.len() > 1 {
            let _ = self.i2c.write(self.address, &self.pending);
        }
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::i2c::{ErrorType, Operation};

    /// Logs every I2C write issued by the driver.
    #[derive(Default)]
    struct BusLog {
        writes: Vec<(u8, Vec<u8, { WIDTH + 4 }>), 64>,
    }

    impl ErrorType for BusLog {
        type Error = Infallible;
    }

    impl I2c for BusLog {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    let mut logged = Vec::new();
                    logged.extend_from_slice(bytes).unwrap();
                    self.writes.push((address, logged)).unwrap();
                }
            }
            Ok(())
        }
    }

    fn driver() -> Sh1106<BusLog> {
        Sh1106::new(BusLog::default())
    }

    #[test]
    fn test_init_command_stream() {
        let mut d = driver();
        d.init().unwrap();
        let bus = d.release();

        assert_eq!(bus.writes.first().unwrap().1.as_slice(), &[0x00, 0xAE]);
        assert_eq!(bus.writes.last().unwrap().1.as_slice(), &[0x00, 0xAF]);
        for (addr, w) in &bus.writes {
            assert_eq!(*addr, DEFAULT_ADDRESS);
            assert_eq!(w[0], 0x00); // all commands
        }
    }

    #[test]
    fn test_begin_write_addresses_page_and_column() {
        let mut d = driver();
        d.begin_write(5, 3);
        let bus = d.release();

        // Visible column 5 is RAM column 7.
        assert_eq!(bus.writes[0].1.as_slice(), &[0x00, 0xB3]);
        assert_eq!(bus.writes[1].1.as_slice(), &[0x00, 0x07]);
        assert_eq!(bus.writes[2].1.as_slice(), &[0x00, 0x10]);
    }

    #[test]
    fn test_high_column_nibble() {
        let mut d = driver();
        d.begin_write(100, 0);
        let bus = d.release();

        // RAM column 102 = 0x66.
        assert_eq!(bus.writes[1].1.as_slice(), &[0x00, 0x06]);
        assert_eq!(bus.writes[2].1.as_slice(), &[0x00, 0x16]);
    }

    #[test]
    fn test_session_batches_data_into_one_transfer() {
        let mut d = driver();
        d.begin_write(0, 0);
        d.write_byte(0x11);
        d.write_byte(0x22);
        d.write_byte(0x33);
        d.end_write();
        let bus = d.release();

        assert_eq!(bus.writes.len(), 4); // 3 addressing commands + data
        assert_eq!(bus.writes[3].1.as_slice(), &[0x40, 0x11, 0x22, 0x33]);
    }

    #[test]
    fn test_empty_session_sends_no_data() {
        let mut d = driver();
        d.begin_write(0, 0);
        d.end_write();
        let bus = d.release();

        assert_eq!(bus.writes.len(), 3); // addressing only
    }

    #[test]
    fn test_clear_page_helper_through_protocol() {
        let mut d = driver();
        d.clear_page(0, 127, 1, 0x00);
        let bus = d.release();

        let data = &bus.writes.last().unwrap().1;
        assert_eq!(data.len(), 1 + 128);
        assert_eq!(data[0], 0x40);
        assert!(data[1..].iter().all(|&b| b == 0));
    }
}
