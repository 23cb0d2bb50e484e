//! HD44780 character LCD driver
//!
//! Driver for 16x2 HD44780-based displays behind a PCF8574 I2C backpack.
//! The controller runs in 4-bit mode; every nibble is one I2C write that
//! pulses the enable line.
//!
//! Backpack wiring (PCF8574 bit -> LCD pin):
//! - P0: RS
//! - P1: RW (held low, write only)
//! - P2: E
//! - P3: backlight
//! - P4-P7: D4-D7

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Common backpack address (0x3F on PCF8574A boards)
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Characters per line
pub const COLUMNS: usize = 16;
/// Number of lines
pub const ROWS: u8 = 2;

/// Backpack control bits
mod bits {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// HD44780 commands
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    /// Increment cursor, no display shift
    pub const ENTRY_MODE: u8 = 0x06;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// 4-bit bus, 2 lines, 5x8 font
    pub const FUNCTION_SET: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

/// Shown in place of characters the display ROM cannot render
const REPLACEMENT: u8 = b'?';

/// HD44780 LCD on a PCF8574 backpack
pub struct Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new LCD driver
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Initialize the display
    ///
    /// Forces the controller into 4-bit mode from any power-on state, then
    /// clears it with the cursor hidden.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        // Wait for Vcc to settle
        self.delay.delay_ms(50);

        // Three times 8-bit mode, then switch to 4-bit
        self.write_nibble(0x03 << 4, 0)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x03 << 4, 0)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x03 << 4, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02 << 4, 0)?;

        self.command(cmd::FUNCTION_SET)?;
        self.command(cmd::DISPLAY_ON)?;
        self.clear()?;
        self.command(cmd::ENTRY_MODE)?;
        self.command(cmd::HOME)?;
        self.delay.delay_us(2_000);

        Ok(())
    }

    /// Clear the whole display
    pub fn clear(&mut self) -> Result<(), I2C::Error> {
        self.command(cmd::CLEAR)?;
        self.delay.delay_us(2_000);
        Ok(())
    }

    /// Write `text` to `row`, padded with spaces or truncated to 16 columns
    ///
    /// Rows past the last one are ignored.
    pub fn write_line(&mut self, row: u8, text: &str) -> Result<(), I2C::Error> {
        let Some(&offset) = ROW_OFFSETS.get(usize::from(row)) else {
            return Ok(());
        };

        let mut line = [b' '; COLUMNS];
        for (slot, ch) in line.iter_mut().zip(text.chars()) {
            *slot = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                REPLACEMENT
            };
        }

        self.command(cmd::SET_DDRAM | offset)?;
        for byte in line {
            self.write_byte(byte, bits::RS)?;
        }

        Ok(())
    }

    /// Send an instruction
    fn command(&mut self, value: u8) -> Result<(), I2C::Error> {
        self.write_byte(value, 0)?;
        // Most instructions take 37us
        self.delay.delay_us(50);
        Ok(())
    }

    /// Send a byte as two nibbles, high first
    fn write_byte(&mut self, value: u8, mode: u8) -> Result<(), I2C::Error> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble(value << 4, mode)
    }

    /// Latch one nibble (in the upper four bits) with an enable pulse
    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), I2C::Error> {
        let data = (nibble & 0xF0) | mode | bits::BACKLIGHT;
        self.i2c.write(self.address, &[data | bits::EN, data])
    }
}
