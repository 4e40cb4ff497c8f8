use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::sender::SendCommand;

use super::Lcd;

/// Text output at the cursor.
///
/// Bytes go to the display untouched: a `0x7C` or `0x1B` inside the text starts a
/// command. Every call reports the requested length, whatever the bus did;
/// see [`Lcd::last_delivery`] for the real outcome.
impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Delayer: DelayNs,
{
    /// Write one byte (a character code) at the cursor
    pub fn write_byte(&mut self, byte: u8) -> usize {
        self.send_raw(&[byte], self.timing.byte_ms);
        self.delayer.delay_ms(self.timing.byte_tail_ms);
        1
    }

    /// Write a buffer of character codes in one transaction
    pub fn print_bytes(&mut self, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            self.send_nothing();
            return 0;
        }

        self.send_raw(bytes, self.timing.buffer_ms);
        self.delayer.delay_ms(self.timing.buffer_tail_ms);
        bytes.len()
    }

    #[allow(missing_docs)]
    pub fn print(&mut self, text: &str) -> usize {
        self.print_bytes(text.as_bytes())
    }

    /// Missing text prints nothing and touches no bus
    pub fn print_opt(&mut self, text: Option<&str>) -> usize {
        text.map_or(0, |text| self.print(text))
    }

    /// Print an integer in decimal, in one transaction
    pub fn print_integer(&mut self, value: impl itoa::Integer) -> usize {
        let mut buffer = itoa::Buffer::new();
        let text = buffer.format(value);
        self.print(text)
    }
}

/// `write!` support, each formatted fragment is its own transaction
impl<Sender, Delayer> fmt::Write for Lcd<'_, '_, Sender, Delayer>
where
    Sender: SendCommand,
    Delayer: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}
