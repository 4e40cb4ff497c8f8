use embedded_hal::i2c::{Error, ErrorKind, I2c};

use super::{SendCommand, SendError};

/// Talks to the display through any embedded-hal I2C bus.
///
/// The address is not kept here: the driver owns it, since a
/// `set_address` command moves the display at runtime.
pub struct I2cSender<'a, I2cLcd: I2c> {
    i2c: &'a mut I2cLcd,
}

impl<'a, I2cLcd: I2c> I2cSender<'a, I2cLcd> {
    #[allow(missing_docs)]
    pub fn new(i2c: &'a mut I2cLcd) -> Self {
        Self { i2c }
    }

    /// Access the borrowed bus, e.g. to talk to other devices between display commands
    pub fn i2c(&mut self) -> &mut I2cLcd {
        self.i2c
    }
}

impl<I2cLcd: I2c> SendCommand for I2cSender<'_, I2cLcd> {
    fn send(&mut self, address: u8, bytes: &[u8]) -> Result<(), SendError> {
        self.i2c
            .write(address, bytes)
            .map_err(|e| classify(e.kind()))
    }
}

// embedded-hal has no timeout kind, HALs report bus-busy and timed out transfers
// as arbitration loss or `Other`
fn classify(kind: ErrorKind) -> SendError {
    match kind {
        ErrorKind::ArbitrationLoss | ErrorKind::Other => SendError::Timeout,
        ErrorKind::NoAcknowledge(_) => SendError::Nack,
        ErrorKind::Bus => SendError::Bus,
        _ => SendError::Other,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use embedded_hal::i2c::NoAcknowledgeSource;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;

    #[test]
    fn writes_go_to_the_given_address() {
        let expectations = [
            I2cTransaction::write(0x72, std::vec![0x7C, 0x2D]),
            I2cTransaction::write(0x30, std::vec![b'A']),
        ];
        let mut i2c = I2cMock::new(&expectations);

        {
            let mut sender = I2cSender::new(&mut i2c);
            assert_eq!(sender.send(0x72, &[0x7C, 0x2D]), Ok(()));
            assert_eq!(sender.send(0x30, b"A"), Ok(()));
        }

        i2c.done();
    }

    #[test]
    fn bus_errors_are_classified() {
        let expectations = [
            I2cTransaction::write(0x72, std::vec![1]).with_error(ErrorKind::Other),
            I2cTransaction::write(0x72, std::vec![1]).with_error(ErrorKind::ArbitrationLoss),
            I2cTransaction::write(0x72, std::vec![1])
                .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            I2cTransaction::write(0x72, std::vec![1]).with_error(ErrorKind::Bus),
            I2cTransaction::write(0x72, std::vec![1]).with_error(ErrorKind::Overrun),
        ];
        let mut i2c = I2cMock::new(&expectations);

        {
            let mut sender = I2cSender::new(&mut i2c);
            assert_eq!(sender.send(0x72, &[1]), Err(SendError::Timeout));
            assert_eq!(sender.send(0x72, &[1]), Err(SendError::Timeout));
            assert_eq!(sender.send(0x72, &[1]), Err(SendError::Nack));
            assert_eq!(sender.send(0x72, &[1]), Err(SendError::Bus));
            assert_eq!(sender.send(0x72, &[1]), Err(SendError::Other));
        }

        i2c.done();
    }
}
