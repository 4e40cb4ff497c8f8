//! Built-in sender
//! If you want to talk to the display over another transport, you will need to implement [`SendCommand`] trait

use core::fmt;

use embedded_hal::delay::DelayNs;

mod i2c_sender;

pub use i2c_sender::I2cSender;

/// Attempts made by [`SendCommand::send_and_settle`] when the transport keeps timing out
pub const DEFAULT_ATTEMPTS: u8 = 3;

/// Why a single bus write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// The bus was busy or the transfer timed out, worth another attempt
    Timeout,
    /// Nobody acknowledged at the address
    Nack,
    /// Bus level fault (misplaced start/stop)
    Bus,
    /// Anything the transport can't classify
    Other,
}

impl SendError {
    /// Only timeouts are retried
    pub fn is_timeout(&self) -> bool {
        matches!(self, SendError::Timeout)
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Timeout => f.write_str("bus timeout"),
            SendError::Nack => f.write_str("no acknowledge"),
            SendError::Bus => f.write_str("bus error"),
            SendError::Other => f.write_str("transport error"),
        }
    }
}

/// Outcome of one buffered transaction, including its retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    /// Written on the first attempt (or nothing needed writing)
    #[default]
    Sent,
    /// Written after the transport timed out at least once
    Retried {
        /// attempts including the successful one
        attempts: u8,
    },
    /// Given up, the display may show garbage or nothing
    Failed {
        #[allow(missing_docs)]
        attempts: u8,
        /// error of the last attempt
        error: SendError,
    },
}

impl Delivery {
    /// `true` when the bytes reached the bus
    pub fn is_ok(&self) -> bool {
        !matches!(self, Delivery::Failed { .. })
    }

    /// Bus writes issued for this transaction
    pub fn attempts(&self) -> u8 {
        match *self {
            Delivery::Sent => 1,
            Delivery::Retried { attempts } | Delivery::Failed { attempts, .. } => attempts,
        }
    }
}

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
pub trait SendCommand {
    /// Write `bytes` to the display listening at `address`, in one transfer
    fn send(&mut self, address: u8, bytes: &[u8]) -> Result<(), SendError>;

    /// Write `bytes`, wait `settle_ms` after every attempt,
    /// and retry on [`SendError::Timeout`] until `attempts` writes were issued
    fn send_and_settle(
        &mut self,
        address: u8,
        bytes: &[u8],
        delayer: &mut impl DelayNs,
        settle_ms: u32,
        attempts: u8,
    ) -> Delivery {
        let attempts = attempts.max(1);
        let mut issued = 0;

        loop {
            let result = self.send(address, bytes);
            delayer.delay_ms(settle_ms);
            issued += 1;

            match result {
                Ok(()) if issued == 1 => return Delivery::Sent,
                Ok(()) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "serlcd: write of {} bytes to {=u8:#x} went through on attempt {}",
                        bytes.len(),
                        address,
                        issued
                    );
                    return Delivery::Retried { attempts: issued };
                }
                Err(error) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "serlcd: write({=[u8]:#x}) to {=u8:#x}, settle {} ms, failed: {}",
                        &bytes[..bytes.len().min(2)],
                        address,
                        settle_ms,
                        error
                    );

                    if !error.is_timeout() || issued >= attempts {
                        #[cfg(feature = "defmt")]
                        defmt::error!(
                            "serlcd: dropped {} bytes after {} attempts",
                            bytes.len(),
                            issued
                        );
                        return Delivery::Failed {
                            attempts: issued,
                            error,
                        };
                    }
                }
            }
        }
    }
}

impl<T: SendCommand + ?Sized> SendCommand for &mut T {
    fn send(&mut self, address: u8, bytes: &[u8]) -> Result<(), SendError> {
        T::send(self, address, bytes)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    /// Records every write and plays back scripted results, then succeeds
    #[derive(Default)]
    pub(crate) struct ScriptedSender {
        pub(crate) writes: Vec<(u8, Vec<u8>)>,
        pub(crate) script: Vec<Result<(), SendError>>,
    }

    impl ScriptedSender {
        pub(crate) fn failing_with(script: &[Result<(), SendError>]) -> Self {
            Self {
                writes: Vec::new(),
                script: script.iter().rev().copied().collect(),
            }
        }
    }

    impl SendCommand for ScriptedSender {
        fn send(&mut self, address: u8, bytes: &[u8]) -> Result<(), SendError> {
            self.writes.push((address, bytes.to_vec()));
            self.script.pop().unwrap_or(Ok(()))
        }
    }

    /// Sums every requested delay
    #[derive(Default)]
    pub(crate) struct CountingDelay {
        pub(crate) total_ns: u64,
    }

    impl CountingDelay {
        pub(crate) fn total_ms(&self) -> u64 {
            self.total_ns / 1_000_000
        }
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ns += u64::from(ms) * 1_000_000;
        }
    }

    #[test]
    fn first_try_success_is_sent() {
        let mut sender = ScriptedSender::default();
        let mut delay = CountingDelay::default();

        let delivery = sender.send_and_settle(0x72, &[1, 2], &mut delay, 50, 3);

        assert_eq!(delivery, Delivery::Sent);
        assert_eq!(sender.writes.len(), 1);
        assert_eq!(delay.total_ms(), 50);
    }

    #[test]
    fn timeouts_are_retried_until_success() {
        let mut sender =
            ScriptedSender::failing_with(&[Err(SendError::Timeout), Err(SendError::Timeout)]);
        let mut delay = CountingDelay::default();

        let delivery = sender.send_and_settle(0x72, &[1, 2], &mut delay, 10, 3);

        assert_eq!(delivery, Delivery::Retried { attempts: 3 });
        assert!(delivery.is_ok());
        assert_eq!(sender.writes.len(), 3);
        assert!(sender.writes.iter().all(|(_, bytes)| bytes == &[1, 2]));
        assert_eq!(delay.total_ms(), 30);
    }

    #[test]
    fn persistent_timeout_gives_up_after_three_attempts() {
        let mut sender = ScriptedSender::failing_with(&[Err(SendError::Timeout); 5]);
        let mut delay = CountingDelay::default();

        let delivery = sender.send_and_settle(0x72, &[7], &mut delay, 10, DEFAULT_ATTEMPTS);

        assert_eq!(
            delivery,
            Delivery::Failed {
                attempts: 3,
                error: SendError::Timeout
            }
        );
        assert!(!delivery.is_ok());
        assert_eq!(sender.writes.len(), 3);
    }

    #[test]
    fn other_failures_are_not_retried() {
        let mut sender = ScriptedSender::failing_with(&[Err(SendError::Nack)]);
        let mut delay = CountingDelay::default();

        let delivery = sender.send_and_settle(0x72, &[7], &mut delay, 10, 3);

        assert_eq!(
            delivery,
            Delivery::Failed {
                attempts: 1,
                error: SendError::Nack
            }
        );
        assert_eq!(sender.writes.len(), 1);
        assert_eq!(delay.total_ms(), 10);
    }

    #[test]
    fn zero_attempts_still_writes_once() {
        let mut sender = ScriptedSender::default();
        let mut delay = CountingDelay::default();

        assert_eq!(
            sender.send_and_settle(0x72, &[7], &mut delay, 0, 0),
            Delivery::Sent
        );
        assert_eq!(sender.writes.len(), 1);
    }
}
