use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, MoveDirection, State},
    sender::{Delivery, SendCommand, DEFAULT_ATTEMPTS},
    state::LcdState,
};

use super::Lcd;

/// Settle delays (in ms) the display firmware needs after each kind of command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// after every attempt of a single byte write
    pub byte_ms: u32,
    /// once after a single byte write
    pub byte_tail_ms: u32,
    /// after every attempt of a text buffer or short setting command
    pub buffer_ms: u32,
    /// once after a text buffer or short setting command
    pub buffer_tail_ms: u32,
    /// after a single special command
    pub special_ms: u32,
    /// after a repeated special command
    pub repeat_ms: u32,
    /// after the init sequence
    pub init_ms: u32,
    /// after a custom character upload or an address change
    pub upload_ms: u32,
    /// after the legacy backlight sequence
    pub backlight_ms: u32,
    /// once after a cursor move
    pub cursor_tail_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            byte_ms: 10,
            byte_tail_ms: 10,
            buffer_ms: 10,
            buffer_tail_ms: 20,
            special_ms: 50,
            repeat_ms: 60,
            init_ms: 60,
            upload_ms: 60,
            backlight_ms: 100,
            cursor_tail_ms: 10,
        }
    }
}

impl Timing {
    /// No delays at all, for tests and simulated displays
    pub const fn none() -> Self {
        Self {
            byte_ms: 0,
            byte_tail_ms: 0,
            buffer_ms: 0,
            buffer_tail_ms: 0,
            special_ms: 0,
            repeat_ms: 0,
            init_ms: 0,
            upload_ms: 0,
            backlight_ms: 0,
            cursor_tail_ms: 0,
        }
    }
}

/// [`Config`] is the init config of a [`Lcd`]
#[derive(Debug, Clone, Copy)]
pub struct Config {
    state: LcdState,
    attempts: u8,
    timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state: LcdState::default(),
            attempts: DEFAULT_ATTEMPTS,
            timing: Timing::default(),
        }
    }
}

#[allow(missing_docs)]
impl Config {
    pub fn get_address(&self) -> u8 {
        self.state.get_address()
    }

    /// The address the display listens at right now, `0x72` out of the factory
    pub fn set_address(mut self, address: u8) -> Self {
        self.state.set_address(address);
        self
    }

    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    pub fn set_display_state(mut self, display: State) -> Self {
        self.state.set_display_state(display);
        self
    }

    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    pub fn set_cursor_state(mut self, cursor: State) -> Self {
        self.state.set_cursor_state(cursor);
        self
    }

    pub fn get_cursor_blink(&self) -> State {
        self.state.get_cursor_blink()
    }

    pub fn set_cursor_blink(mut self, blink: State) -> Self {
        self.state.set_cursor_blink(blink);
        self
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    pub fn set_direction(mut self, dir: MoveDirection) -> Self {
        self.state.set_direction(dir);
        self
    }

    pub fn get_autoscroll(&self) -> State {
        self.state.get_autoscroll()
    }

    pub fn set_autoscroll(mut self, autoscroll: State) -> Self {
        self.state.set_autoscroll(autoscroll);
        self
    }

    pub fn get_attempts(&self) -> u8 {
        self.attempts
    }

    /// Bus writes per transaction while the bus keeps timing out, at least 1
    pub fn set_attempts(mut self, attempts: u8) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn get_timing(&self) -> Timing {
        self.timing
    }

    pub fn set_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and push the configured state to the display.
    ///
    /// The display keeps contrast, backlight and address across power cycles but
    /// nothing guarantees the flags match ours, so they are always sent.
    pub fn new(sender: &'a mut Sender, delayer: &'b mut Delayer, config: Config) -> Self {
        let mut lcd = Lcd {
            sender,
            delayer,
            state: config.state,
            attempts: config.attempts,
            timing: config.timing,
            last_delivery: Delivery::Sent,
        };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "serlcd: init at {=u8:#x}, control {=u8:#x}, entry mode {=u8:#x}",
            lcd.state.get_address(),
            lcd.state.get_display_control(),
            lcd.state.get_entry_mode()
        );

        lcd.send_command(
            CommandSet::Init {
                display_control: lcd.state.get_display_control(),
                entry_mode: lcd.state.get_entry_mode(),
            },
            lcd.timing.init_ms,
        );

        lcd
    }
}
