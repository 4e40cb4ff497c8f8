//! The [`Lcd`] driver and its settings

use embedded_hal::delay::DelayNs;

use crate::{
    command::{
        ddram_address, split_rgb, BaudRate, CommandSet, Frame, Lines, MoveDirection, ShiftType,
        State, Width,
    },
    sender::{Delivery, SendCommand},
    state::LcdState,
};

mod impls;
mod init;

pub use init::{Config, Timing};

/// The SerLCD driver.
///
/// Every method is one blocking bus transaction followed by the settle delay the
/// display firmware needs before it accepts the next command. Failures never
/// surface as errors: they are logged, and the outcome of the latest transaction
/// is kept in [`Lcd::last_delivery`].
pub struct Lcd<'a, 'b, Sender: SendCommand, Delayer: DelayNs> {
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    state: LcdState,
    attempts: u8,
    timing: Timing,
    last_delivery: Delivery,
}

impl<'a, 'b, Sender: SendCommand, Delayer: DelayNs> Lcd<'a, 'b, Sender, Delayer> {
    /// Write `bytes` as they are, with `settle_ms` after every attempt.
    ///
    /// Shadow state is not updated, sending display control or entry mode
    /// commands through here desynchronizes it.
    pub fn send_raw(&mut self, bytes: &[u8], settle_ms: u32) -> Delivery {
        self.last_delivery = self.sender.send_and_settle(
            self.state.get_address(),
            bytes,
            self.delayer,
            settle_ms,
            self.attempts,
        );
        self.last_delivery
    }

    /// Outcome of the most recent bus transaction
    pub fn last_delivery(&self) -> Delivery {
        self.last_delivery
    }

    // nothing to write still counts as a delivered transaction
    fn send_nothing(&mut self) -> Delivery {
        self.last_delivery = Delivery::Sent;
        self.last_delivery
    }

    pub(crate) fn send_command(&mut self, command: CommandSet, settle_ms: u32) -> Delivery {
        let frame = Frame::from(command);
        if frame.is_empty() {
            return self.send_nothing();
        }
        self.send_raw(frame.as_bytes(), settle_ms)
    }

    // short setting commands go through the buffered write path
    fn send_setting(&mut self, command: CommandSet) {
        self.send_command(command, self.timing.buffer_ms);
        self.delayer.delay_ms(self.timing.buffer_tail_ms);
    }

    fn send_special(&mut self, command: CommandSet) {
        self.send_command(command, self.timing.special_ms);
    }

    fn send_repeated(&mut self, command: CommandSet) {
        self.send_command(command, self.timing.repeat_ms);
    }

    /// Clear the display and move the cursor home
    pub fn clear(&mut self) {
        self.send_setting(CommandSet::Clear);
    }

    /// Move the cursor home without clearing
    pub fn home(&mut self) {
        self.send_special(CommandSet::ReturnHome);
    }

    /// Rows past the last one are clamped to the last one
    pub fn set_cursor(&mut self, col: u8, row: u8) {
        self.send_special(CommandSet::SetDDRAM(ddram_address(col, row)));
        self.delayer.delay_ms(self.timing.cursor_tail_ms);
    }

    /// Upload a 5x8 bitmap, one byte per row, into slot `location & 0x7`
    pub fn create_char(&mut self, location: u8, charmap: &[u8; 8]) {
        self.send_command(
            CommandSet::CreateChar(location, *charmap),
            self.timing.upload_ms,
        );
    }

    /// Print the custom character in slot `location & 0x7`
    pub fn write_char(&mut self, location: u8) {
        self.send_setting(CommandSet::WriteChar(location));
    }

    fn update_display_control(&mut self) {
        self.send_special(CommandSet::DisplayControl(self.state.get_display_control()));
    }

    fn update_entry_mode(&mut self) {
        self.send_special(CommandSet::EntryModeSet(self.state.get_entry_mode()));
    }

    /// Shadow of the display control register
    pub fn display_control(&self) -> u8 {
        self.state.get_display_control()
    }

    /// Shadow of the entry mode register
    pub fn entry_mode(&self) -> u8 {
        self.state.get_entry_mode()
    }

    /// Shift the cursor or the display once
    pub fn shift_cursor_or_display(&mut self, shift_type: ShiftType, dir: MoveDirection) {
        self.send_special(CommandSet::CursorOrDisplayShift(shift_type, dir, 1));
    }

    /// Shift the cursor or the display `count` times in one transaction
    pub fn shift_cursor_or_display_by(
        &mut self,
        shift_type: ShiftType,
        dir: MoveDirection,
        count: u8,
    ) {
        self.send_repeated(CommandSet::CursorOrDisplayShift(shift_type, dir, count));
    }

    /// Scroll the text one character left, without changing it
    pub fn scroll_display_left(&mut self) {
        self.shift_cursor_or_display(ShiftType::CursorAndDisplay, MoveDirection::RightToLeft);
    }

    /// Scroll the text `count` characters left in one transaction
    pub fn scroll_display_left_by(&mut self, count: u8) {
        self.shift_cursor_or_display_by(
            ShiftType::CursorAndDisplay,
            MoveDirection::RightToLeft,
            count,
        );
    }

    /// Scroll the text one character right, without changing it
    pub fn scroll_display_right(&mut self) {
        self.shift_cursor_or_display(ShiftType::CursorAndDisplay, MoveDirection::LeftToRight);
    }

    /// Scroll the text `count` characters right in one transaction
    pub fn scroll_display_right_by(&mut self, count: u8) {
        self.shift_cursor_or_display_by(
            ShiftType::CursorAndDisplay,
            MoveDirection::LeftToRight,
            count,
        );
    }

    /// Move the cursor one character left
    pub fn move_cursor_left(&mut self) {
        self.shift_cursor_or_display(ShiftType::CursorOnly, MoveDirection::RightToLeft);
    }

    /// Move the cursor `count` characters left in one transaction
    pub fn move_cursor_left_by(&mut self, count: u8) {
        self.shift_cursor_or_display_by(ShiftType::CursorOnly, MoveDirection::RightToLeft, count);
    }

    /// Move the cursor one character right
    pub fn move_cursor_right(&mut self) {
        self.shift_cursor_or_display(ShiftType::CursorOnly, MoveDirection::LeftToRight);
    }

    /// Move the cursor `count` characters right in one transaction
    pub fn move_cursor_right_by(&mut self, count: u8) {
        self.shift_cursor_or_display_by(ShiftType::CursorOnly, MoveDirection::LeftToRight, count);
    }

    /// Set the backlight with the per-channel brightness commands older firmware understands.
    ///
    /// The display is turned off while the three channels change so their confirmation
    /// messages never show up, and it is always on afterwards.
    /// [`Lcd::set_fast_backlight`] does the same in one command on newer firmware.
    pub fn set_backlight(&mut self, r: u8, g: u8, b: u8) {
        self.state.set_display_state(State::Off);
        let display_control = self.state.get_display_control();
        self.state.set_display_state(State::On);

        self.send_command(
            CommandSet::Backlight {
                display_control,
                red: r,
                green: g,
                blue: b,
            },
            self.timing.backlight_ms,
        );
    }

    /// [`Lcd::set_backlight`] with a `0x00RRGGBB` color
    pub fn set_backlight_rgb(&mut self, rgb: u32) {
        let (r, g, b) = split_rgb(rgb);
        self.set_backlight(r, g, b);
    }

    /// Set the backlight in a single command, display flags are untouched
    pub fn set_fast_backlight(&mut self, r: u8, g: u8, b: u8) {
        self.send_setting(CommandSet::FastBacklight(r, g, b));
    }

    /// [`Lcd::set_fast_backlight`] with a `0x00RRGGBB` color
    pub fn set_fast_backlight_rgb(&mut self, rgb: u32) {
        let (r, g, b) = split_rgb(rgb);
        self.set_fast_backlight(r, g, b);
    }

    /// Show messages like `Contrast: 5` when a setting changes
    pub fn enable_system_messages(&mut self) {
        self.send_setting(CommandSet::EnableSystemMessages);
    }

    /// Hide setting confirmation messages
    pub fn disable_system_messages(&mut self) {
        self.send_setting(CommandSet::DisableSystemMessages);
    }

    /// Show the splash screen at power on
    pub fn enable_splash(&mut self) {
        self.send_setting(CommandSet::EnableSplash);
    }

    /// Skip the splash screen at power on
    pub fn disable_splash(&mut self) {
        self.send_setting(CommandSet::DisableSplash);
    }

    /// Save whatever is on screen now as the power on splash
    pub fn save_splash(&mut self) {
        self.send_setting(CommandSet::SaveSplash);
    }

    /// 0 is the highest contrast, 120 the factory default
    pub fn set_contrast(&mut self, contrast: u8) {
        self.send_setting(CommandSet::Contrast(contrast));
    }

    /// Move the display to another I2C address.
    ///
    /// The display persists the change; if it gets lost, only a hardware reset
    /// (RX tied to ground at power up) brings back `0x72`.
    pub fn set_address(&mut self, new_address: u8) {
        self.send_command(CommandSet::Address(new_address), self.timing.upload_ms);
        self.state.set_address(new_address);
    }

    /// The address every transaction goes to
    pub fn address(&self) -> u8 {
        self.state.get_address()
    }

    /// Persisted display width
    pub fn set_width(&mut self, width: Width) {
        self.send_setting(CommandSet::Width(width));
    }

    /// Persisted display line count
    pub fn set_lines(&mut self, lines: Lines) {
        self.send_setting(CommandSet::Lines(lines));
    }

    /// Baud rate of the display's UART, the I2C link is not affected
    pub fn set_uart_baud(&mut self, baud: BaudRate) {
        self.send_setting(CommandSet::UartBaud(baud));
    }

    /// Reboot the display firmware.
    ///
    /// The display comes back with its own flags, call [`Lcd::reinit`] once it did.
    pub fn software_reset(&mut self) {
        self.send_setting(CommandSet::SoftwareReset);
    }

    /// Toggle whether the display checks the RX pin for an emergency reset at boot
    pub fn toggle_emergency_reset_ignore(&mut self) {
        self.send_setting(CommandSet::ToggleEmergencyResetIgnore);
    }

    /// Print the firmware version on screen
    pub fn show_firmware_version(&mut self) {
        self.send_setting(CommandSet::FirmwareVersion);
    }

    /// Push the shadow flags again and clear the screen
    pub fn reinit(&mut self) {
        self.send_command(
            CommandSet::Init {
                display_control: self.state.get_display_control(),
                entry_mode: self.state.get_entry_mode(),
            },
            self.timing.init_ms,
        );
    }

    /// Send any setting opcode
    pub fn command(&mut self, opcode: u8) {
        self.send_setting(CommandSet::Setting(opcode));
    }

    /// Send any special opcode.
    ///
    /// Shadow state is not updated, see [`Lcd::send_raw`].
    pub fn special_command(&mut self, opcode: u8) {
        self.send_special(CommandSet::Special(opcode, 1));
    }

    /// Send any special opcode `count` times in one transaction
    pub fn special_command_repeat(&mut self, opcode: u8, count: u8) {
        self.send_repeated(CommandSet::Special(opcode, count));
    }

    /// Toggle entire display on and off (it doesn't toggle backlight)
    pub fn toggle_display(&mut self) {
        match self.get_display_state() {
            State::Off => self.set_display_state(State::On),
            State::On => self.set_display_state(State::Off),
        }
    }

    /// Block for `ms`, using the driver's delayer
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }
}

#[allow(missing_docs)]
impl<'a, 'b, Sender: SendCommand, Delayer: DelayNs> Lcd<'a, 'b, Sender, Delayer> {
    pub fn set_display_state(&mut self, display: State) {
        self.state.set_display_state(display);
        self.update_display_control();
    }

    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    pub fn set_cursor_state(&mut self, cursor: State) {
        self.state.set_cursor_state(cursor);
        self.update_display_control();
    }

    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    pub fn set_cursor_blink_state(&mut self, blink: State) {
        self.state.set_cursor_blink(blink);
        self.update_display_control();
    }

    pub fn get_cursor_blink_state(&self) -> State {
        self.state.get_cursor_blink()
    }

    pub fn set_direction(&mut self, dir: MoveDirection) {
        self.state.set_direction(dir);
        self.update_entry_mode();
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    pub fn set_autoscroll(&mut self, autoscroll: State) {
        self.state.set_autoscroll(autoscroll);
        self.update_entry_mode();
    }

    pub fn get_autoscroll(&self) -> State {
        self.state.get_autoscroll()
    }

    pub fn display(&mut self) {
        self.set_display_state(State::On);
    }

    pub fn no_display(&mut self) {
        self.set_display_state(State::Off);
    }

    pub fn cursor(&mut self) {
        self.set_cursor_state(State::On);
    }

    pub fn no_cursor(&mut self) {
        self.set_cursor_state(State::Off);
    }

    pub fn blink(&mut self) {
        self.set_cursor_blink_state(State::On);
    }

    pub fn no_blink(&mut self) {
        self.set_cursor_blink_state(State::Off);
    }

    /// Text flows left to right, as in most Western languages
    pub fn left_to_right(&mut self) {
        self.set_direction(MoveDirection::LeftToRight);
    }

    pub fn right_to_left(&mut self) {
        self.set_direction(MoveDirection::RightToLeft);
    }

    /// Right justify text from the cursor
    pub fn autoscroll(&mut self) {
        self.set_autoscroll(State::On);
    }

    pub fn no_autoscroll(&mut self) {
        self.set_autoscroll(State::Off);
    }
}
