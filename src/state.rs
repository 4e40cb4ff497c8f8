use crate::{
    command::{
        MoveDirection, State, DEFAULT_ADDRESS, LCD_BLINKON, LCD_CURSORON, LCD_DISPLAYON,
        LCD_ENTRYLEFT, LCD_ENTRYSHIFTINCREMENT,
    },
    utils::{BitOps, BitState},
};

/// Driver side copy of the display registers, the display is never read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LcdState {
    address: u8,
    display_control: u8,
    entry_mode: u8,
}

impl Default for LcdState {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            display_control: LCD_DISPLAYON,
            entry_mode: LCD_ENTRYLEFT,
        }
    }
}

fn apply(flags: &mut u8, mask: u8, state: State) {
    match state {
        State::On => flags.set_mask(mask),
        State::Off => flags.clear_mask(mask),
    };
}

fn read(flags: u8, mask: u8) -> State {
    match flags.check_mask(mask) {
        BitState::Set => State::On,
        BitState::Clear => State::Off,
    }
}

impl LcdState {
    pub(crate) fn get_address(&self) -> u8 {
        self.address
    }

    pub(crate) fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    pub(crate) fn get_display_control(&self) -> u8 {
        self.display_control
    }

    pub(crate) fn get_entry_mode(&self) -> u8 {
        self.entry_mode
    }

    pub(crate) fn get_display_state(&self) -> State {
        read(self.display_control, LCD_DISPLAYON)
    }

    pub(crate) fn set_display_state(&mut self, display: State) {
        apply(&mut self.display_control, LCD_DISPLAYON, display);
    }

    pub(crate) fn get_cursor_state(&self) -> State {
        read(self.display_control, LCD_CURSORON)
    }

    pub(crate) fn set_cursor_state(&mut self, cursor: State) {
        apply(&mut self.display_control, LCD_CURSORON, cursor);
    }

    pub(crate) fn get_cursor_blink(&self) -> State {
        read(self.display_control, LCD_BLINKON)
    }

    pub(crate) fn set_cursor_blink(&mut self, blink: State) {
        apply(&mut self.display_control, LCD_BLINKON, blink);
    }

    pub(crate) fn get_direction(&self) -> MoveDirection {
        match read(self.entry_mode, LCD_ENTRYLEFT) {
            State::On => MoveDirection::LeftToRight,
            State::Off => MoveDirection::RightToLeft,
        }
    }

    pub(crate) fn set_direction(&mut self, dir: MoveDirection) {
        let state = match dir {
            MoveDirection::LeftToRight => State::On,
            MoveDirection::RightToLeft => State::Off,
        };
        apply(&mut self.entry_mode, LCD_ENTRYLEFT, state);
    }

    pub(crate) fn get_autoscroll(&self) -> State {
        read(self.entry_mode, LCD_ENTRYSHIFTINCREMENT)
    }

    pub(crate) fn set_autoscroll(&mut self, autoscroll: State) {
        apply(&mut self.entry_mode, LCD_ENTRYSHIFTINCREMENT, autoscroll);
    }
}
