//! OpenLCD wire protocol
//!
//! Every operation ends up as one [`Frame`]: a byte buffer made of setting-mode commands
//! (`0x7C, opcode, payload..`) and special commands (`0x1B, opcode`), written to the display
//! in a single bus transaction.

use heapless::Vec;

use crate::utils::map_range;

/// Puts the display into setting mode, the next byte is a setting opcode
pub const SETTING_COMMAND: u8 = 0x7C;
/// Marks the next byte as an HD44780-style special command
pub const SPECIAL_COMMAND: u8 = 0x1B;

/// Default 7-bit I2C address of the display
pub const DEFAULT_ADDRESS: u8 = 0x72;
/// Rows addressable with [`CommandSet::SetDDRAM`]
pub const MAX_ROWS: u8 = 4;
/// Columns of the widest supported display
pub const MAX_COLUMNS: u8 = 20;
/// DDRAM base address of each row
pub const ROW_OFFSETS: [u8; MAX_ROWS as usize] = [0x00, 0x40, 0x14, 0x54];

// setting mode opcodes
pub(crate) const CLEAR_COMMAND: u8 = 0x2D;
pub(crate) const CONTRAST_COMMAND: u8 = 0x18;
pub(crate) const ADDRESS_COMMAND: u8 = 0x19;
pub(crate) const SET_RGB_COMMAND: u8 = 0x2B;
pub(crate) const ENABLE_SYSTEM_MESSAGE_DISPLAY: u8 = 0x2E;
pub(crate) const DISABLE_SYSTEM_MESSAGE_DISPLAY: u8 = 0x2F;
pub(crate) const ENABLE_SPLASH_DISPLAY: u8 = 0x30;
pub(crate) const DISABLE_SPLASH_DISPLAY: u8 = 0x31;
pub(crate) const SAVE_CURRENT_DISPLAY_AS_SPLASH: u8 = 0x0A;
pub(crate) const SOFTWARE_RESET: u8 = 0x08;
pub(crate) const TOGGLE_IGNORE_EMERGENCY_RESET: u8 = 0x1A;
pub(crate) const DISPLAY_FIRMWARE_VERSION: u8 = 0x2C;
pub(crate) const CREATE_CHAR_BASE: u8 = 27;
pub(crate) const WRITE_CHAR_BASE: u8 = 35;

// backlight brightness ranges, each channel spans 30 steps
pub(crate) const RED_BACKLIGHT_BASE: u8 = 128;
pub(crate) const GREEN_BACKLIGHT_BASE: u8 = 158;
pub(crate) const BLUE_BACKLIGHT_BASE: u8 = 188;
const BACKLIGHT_STEPS: i32 = 29;

// HD44780 command family, sent behind SPECIAL_COMMAND
pub(crate) const LCD_RETURNHOME: u8 = 0x02;
pub(crate) const LCD_ENTRYMODESET: u8 = 0x04;
pub(crate) const LCD_DISPLAYCONTROL: u8 = 0x08;
pub(crate) const LCD_CURSORSHIFT: u8 = 0x10;
pub(crate) const LCD_SETDDRAMADDR: u8 = 0x80;

/// Entry mode flag: text flows left to right
pub const LCD_ENTRYLEFT: u8 = 0x02;
/// Entry mode flag: display shifts on every write (autoscroll)
pub const LCD_ENTRYSHIFTINCREMENT: u8 = 0x01;

/// Display control flag: display on
pub const LCD_DISPLAYON: u8 = 0x04;
/// Display control flag: underline cursor on
pub const LCD_CURSORON: u8 = 0x02;
/// Display control flag: blinking cursor on
pub const LCD_BLINKON: u8 = 0x01;

pub(crate) const LCD_DISPLAYMOVE: u8 = 0x08;
pub(crate) const LCD_CURSORMOVE: u8 = 0x00;
pub(crate) const LCD_MOVERIGHT: u8 = 0x04;
pub(crate) const LCD_MOVELEFT: u8 = 0x00;

/// Largest frame the driver builds: 255 repeated special commands
pub const FRAME_CAPACITY: usize = 512;

const _: () = assert!(FRAME_CAPACITY >= 2 * u8::MAX as usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum State {
    Off,
    #[default]
    On,
}

/// Move direction of a cursor or display shift, and text direction of entry mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum MoveDirection {
    RightToLeft,
    #[default]
    LeftToRight,
}

/// What a shift command moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftType {
    /// Move the cursor, keep the text in place
    #[default]
    CursorOnly,
    /// Scroll the whole display window
    CursorAndDisplay,
}

/// Display width, persisted by the display firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Width {
    Columns20,
    Columns16,
}

/// Display line count, persisted by the display firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Lines {
    Four,
    Two,
    One,
}

/// UART baud rate of the display's serial interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum BaudRate {
    Baud1200,
    Baud2400,
    Baud4800,
    Baud9600,
    Baud14400,
    Baud19200,
    Baud38400,
    Baud57600,
    Baud115200,
    Baud230400,
    Baud460800,
    Baud921600,
    Baud1000000,
}

impl BaudRate {
    fn opcode(self) -> u8 {
        match self {
            BaudRate::Baud2400 => 0x0B,
            BaudRate::Baud4800 => 0x0C,
            BaudRate::Baud9600 => 0x0D,
            BaudRate::Baud14400 => 0x0E,
            BaudRate::Baud19200 => 0x0F,
            BaudRate::Baud38400 => 0x10,
            BaudRate::Baud57600 => 0x11,
            BaudRate::Baud115200 => 0x12,
            BaudRate::Baud230400 => 0x13,
            BaudRate::Baud460800 => 0x14,
            BaudRate::Baud921600 => 0x15,
            BaudRate::Baud1000000 => 0x16,
            BaudRate::Baud1200 => 0x17,
        }
    }
}

/// Logical commands understood by the OpenLCD firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSet {
    /// Clear the display and return the cursor home
    Clear,
    /// Show messages like `Contrast: 5` when a setting changes
    EnableSystemMessages,
    /// Hide setting confirmation messages
    DisableSystemMessages,
    /// Show the splash screen at power on
    EnableSplash,
    /// Skip the splash screen at power on
    DisableSplash,
    /// Store the current screen as splash
    SaveSplash,
    /// Contrast 0-255, 120 is the factory default
    Contrast(u8),
    /// Move the display to a new I2C address, persisted by the display
    Address(u8),
    /// Upload a 5x8 bitmap into a custom character slot (masked to 0-7)
    CreateChar(u8, [u8; 8]),
    /// Print a custom character slot (masked to 0-7) at the cursor
    WriteChar(u8),
    /// Backlight color in one setting command, raw 0-255 per channel
    FastBacklight(u8, u8, u8),
    #[allow(missing_docs)]
    Width(Width),
    #[allow(missing_docs)]
    Lines(Lines),
    #[allow(missing_docs)]
    UartBaud(BaudRate),
    /// Reboot the display firmware
    SoftwareReset,
    /// Toggle whether the RX pin is checked for an emergency reset at boot
    ToggleEmergencyResetIgnore,
    /// Print the firmware version on screen
    FirmwareVersion,
    /// Any setting opcode
    Setting(u8),
    /// Return the cursor home without clearing
    ReturnHome,
    /// Display control register, flags without the base opcode
    DisplayControl(u8),
    /// Entry mode register, flags without the base opcode
    EntryModeSet(u8),
    /// Move the cursor to a DDRAM address
    SetDDRAM(u8),
    /// Shift the cursor or the display `count` times
    CursorOrDisplayShift(ShiftType, MoveDirection, u8),
    /// Any special opcode, repeated `count` times
    Special(u8, u8),
    /// Legacy three-command backlight change hidden behind a display off/on pair.
    ///
    /// `display_control` is the shadow register with the display-on bit cleared,
    /// channels are raw 0-255 and get mapped onto the brightness ranges.
    Backlight {
        #[allow(missing_docs)]
        display_control: u8,
        #[allow(missing_docs)]
        red: u8,
        #[allow(missing_docs)]
        green: u8,
        #[allow(missing_docs)]
        blue: u8,
    },
    /// Push both shadow registers and clear the screen
    Init {
        #[allow(missing_docs)]
        display_control: u8,
        #[allow(missing_docs)]
        entry_mode: u8,
    },
}

/// An encoded command sequence, written to the display in one transaction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    bytes: Vec<u8, FRAME_CAPACITY>,
}

impl Frame {
    /// Bytes on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn setting(mut self, opcode: u8) -> Self {
        self.put(&[SETTING_COMMAND, opcode]);
        self
    }

    fn special(mut self, opcode: u8) -> Self {
        self.put(&[SPECIAL_COMMAND, opcode]);
        self
    }

    fn payload(mut self, bytes: &[u8]) -> Self {
        self.put(bytes);
        self
    }

    // FRAME_CAPACITY covers the longest sequence a CommandSet can produce
    fn put(&mut self, bytes: &[u8]) {
        let pushed = self.bytes.extend_from_slice(bytes);
        debug_assert!(pushed.is_ok(), "frame overflows FRAME_CAPACITY");
    }
}

/// Brightness command bytes for a raw color, in red, green, blue order
pub fn backlight_levels(red: u8, green: u8, blue: u8) -> [u8; 3] {
    let level = |base: u8, value: u8| {
        base + map_range(i32::from(value), 0, 255, 0, BACKLIGHT_STEPS) as u8
    };

    [
        level(RED_BACKLIGHT_BASE, red),
        level(GREEN_BACKLIGHT_BASE, green),
        level(BLUE_BACKLIGHT_BASE, blue),
    ]
}

/// Split a packed `0x00RRGGBB` color, the top byte is ignored
pub fn split_rgb(rgb: u32) -> (u8, u8, u8) {
    (
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
    )
}

/// DDRAM address of a screen position, rows past the last one are clamped
pub fn ddram_address(col: u8, row: u8) -> u8 {
    let row = row.min(MAX_ROWS - 1);
    col.wrapping_add(ROW_OFFSETS[row as usize])
}

impl From<CommandSet> for Frame {
    fn from(command: CommandSet) -> Self {
        let frame = Frame::default();

        match command {
            CommandSet::Clear => frame.setting(CLEAR_COMMAND),
            CommandSet::EnableSystemMessages => frame.setting(ENABLE_SYSTEM_MESSAGE_DISPLAY),
            CommandSet::DisableSystemMessages => frame.setting(DISABLE_SYSTEM_MESSAGE_DISPLAY),
            CommandSet::EnableSplash => frame.setting(ENABLE_SPLASH_DISPLAY),
            CommandSet::DisableSplash => frame.setting(DISABLE_SPLASH_DISPLAY),
            CommandSet::SaveSplash => frame.setting(SAVE_CURRENT_DISPLAY_AS_SPLASH),

            CommandSet::Contrast(value) => frame.setting(CONTRAST_COMMAND).payload(&[value]),

            CommandSet::Address(addr) => frame.setting(ADDRESS_COMMAND).payload(&[addr]),

            CommandSet::CreateChar(slot, bitmap) => frame
                .setting(CREATE_CHAR_BASE + (slot & 0x7))
                .payload(&bitmap),

            CommandSet::WriteChar(slot) => frame.setting(WRITE_CHAR_BASE + (slot & 0x7)),

            CommandSet::FastBacklight(r, g, b) => {
                frame.setting(SET_RGB_COMMAND).payload(&[r, g, b])
            }

            CommandSet::Width(width) => frame.setting(match width {
                Width::Columns20 => 0x03,
                Width::Columns16 => 0x04,
            }),

            CommandSet::Lines(lines) => frame.setting(match lines {
                Lines::Four => 0x05,
                Lines::Two => 0x06,
                Lines::One => 0x07,
            }),

            CommandSet::UartBaud(baud) => frame.setting(baud.opcode()),
            CommandSet::SoftwareReset => frame.setting(SOFTWARE_RESET),
            CommandSet::ToggleEmergencyResetIgnore => frame.setting(TOGGLE_IGNORE_EMERGENCY_RESET),
            CommandSet::FirmwareVersion => frame.setting(DISPLAY_FIRMWARE_VERSION),
            CommandSet::Setting(opcode) => frame.setting(opcode),

            CommandSet::ReturnHome => frame.special(LCD_RETURNHOME),

            CommandSet::DisplayControl(flags) => frame.special(LCD_DISPLAYCONTROL | flags),

            CommandSet::EntryModeSet(flags) => frame.special(LCD_ENTRYMODESET | flags),

            CommandSet::SetDDRAM(addr) => frame.special(LCD_SETDDRAMADDR | addr),

            CommandSet::CursorOrDisplayShift(st, dir, count) => {
                let mut opcode = LCD_CURSORSHIFT;

                opcode |= match st {
                    ShiftType::CursorOnly => LCD_CURSORMOVE,
                    ShiftType::CursorAndDisplay => LCD_DISPLAYMOVE,
                };

                opcode |= match dir {
                    MoveDirection::RightToLeft => LCD_MOVELEFT,
                    MoveDirection::LeftToRight => LCD_MOVERIGHT,
                };

                Frame::from(CommandSet::Special(opcode, count))
            }

            CommandSet::Special(opcode, count) => {
                (0..count).fold(frame, |frame, _| frame.special(opcode))
            }

            CommandSet::Backlight {
                display_control,
                red,
                green,
                blue,
            } => {
                let [red, green, blue] = backlight_levels(red, green, blue);

                frame
                    .special(LCD_DISPLAYCONTROL | display_control)
                    .setting(red)
                    .setting(green)
                    .setting(blue)
                    .special(LCD_DISPLAYCONTROL | display_control | LCD_DISPLAYON)
            }

            CommandSet::Init {
                display_control,
                entry_mode,
            } => frame
                .special(LCD_DISPLAYCONTROL | display_control)
                .special(LCD_ENTRYMODESET | entry_mode)
                .setting(CLEAR_COMMAND),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(command: CommandSet) -> Frame {
        command.into()
    }

    #[test]
    fn setting_commands_are_marker_then_opcode() {
        assert_eq!(encode(CommandSet::Clear).as_bytes(), &[0x7C, 0x2D]);
        assert_eq!(encode(CommandSet::SaveSplash).as_bytes(), &[0x7C, 0x0A]);
        assert_eq!(encode(CommandSet::Contrast(5)).as_bytes(), &[0x7C, 0x18, 5]);
        assert_eq!(encode(CommandSet::Address(0x30)).as_bytes(), &[0x7C, 0x19, 0x30]);
        assert_eq!(
            encode(CommandSet::FastBacklight(1, 2, 3)).as_bytes(),
            &[0x7C, 0x2B, 1, 2, 3]
        );
        assert_eq!(
            encode(CommandSet::UartBaud(BaudRate::Baud1200)).as_bytes(),
            &[0x7C, 0x17]
        );
        assert_eq!(encode(CommandSet::Lines(Lines::Four)).as_bytes(), &[0x7C, 0x05]);
    }

    #[test]
    fn ddram_address_follows_row_offsets() {
        for (row, offset) in ROW_OFFSETS.iter().enumerate() {
            for col in 0..MAX_COLUMNS {
                assert_eq!(ddram_address(col, row as u8), col + offset);
            }
        }
    }

    #[test]
    fn ddram_row_is_clamped() {
        assert_eq!(ddram_address(3, 4), 3 + 0x54);
        assert_eq!(ddram_address(3, 200), 3 + 0x54);
        assert_eq!(
            encode(CommandSet::SetDDRAM(ddram_address(2, 1))).as_bytes(),
            &[0x1B, 0x80 | 0x42]
        );
    }

    #[test]
    fn custom_char_slot_is_masked() {
        let bitmap = [0, 0b01010, 0b11111, 0b11111, 0b01110, 0b00100, 0, 0];
        let frame = encode(CommandSet::CreateChar(9, bitmap));

        assert_eq!(frame, encode(CommandSet::CreateChar(1, bitmap)));
        assert_eq!(frame.len(), 10);
        assert_eq!(&frame.as_bytes()[..2], &[0x7C, 28]);
        assert_eq!(&frame.as_bytes()[2..], &bitmap);

        assert_eq!(encode(CommandSet::WriteChar(15)).as_bytes(), &[0x7C, 35 + 7]);
    }

    #[test]
    fn repeated_shift_is_one_frame_of_pairs() {
        let frame = encode(CommandSet::CursorOrDisplayShift(
            ShiftType::CursorAndDisplay,
            MoveDirection::RightToLeft,
            5,
        ));

        assert_eq!(frame.len(), 10);
        for pair in frame.as_bytes().chunks(2) {
            assert_eq!(pair, &[SPECIAL_COMMAND, 0x18]);
        }

        let widest = encode(CommandSet::Special(0x14, u8::MAX));
        assert_eq!(widest.len(), 2 * u8::MAX as usize);
        assert!(widest.as_bytes().chunks(2).all(|pair| pair == [SPECIAL_COMMAND, 0x14]));

        assert!(encode(CommandSet::Special(0x14, 0)).is_empty());
    }

    #[test]
    fn cursor_shift_opcodes() {
        let shift = |st, dir| encode(CommandSet::CursorOrDisplayShift(st, dir, 1));

        assert_eq!(
            shift(ShiftType::CursorOnly, MoveDirection::RightToLeft).as_bytes(),
            &[0x1B, 0x10]
        );
        assert_eq!(
            shift(ShiftType::CursorOnly, MoveDirection::LeftToRight).as_bytes(),
            &[0x1B, 0x14]
        );
        assert_eq!(
            shift(ShiftType::CursorAndDisplay, MoveDirection::LeftToRight).as_bytes(),
            &[0x1B, 0x1C]
        );
    }

    #[test]
    fn backlight_levels_cover_each_range() {
        assert_eq!(backlight_levels(0, 0, 0), [128, 158, 188]);
        assert_eq!(backlight_levels(255, 255, 255), [157, 187, 217]);
        assert_eq!(backlight_levels(255, 0, 255), [157, 158, 217]);
    }

    #[test]
    fn packed_rgb_splits_into_channels() {
        assert_eq!(split_rgb(0xFF00FF), (255, 0, 255));
        assert_eq!(split_rgb(0xAB123456), (0x12, 0x34, 0x56));
    }

    #[test]
    fn legacy_backlight_hides_behind_display_toggle() {
        let frame = encode(CommandSet::Backlight {
            display_control: LCD_CURSORON,
            red: 255,
            green: 0,
            blue: 255,
        });

        assert_eq!(
            frame.as_bytes(),
            &[0x1B, 0x0A, 0x7C, 157, 0x7C, 158, 0x7C, 217, 0x1B, 0x0E]
        );
    }

    #[test]
    fn init_pushes_both_registers_then_clears() {
        let frame = encode(CommandSet::Init {
            display_control: LCD_DISPLAYON,
            entry_mode: LCD_ENTRYLEFT,
        });

        assert_eq!(frame.as_bytes(), &[0x1B, 0x0C, 0x1B, 0x06, 0x7C, 0x2D]);
    }
}
