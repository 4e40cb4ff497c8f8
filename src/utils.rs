//! Common tools

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Debug, PartialEq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

/// Simple mask ops on a flag byte
pub trait BitOps {
    #[allow(missing_docs)]
    fn set_mask(&mut self, mask: u8) -> Self;
    #[allow(missing_docs)]
    fn clear_mask(&mut self, mask: u8) -> Self;
    /// [`BitState::Set`] only when every bit of `mask` is set
    fn check_mask(&self, mask: u8) -> BitState;
}

impl BitOps for u8 {
    fn set_mask(&mut self, mask: u8) -> Self {
        *self |= mask;
        *self
    }

    fn clear_mask(&mut self, mask: u8) -> Self {
        *self &= !mask;
        *self
    }

    fn check_mask(&self, mask: u8) -> BitState {
        match *self & mask == mask {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }
}

/// Integer linear map of `value` from `in_min..=in_max` onto `out_min..=out_max`.
///
/// Division truncates toward zero, so `map_range(255, 0, 255, 0, 29)` is 29
/// but `map_range(254, 0, 255, 0, 29)` is 28.
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}
