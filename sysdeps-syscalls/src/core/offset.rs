//! File offsets for positional calls

/// Where a vectored call reads or writes.
///
/// The C surface encodes "use the descriptor's current position" as `-1`.
/// Any other value, negative or not, is an explicit position; a negative one
/// is passed through to the positional primitive, which rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    /// The descriptor's current file position, which the call advances
    Current,
    /// An explicit position; the descriptor's position is untouched
    At(i64),
}

impl Offset {
    /// Raw sentinel for [`Offset::Current`]
    pub const CURRENT_RAW: i64 = -1;

    /// Decode a raw C offset
    pub const fn from_raw(raw: i64) -> Self {
        if raw == Self::CURRENT_RAW {
            Offset::Current
        } else {
            Offset::At(raw)
        }
    }

    /// Encode back to the raw C offset
    pub const fn raw(self) -> i64 {
        match self {
            Offset::Current => Self::CURRENT_RAW,
            Offset::At(pos) => pos,
        }
    }

    /// Returns true for the current-position sentinel
    pub const fn is_current(self) -> bool {
        matches!(self, Offset::Current)
    }
}

impl From<i64> for Offset {
    fn from(raw: i64) -> Self {
        Offset::from_raw(raw)
    }
}
