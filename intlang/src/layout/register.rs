use std::fmt;

/// Register cell in the stack section.
///
/// The target CPU has no registers of its own. The compiler reserves the
/// last cells of the stack section and treats them as registers, in the
/// order they're listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    /// Base pointer of the current frame.
    Bp,
    /// Stack pointer. Points at the next free cell.
    Sp,
}

impl Register {
    /// Offset of the register from the first register cell.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Register::Bp => write!(f, "bp"),
            Register::Sp => write!(f, "sp"),
            general => write!(f, "r{}", general.index()),
        }
    }
}
