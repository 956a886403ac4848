use super::address::AddrId;
use std::{fmt, ops::Range};

/// The four sections of the image, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Stack,
    Instructions,
    Globals,
    Heap,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Stack,
        SectionKind::Instructions,
        SectionKind::Globals,
        SectionKind::Heap,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SectionKind {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Padded, so reports can line up section names.
        f.pad(match self {
            SectionKind::Stack        => "stack",
            SectionKind::Instructions => "instructions",
            SectionKind::Globals      => "globals",
            SectionKind::Heap         => "heap",
        })
    }
}

/// Ordered set of addresses that are laid out together.
#[derive(Debug, Default, Clone)]
pub struct MemorySection {
    members: Vec<AddrId>,
    /// Resolved `[start, end)` once finalized.
    range: Option<Range<usize>>,
}

impl MemorySection {
    /// Addresses in allocation order.
    #[inline]
    pub fn members(&self) -> &[AddrId] {
        &self.members
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.range.is_some()
    }

    #[inline]
    pub fn range(&self) -> Option<Range<usize>> {
        self.range.clone()
    }

    pub(crate) fn push(&mut self, addr: AddrId) {
        self.members.push(addr);
    }

    pub(crate) fn set_range(&mut self, range: Range<usize>) {
        self.range = Some(range);
    }
}
