//! Final layout and serialization of the image.
use crate::{
    constants::Word,
    error::IntlangResult,
    layout::{Memory, SectionKind},
};
use itertools::Itertools;
use log::debug;
use std::{fmt, ops::Range};

/// Lay out the remaining sections and resolve every cell to an integer.
pub fn finalize(mut memory: Memory) -> IntlangResult<Image> {
    memory.finalize_all()?;

    let cells = memory.resolve()?;
    let mut sections = Vec::with_capacity(SectionKind::ALL.len());
    for kind in SectionKind::ALL.iter() {
        sections.push((*kind, memory.finalized_range(*kind)?));
    }
    debug!("image of {} cells", cells.len());

    Ok(Image { cells, sections })
}

/// Finished program, ready to be loaded at location 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    cells: Vec<Word>,
    sections: Vec<(SectionKind, Range<usize>)>,
}

impl Image {
    #[inline]
    pub fn cells(&self) -> &[Word] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The `[start, end)` range of a section.
    pub fn section(&self, kind: SectionKind) -> Range<usize> {
        self.sections[kind.index()].1.clone()
    }

    /// Every section with its range, in layout order.
    pub fn sections(&self) -> impl Iterator<Item = (SectionKind, Range<usize>)> + '_ {
        self.sections.iter().cloned()
    }
}

/// Comma separated decimal integers.
impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.cells.iter().join(","))
    }
}
