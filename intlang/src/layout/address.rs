//! Addresses and the symbolic cells they hold.
use super::{register::Register, section::SectionKind, LayoutViolation};
use crate::constants::Word;
use std::fmt;

/// Handle to an [`Address`] in the memory arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddrId(pub(crate) usize);

/// Handle to a placeholder whose value is given after it's emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchId(pub(crate) usize);

/// Content of one memory cell before the image is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Plain value.
    Int(Word),
    /// Location of a register cell.
    Reg(Register),
    /// Location of this cell plus an offset.
    Relative(Word),
    /// Location of an address block.
    Addr(AddrId),
    /// Value backpatched later, looked up in the patch table.
    Patch(PatchId),
}

impl From<Word> for Cell {
    #[inline]
    fn from(value: Word) -> Self {
        Cell::Int(value)
    }
}

impl From<Register> for Cell {
    #[inline]
    fn from(register: Register) -> Self {
        Cell::Reg(register)
    }
}

impl From<AddrId> for Cell {
    #[inline]
    fn from(addr: AddrId) -> Self {
        Cell::Addr(addr)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{}", value),
            Cell::Reg(register) => write!(f, "{}", register),
            Cell::Relative(offset) => write!(f, "$+{}", offset),
            Cell::Addr(addr) => write!(f, "@{}", addr.0),
            Cell::Patch(patch) => write!(f, "?{}", patch.0),
        }
    }
}

/// Block of cells belonging to one memory section.
///
/// The block gets its absolute location when its section is finalized.
/// After that the size is fixed, though the cells can still be rewritten.
#[derive(Debug, Clone)]
pub struct Address {
    section: SectionKind,
    cells: Vec<Cell>,
    location: Option<usize>,
}

impl Address {
    pub(crate) fn new(section: SectionKind, cells: Vec<Cell>) -> Self {
        Self {
            section,
            cells,
            location: None,
        }
    }

    #[inline]
    pub fn section(&self) -> SectionKind {
        self.section
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Absolute location, or `None` before the section is finalized.
    #[inline]
    pub fn location(&self) -> Option<usize> {
        self.location
    }

    /// Change the number of cells. New cells are zeroed.
    pub(crate) fn resize(&mut self, size: usize) -> Result<(), LayoutViolation> {
        self.ensure_unplaced()?;
        self.cells.resize(size, Cell::Int(0));
        Ok(())
    }

    /// Grow the block with the given cells.
    pub(crate) fn append(&mut self, cells: &[Cell]) -> Result<(), LayoutViolation> {
        self.ensure_unplaced()?;
        self.cells.extend_from_slice(cells);
        Ok(())
    }

    /// Overwrite cells starting at `offset`, without changing the size.
    pub(crate) fn write(&mut self, offset: usize, cells: &[Cell]) -> Result<(), LayoutViolation> {
        let end = offset + cells.len();
        if end > self.cells.len() {
            return Err(LayoutViolation::OutOfBounds {
                section: self.section,
                size: self.cells.len(),
                end,
            });
        }
        self.cells[offset..end].copy_from_slice(cells);
        Ok(())
    }

    pub(crate) fn place(&mut self, location: usize) {
        self.location = Some(location);
    }

    fn ensure_unplaced(&self) -> Result<(), LayoutViolation> {
        match self.location {
            Some(location) => Err(LayoutViolation::ResizeAfterPlacement {
                section: self.section,
                location,
            }),
            None => Ok(()),
        }
    }
}
