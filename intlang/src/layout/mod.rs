//! Memory model of the compiled image.
//!
//! All cells live in [`Address`] blocks owned by one arena, and are referred
//! to by [`AddrId`] handles. Blocks are allocated into one of four sections,
//! which are laid out contiguously in the order stack, instructions, globals,
//! heap. A section is finalized exactly once, which assigns every block in it
//! an absolute location.
//!
//! Values that are only known after the cells referencing them have been
//! emitted, like forward jump distances and frame sizes, are placeholders in
//! a side table. They are given a value with [`Memory::set_patch`] and
//! substituted when the image is resolved.
mod address;
mod register;
mod section;

pub use address::{AddrId, Address, Cell, PatchId};
pub use register::Register;
pub use section::{MemorySection, SectionKind};

use crate::constants::{Word, JUMP_VECTOR_SIZE, OP_JGE, MODE_WEIGHTS, REGISTER_COUNT, SECTION_HEADER_SIZE};
use log::{debug, trace};
use std::{error::Error, fmt, ops::Range};

/// Arena of every address in the image, grouped into sections.
#[derive(Debug, Clone)]
pub struct Memory {
    addresses: Vec<Address>,
    patches: Vec<Option<Cell>>,
    sections: Vec<MemorySection>,
    jump_vector: AddrId,
    registers: AddrId,
    header: AddrId,
}

impl Memory {
    /// Create the fixed skeleton of an image.
    ///
    /// The stack section is complete at this point and is finalized at
    /// location 0 right away: the jump vector, the usable stack and the
    /// register cells. The globals section starts with the section header
    /// and the heap is one zeroed block.
    pub fn new(stack_size: usize, heap_size: usize) -> Result<Self, LayoutViolation> {
        let minimum = JUMP_VECTOR_SIZE + REGISTER_COUNT + 1;
        if stack_size < minimum {
            return Err(LayoutViolation::StackTooSmall { stack_size, minimum });
        }

        let mut memory = Memory {
            addresses: vec![],
            patches: vec![],
            sections: vec![MemorySection::default(); SectionKind::ALL.len()],
            jump_vector: AddrId(0),
            registers: AddrId(0),
            header: AddrId(0),
        };

        memory.jump_vector = memory.obtain(SectionKind::Stack, JUMP_VECTOR_SIZE)?;
        memory.obtain(SectionKind::Stack, stack_size - JUMP_VECTOR_SIZE - REGISTER_COUNT)?;

        // Both pointers start at the top of the usable stack.
        let top = Cell::Int((stack_size - REGISTER_COUNT - 1) as Word);
        let mut registers = vec![Cell::Int(0); REGISTER_COUNT];
        registers[Register::Bp.index()] = top;
        registers[Register::Sp.index()] = top;
        memory.registers = memory.obtain_cells(SectionKind::Stack, registers)?;

        memory.finalize(SectionKind::Stack, 0)?;

        memory.header = memory.obtain(SectionKind::Globals, SECTION_HEADER_SIZE)?;
        memory.obtain(SectionKind::Heap, heap_size)?;

        Ok(memory)
    }

    /// Allocate a zeroed block at the end of a section.
    pub fn obtain(&mut self, kind: SectionKind, size: usize) -> Result<AddrId, LayoutViolation> {
        self.obtain_cells(kind, vec![Cell::Int(0); size])
    }

    /// Allocate a block with the given contents at the end of a section.
    pub fn obtain_cells(&mut self, kind: SectionKind, cells: Vec<Cell>) -> Result<AddrId, LayoutViolation> {
        let section = &mut self.sections[kind.index()];
        if section.is_finalized() {
            return Err(LayoutViolation::SectionFinalized(kind));
        }

        let id = AddrId(self.addresses.len());
        trace!("obtain {} cells in {} section as @{}", cells.len(), kind, id.0);
        self.addresses.push(Address::new(kind, cells));
        section.push(id);

        Ok(id)
    }

    #[inline]
    pub fn address(&self, id: AddrId) -> &Address {
        &self.addresses[id.0]
    }

    #[inline]
    pub fn section(&self, kind: SectionKind) -> &MemorySection {
        &self.sections[kind.index()]
    }

    /// Block of register cells at the end of the stack section.
    #[inline]
    pub fn registers(&self) -> AddrId {
        self.registers
    }

    /// Block holding the start location of every section.
    #[inline]
    pub fn header(&self) -> AddrId {
        self.header
    }

    /// Grow a block with the given cells.
    pub fn append(&mut self, id: AddrId, cells: &[Cell]) -> Result<(), LayoutViolation> {
        self.addresses[id.0].append(cells)
    }

    pub fn resize(&mut self, id: AddrId, size: usize) -> Result<(), LayoutViolation> {
        self.addresses[id.0].resize(size)
    }

    /// Overwrite cells of a block, without changing its size.
    pub fn write(&mut self, id: AddrId, offset: usize, cells: &[Cell]) -> Result<(), LayoutViolation> {
        self.addresses[id.0].write(offset, cells)
    }

    /// Create a placeholder without a value.
    pub fn new_patch(&mut self) -> PatchId {
        self.patches.push(None);
        PatchId(self.patches.len() - 1)
    }

    /// Give a placeholder its value.
    ///
    /// Relative cells are resolved against the location of the cell
    /// holding the placeholder.
    pub fn set_patch(&mut self, id: PatchId, value: Cell) {
        trace!("patch ?{} = {}", id.0, value);
        self.patches[id.0] = Some(value);
    }

    /// Point the jump vector at the entry block.
    pub fn set_entry_point(&mut self, entry: AddrId) -> Result<(), LayoutViolation> {
        let opcode = OP_JGE + MODE_WEIGHTS.iter().sum::<Word>();
        let jump = [Cell::Int(opcode), Cell::Int(0), Cell::Int(0), Cell::Addr(entry)];
        self.addresses[self.jump_vector.0].write(0, &jump)
    }

    /// Assign every block of a section a location, starting at `base`.
    ///
    /// Returns the section's `[start, end)` range.
    pub fn finalize(&mut self, kind: SectionKind, base: usize) -> Result<Range<usize>, LayoutViolation> {
        let section = &mut self.sections[kind.index()];
        if section.is_finalized() {
            return Err(LayoutViolation::AlreadyFinalized(kind));
        }

        let mut location = base;
        for id in section.members() {
            let address = &mut self.addresses[id.0];
            address.place(location);
            location += address.len();
        }

        let range = base..location;
        debug!("{} section at [{}, {})", kind, range.start, range.end);
        section.set_range(range.clone());

        Ok(range)
    }

    /// Finalize the remaining sections, each starting where the previous
    /// one ends, then fill in the section header.
    pub fn finalize_all(&mut self) -> Result<(), LayoutViolation> {
        let mut end = self.finalized_range(SectionKind::Stack)?.end;
        for kind in &SectionKind::ALL[1..] {
            end = self.finalize(*kind, end)?.end;
        }

        let mut header = Vec::with_capacity(SECTION_HEADER_SIZE);
        for kind in SectionKind::ALL.iter() {
            header.push(Cell::Int(self.finalized_range(*kind)?.start as Word));
        }
        self.write(self.header, 0, &header)
    }

    pub fn finalized_range(&self, kind: SectionKind) -> Result<Range<usize>, LayoutViolation> {
        self.section(kind)
            .range()
            .ok_or(LayoutViolation::Unplaced(kind))
    }

    /// Flatten every section into one sequence of integers.
    ///
    /// Every section must be finalized.
    pub fn resolve(&self) -> Result<Vec<Word>, LayoutViolation> {
        let mut image = vec![];

        for kind in SectionKind::ALL.iter() {
            let range = self.finalized_range(*kind)?;
            image.reserve(range.len());

            for id in self.section(*kind).members() {
                let address = self.address(*id);
                let base = address.location().ok_or(LayoutViolation::Unplaced(*kind))?;
                for (offset, cell) in address.cells().iter().enumerate() {
                    image.push(self.resolve_cell(*cell, base + offset)?);
                }
            }
        }

        Ok(image)
    }

    /// Integer value of a cell at the given absolute location.
    fn resolve_cell(&self, cell: Cell, location: usize) -> Result<Word, LayoutViolation> {
        match cell {
            Cell::Int(value) => Ok(value),
            Cell::Reg(register) => {
                let registers = self.address(self.registers);
                let base = registers
                    .location()
                    .ok_or(LayoutViolation::Unplaced(registers.section()))?;
                Ok((base + register.index()) as Word)
            }
            Cell::Relative(offset) => Ok(location as Word + offset),
            Cell::Addr(id) => {
                let address = self.address(id);
                address
                    .location()
                    .map(|base| base as Word)
                    .ok_or(LayoutViolation::Unplaced(address.section()))
            }
            Cell::Patch(id) => match self.patches[id.0] {
                Some(Cell::Patch(_)) | None => Err(LayoutViolation::UnresolvedPatch(id.0)),
                Some(value) => self.resolve_cell(value, location),
            },
        }
    }
}

/// Breach of a memory model invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutViolation {
    /// Allocation from a section that has already been laid out.
    SectionFinalized(SectionKind),
    /// A section can only be laid out once.
    AlreadyFinalized(SectionKind),
    /// A block's size is fixed once it has a location.
    ResizeAfterPlacement { section: SectionKind, location: usize },
    /// Write past the end of a block.
    OutOfBounds {
        section: SectionKind,
        size: usize,
        end: usize,
    },
    /// A section was needed before it was laid out.
    Unplaced(SectionKind),
    /// A placeholder was never given a value.
    UnresolvedPatch(usize),
    /// The stack can't hold the jump vector, registers and a usable cell.
    StackTooSmall { stack_size: usize, minimum: usize },
}

impl Error for LayoutViolation {}

impl fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use LayoutViolation as L;
        match self {
            L::SectionFinalized(kind) => write!(f, "cannot allocate in the finalized {} section", kind),
            L::AlreadyFinalized(kind) => write!(f, "{} section is already finalized", kind),
            L::ResizeAfterPlacement { section, location } => write!(
                f,
                "cannot resize the {} address at {} since it is already assigned",
                section, location
            ),
            L::OutOfBounds { section, size, end } => write!(
                f,
                "write up to cell {} is out of bounds for a {} address of size {}",
                end, section, size
            ),
            L::Unplaced(kind) => write!(f, "{} section has not been finalized", kind),
            L::UnresolvedPatch(id) => write!(f, "placeholder ?{} was never resolved", id),
            L::StackTooSmall { stack_size, minimum } => write!(
                f,
                "stack size {} is too small, the minimum is {}",
                stack_size, minimum
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::OP_HALT;

    #[test]
    fn test_stack_skeleton() {
        let memory = Memory::new(32, 8).unwrap();

        assert_eq!(memory.finalized_range(SectionKind::Stack).unwrap(), 0..32);
        assert!(!memory.section(SectionKind::Instructions).is_finalized());

        let registers = memory.address(memory.registers());
        assert_eq!(registers.location(), Some(32 - REGISTER_COUNT));
        assert_eq!(registers.cells()[Register::Sp.index()], Cell::Int(25));
        assert_eq!(registers.cells()[Register::Bp.index()], Cell::Int(25));
    }

    #[test]
    fn test_stack_too_small() {
        assert_eq!(
            Memory::new(10, 0).unwrap_err(),
            LayoutViolation::StackTooSmall {
                stack_size: 10,
                minimum: 11
            }
        );
        assert!(Memory::new(11, 0).is_ok());
    }

    #[test]
    fn test_obtain_after_finalize() {
        let mut memory = Memory::new(16, 0).unwrap();
        assert_eq!(
            memory.obtain(SectionKind::Stack, 1),
            Err(LayoutViolation::SectionFinalized(SectionKind::Stack))
        );

        memory.finalize_all().unwrap();
        for kind in SectionKind::ALL.iter() {
            assert_eq!(memory.obtain(*kind, 1), Err(LayoutViolation::SectionFinalized(*kind)));
        }
    }

    #[test]
    fn test_finalize_twice() {
        let mut memory = Memory::new(16, 0).unwrap();
        memory.finalize(SectionKind::Instructions, 16).unwrap();
        assert_eq!(
            memory.finalize(SectionKind::Instructions, 16),
            Err(LayoutViolation::AlreadyFinalized(SectionKind::Instructions))
        );
    }

    #[test]
    fn test_resize_after_placement() {
        let mut memory = Memory::new(16, 0).unwrap();
        let code = memory.obtain(SectionKind::Instructions, 0).unwrap();
        memory.append(code, &[Cell::Int(OP_HALT)]).unwrap();
        memory.resize(code, 2).unwrap();

        memory.finalize_all().unwrap();
        assert_eq!(
            memory.append(code, &[Cell::Int(OP_HALT)]),
            Err(LayoutViolation::ResizeAfterPlacement {
                section: SectionKind::Instructions,
                location: 16
            })
        );
        assert!(matches!(
            memory.resize(code, 1),
            Err(LayoutViolation::ResizeAfterPlacement { .. })
        ));

        // Rewriting cells in place is still allowed.
        memory.write(code, 1, &[Cell::Int(7)]).unwrap();
        assert!(matches!(
            memory.write(code, 1, &[Cell::Int(7), Cell::Int(7)]),
            Err(LayoutViolation::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_sections_are_contiguous() {
        let mut memory = Memory::new(16, 5).unwrap();
        memory.obtain(SectionKind::Instructions, 3).unwrap();
        memory.obtain(SectionKind::Instructions, 4).unwrap();
        memory.obtain(SectionKind::Globals, 2).unwrap();
        memory.finalize_all().unwrap();

        assert_eq!(memory.finalized_range(SectionKind::Stack).unwrap(), 0..16);
        assert_eq!(memory.finalized_range(SectionKind::Instructions).unwrap(), 16..23);
        assert_eq!(memory.finalized_range(SectionKind::Globals).unwrap(), 23..29);
        assert_eq!(memory.finalized_range(SectionKind::Heap).unwrap(), 29..34);

        let image = memory.resolve().unwrap();
        assert_eq!(image.len(), 34);
        assert_eq!(&image[23..27], &[0, 16, 23, 29]);
    }

    #[test]
    fn test_resolve_symbolic_cells() {
        let mut memory = Memory::new(16, 0).unwrap();
        let data = memory.obtain(SectionKind::Globals, 1).unwrap();
        let patch = memory.new_patch();
        let code = memory
            .obtain_cells(
                SectionKind::Instructions,
                vec![
                    Cell::Reg(Register::Sp),
                    Cell::Relative(3),
                    Cell::Addr(data),
                    Cell::Patch(patch),
                ],
            )
            .unwrap();
        memory.set_patch(patch, Cell::Relative(-1));
        memory.set_entry_point(code).unwrap();
        memory.finalize_all().unwrap();

        let image = memory.resolve().unwrap();
        assert_eq!(&image[0..4], &[11160, 0, 0, 16]);
        assert_eq!(&image[16..20], &[15, 20, 24, 18]);
    }

    #[test]
    fn test_unresolved_patch() {
        let mut memory = Memory::new(16, 0).unwrap();
        let patch = memory.new_patch();
        memory
            .obtain_cells(SectionKind::Instructions, vec![Cell::Patch(patch)])
            .unwrap();
        memory.finalize_all().unwrap();

        assert_eq!(memory.resolve(), Err(LayoutViolation::UnresolvedPatch(0)));
    }
}
