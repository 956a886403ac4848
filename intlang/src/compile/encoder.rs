//! Instruction encoding and calling convention macros.
use crate::{
    constants::{Word, CALL_RETURN_OFFSET, MODE_WEIGHTS, OP_ADD, OP_DIV, OP_HALT, OP_IN, OP_JGE, OP_MUL, OP_OUT},
    layout::{AddrId, Cell, LayoutViolation, Memory, PatchId, Register},
};
use log::trace;
use std::fmt;

pub type EncodeResult = Result<(), LayoutViolation>;

/// Instruction operand with its addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The cell's value is used as is.
    Imm(Cell),
    /// The cell's value is a location the CPU reads from or writes to.
    Ref(Cell),
}

pub const R0: Operand = Operand::Ref(Cell::Reg(Register::R0));
pub const R1: Operand = Operand::Ref(Cell::Reg(Register::R1));
pub const R2: Operand = Operand::Ref(Cell::Reg(Register::R2));
pub const BP: Operand = Operand::Ref(Cell::Reg(Register::Bp));
pub const SP: Operand = Operand::Ref(Cell::Reg(Register::Sp));

/// Memory reference to be overwritten at runtime by the instruction
/// before it.
const SLOT: Operand = Operand::Ref(Cell::Int(0));

impl Operand {
    #[inline]
    pub fn imm(cell: impl Into<Cell>) -> Self {
        Operand::Imm(cell.into())
    }

    #[inline]
    pub fn at(cell: impl Into<Cell>) -> Self {
        Operand::Ref(cell.into())
    }

    /// Reference to the cell `offset` cells after this operand's own cell.
    #[inline]
    pub fn rel(offset: Word) -> Self {
        Operand::Ref(Cell::Relative(offset))
    }

    #[inline]
    pub fn cell(self) -> Cell {
        match self {
            Operand::Imm(cell) | Operand::Ref(cell) => cell,
        }
    }

    /// Addressing mode digit.
    #[inline]
    fn mode(self) -> Word {
        match self {
            Operand::Imm(_) => 1,
            Operand::Ref(_) => 0,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Imm(cell) => write!(f, "#{}", cell),
            Operand::Ref(cell) => write!(f, "[{}]", cell),
        }
    }
}

/// Appends instructions to the code block of one function.
pub struct FunctionBuilder<'a> {
    memory: &'a mut Memory,
    code: AddrId,
}

impl<'a> FunctionBuilder<'a> {
    pub fn new(memory: &'a mut Memory, code: AddrId) -> Self {
        Self { memory, code }
    }

    /// Number of cells emitted so far.
    #[inline]
    pub fn size(&self) -> usize {
        self.memory.address(self.code).len()
    }

    #[inline]
    pub fn new_patch(&mut self) -> PatchId {
        self.memory.new_patch()
    }

    #[inline]
    pub fn set_patch(&mut self, patch: PatchId, value: Cell) {
        self.memory.set_patch(patch, value)
    }

    fn emit(&mut self, mnemonic: &str, opcode: Word, operands: &[Operand]) -> EncodeResult {
        let mode: Word = operands
            .iter()
            .zip(MODE_WEIGHTS.iter())
            .map(|(operand, weight)| operand.mode() * weight)
            .sum();

        trace!(
            "{:>6}  {} {}",
            self.size(),
            mnemonic,
            operands.iter().map(|operand| operand.to_string()).collect::<Vec<_>>().join(", ")
        );

        let mut cells = Vec::with_capacity(operands.len() + 1);
        cells.push(Cell::Int(opcode + mode));
        cells.extend(operands.iter().map(|operand| operand.cell()));
        self.memory.append(self.code, &cells)
    }
}

/// Primitive instructions.
impl<'a> FunctionBuilder<'a> {
    pub fn add(&mut self, a: Operand, b: Operand, dest: Operand) -> EncodeResult {
        self.emit("add", OP_ADD, &[a, b, dest])
    }

    pub fn mul(&mut self, a: Operand, b: Operand, dest: Operand) -> EncodeResult {
        self.emit("mul", OP_MUL, &[a, b, dest])
    }

    pub fn div(&mut self, a: Operand, b: Operand, dest: Operand) -> EncodeResult {
        self.emit("div", OP_DIV, &[a, b, dest])
    }

    pub fn input(&mut self, dest: Operand) -> EncodeResult {
        self.emit("in", OP_IN, &[dest])
    }

    pub fn output(&mut self, src: Operand) -> EncodeResult {
        self.emit("out", OP_OUT, &[src])
    }

    /// Jump to `target` when `a >= b`.
    pub fn jge(&mut self, a: Operand, b: Operand, target: Operand) -> EncodeResult {
        self.emit("jge", OP_JGE, &[a, b, target])
    }

    pub fn jump(&mut self, target: Operand) -> EncodeResult {
        self.jge(Operand::imm(0), Operand::imm(0), target)
    }

    /// Copy a value to a destination.
    pub fn mov(&mut self, src: Operand, dest: Operand) -> EncodeResult {
        self.add(Operand::imm(0), src, dest)
    }

    pub fn halt(&mut self) -> EncodeResult {
        self.emit("halt", OP_HALT, &[])
    }
}

/// Stack and calling convention macros.
///
/// The stack grows downward. The stack pointer points at the next free
/// cell, so the top value is at `sp + 1`.
///
/// A frame looks like this, with `bp` pointing at the return address:
///
/// ```text
/// bp + 1 + k   argument k
/// bp           return address
/// bp - 1       caller's base pointer
/// bp - 2 - k   local slot k
/// ```
impl<'a> FunctionBuilder<'a> {
    pub fn push(&mut self, value: Operand) -> EncodeResult {
        self.mov(SP, Operand::rel(4))?;
        self.mov(value, SLOT)?;
        self.add(SP, Operand::imm(-1), SP)
    }

    /// Discard the top of the stack, optionally copying it first.
    pub fn pop(&mut self, dest: Option<Operand>) -> EncodeResult {
        if let Some(dest) = dest {
            self.read_stack(0, dest, SP)?;
        }
        self.add(SP, Operand::imm(1), SP)
    }

    /// Copy the cell at `from + 1 + offset` to `dest`.
    pub fn read_stack(&mut self, offset: Word, dest: Operand, from: Operand) -> EncodeResult {
        self.load_indirect(from, Operand::imm(offset + 1), dest)
    }

    /// Copy `src` to the cell at `from + 1 + offset`.
    pub fn write_stack(&mut self, offset: Word, src: Operand, from: Operand) -> EncodeResult {
        // Address goes into the destination operand of the next instruction.
        self.add(from, Operand::imm(offset + 1), Operand::rel(4))?;
        self.mov(src, SLOT)
    }

    /// Copy the cell at location `base + offset` to `dest`.
    pub fn load_indirect(&mut self, base: Operand, offset: Operand, dest: Operand) -> EncodeResult {
        // Location goes into the source operand of the next instruction.
        self.add(base, offset, Operand::rel(3))?;
        self.mov(SLOT, dest)
    }

    /// Copy `src` to the cell at the location held by `addr`.
    pub fn store_indirect(&mut self, addr: Operand, src: Operand) -> EncodeResult {
        // Location goes into the destination operand of the next instruction.
        self.mov(addr, Operand::rel(4))?;
        self.mov(src, SLOT)
    }

    pub fn read_arg(&mut self, index: usize, dest: Operand) -> EncodeResult {
        self.read_stack(index as Word, dest, BP)
    }

    pub fn read_local(&mut self, slot: usize, dest: Operand) -> EncodeResult {
        self.read_stack(Self::local_offset(slot), dest, BP)
    }

    pub fn write_local(&mut self, slot: usize, src: Operand) -> EncodeResult {
        self.write_stack(Self::local_offset(slot), src, BP)
    }

    /// Offset from `bp + 1` to local slot `slot`.
    #[inline]
    fn local_offset(slot: usize) -> Word {
        -(slot as Word + 3)
    }

    /// Push the return address and jump to the target.
    ///
    /// The callee leaves the return address on the stack, so it's popped
    /// here once control comes back.
    pub fn call(&mut self, target: Operand) -> EncodeResult {
        // The pushed value is the 6th cell of the sequence.
        self.push(Operand::imm(Cell::Relative(CALL_RETURN_OFFSET - 6)))?;
        self.jump(target)?;
        self.pop(None)
    }

    /// Return `value` in r0 to the address on top of the stack.
    pub fn ret(&mut self, value: Operand) -> EncodeResult {
        if value != R0 {
            self.mov(value, R0)?;
        }
        // Return address goes into the target operand of the jump.
        self.read_stack(0, Operand::rel(4), SP)?;
        self.jump(Operand::imm(0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::SectionKind;

    fn cells(memory: &Memory, code: AddrId) -> Vec<Cell> {
        memory.address(code).cells().to_vec()
    }

    #[test]
    fn test_addressing_modes() {
        let mut memory = Memory::new(16, 0).unwrap();
        let code = memory.obtain(SectionKind::Instructions, 0).unwrap();
        let mut f = FunctionBuilder::new(&mut memory, code);

        f.add(R0, Operand::imm(1), R0).unwrap();
        f.mul(Operand::imm(2), R1, R1).unwrap();
        f.jge(Operand::imm(0), Operand::imm(0), Operand::imm(0)).unwrap();
        f.output(Operand::imm(5)).unwrap();
        f.halt().unwrap();

        let opcodes: Vec<Cell> = cells(&memory, code)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| [0, 4, 8, 12, 14].contains(i))
            .map(|(_, cell)| cell)
            .collect();
        assert_eq!(
            opcodes,
            vec![
                Cell::Int(1001),
                Cell::Int(102),
                Cell::Int(11160),
                Cell::Int(104),
                Cell::Int(99)
            ]
        );
    }

    #[test]
    fn test_call_sequence_length() {
        let mut memory = Memory::new(16, 0).unwrap();
        let code = memory.obtain(SectionKind::Instructions, 0).unwrap();
        let mut f = FunctionBuilder::new(&mut memory, code);

        f.call(R0).unwrap();
        // Push and jump, then the pop the return address comes back to.
        assert_eq!(f.size(), CALL_RETURN_OFFSET as usize + 4);
        assert_eq!(cells(&memory, code)[6], Cell::Relative(10));
    }

    #[test]
    fn test_ret_skips_move_from_r0() {
        let mut memory = Memory::new(16, 0).unwrap();
        let code = memory.obtain(SectionKind::Instructions, 0).unwrap();
        let mut f = FunctionBuilder::new(&mut memory, code);

        f.ret(R0).unwrap();
        assert_eq!(f.size(), 12);
        f.ret(R1).unwrap();
        assert_eq!(f.size(), 12 + 16);
    }
}
