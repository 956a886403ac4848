//! Constant values of the Intcode target and the compiler's memory layout.

/// Machine word. Every memory cell of the target holds one.
pub type Word = i64;

// ----------------------------------------------------------------------------
// Opcodes

pub const OP_ADD: Word = 1;
pub const OP_MUL: Word = 2;
pub const OP_IN: Word = 3;
pub const OP_OUT: Word = 4;
pub const OP_DIV: Word = 50;
/// `JGE a, b, target`: jump to `target` when `a >= b`.
pub const OP_JGE: Word = 60;
pub const OP_HALT: Word = 99;

/// Decimal weight of the addressing-mode digit for each operand position.
///
/// A digit of 1 marks the operand as a literal value, 0 as a memory
/// reference that the CPU dereferences.
pub const MODE_WEIGHTS: [Word; 3] = [100, 1_000, 10_000];

// ----------------------------------------------------------------------------
// Stack section

/// Cells reserved at address 0 for the jump into the entry point.
pub const JUMP_VECTOR_SIZE: usize = 4;

/// General purpose registers `r0` to `r3`, followed by the base and stack pointer.
pub const GENERAL_REGISTER_COUNT: usize = 4;
pub const REGISTER_COUNT: usize = GENERAL_REGISTER_COUNT + 2;

// ----------------------------------------------------------------------------
// Globals section

/// Cells at the start of the globals section holding the start address of
/// each section: stack, instructions, globals, heap.
pub const SECTION_HEADER_SIZE: usize = 4;

// ----------------------------------------------------------------------------
// Calling convention

/// Cells from the start of a call sequence to its return point.
///
/// The sequence is a `push` (three 4-cell instructions) of the return
/// address followed by a 4-cell unconditional jump.
pub const CALL_RETURN_OFFSET: Word = 16;

/// Distance from the stack pointer, right after the caller's base pointer
/// has been saved, to the return address slot.
pub const FRAME_LINK_SIZE: Word = 2;

// ----------------------------------------------------------------------------
// Parsing

/// Deepest nesting of expressions and if statements the parser accepts.
///
/// Parsing and code generation recurse once per level, so this bounds
/// their stack use.
pub const MAX_NESTING_DEPTH: usize = 256;

// ----------------------------------------------------------------------------
// Defaults

pub const DEFAULT_STACK_SIZE: usize = 2 * 1024;
pub const DEFAULT_HEAP_SIZE: usize = 4 * 1024;

/// Name of the function the entry stub calls.
pub const ENTRY_POINT: &str = "main";
