//! Lowering of the syntax tree to instructions.
//!
//! Expressions are evaluated on the stack: every expression pushes exactly
//! one value. Binary operators pop their operands into r0 and r1, leave the
//! result in r0 and push it back.
use super::{
    encoder::{EncodeResult, FunctionBuilder, Operand, BP, R0, R1, R2, SP},
    finalize::{finalize, Image},
    scope::{Binding, Global, GlobalScope, LocalScope},
};
use crate::{
    constants::{Word, ENTRY_POINT, FRAME_LINK_SIZE},
    error::{IntlangError, IntlangResult},
    layout::{AddrId, Cell, Memory, SectionKind},
    parsing::{
        AddOp, Assign, Atom, AtomBase, Binary, CmpOp, Expr, FuncDef, Ident, IfStmt, Item, Logical, LogicalOp,
        MulOp, Program, Stmt,
    },
    CompilerConf,
};
use log::debug;

/// Jump target just past the next 4-cell instruction, when used as the
/// target operand of a `jge`.
const SKIP_NEXT: Operand = Operand::Imm(Cell::Relative(5));

/// Compiles one program into an image.
///
/// Holds all state of a compilation, so separate compilations never share
/// scopes or memory.
pub struct Compiler {
    memory: Memory,
    globals: GlobalScope,
}

impl Compiler {
    pub fn new(conf: CompilerConf) -> IntlangResult<Self> {
        Ok(Self {
            memory: Memory::new(conf.stack_size, conf.heap_size)?,
            globals: GlobalScope::default(),
        })
    }

    pub fn compile(mut self, program: &Program) -> IntlangResult<Image> {
        self.add_builtins()?;

        // Everything is registered up front so functions and globals can
        // reference each other regardless of definition order.
        let mut functions = vec![];
        for item in &program.items {
            match item {
                Item::Func(func) => {
                    let code = self.memory.obtain(SectionKind::Instructions, 0)?;
                    debug!("register function {}", func.name.name);
                    self.globals.insert(func.name.name.clone(), Global::Label(code));
                    functions.push((func, code));
                }
                Item::Global(global) => {
                    let addr = self
                        .memory
                        .obtain_cells(SectionKind::Globals, vec![Cell::Int(global.value)])?;
                    debug!("register global {} = {}", global.name.name, global.value);
                    self.globals.insert(global.name.name.clone(), Global::Var(addr));
                }
            }
        }

        for (func, code) in &functions {
            self.compile_function(func, *code)?;
        }

        let main = match self.globals.get(ENTRY_POINT) {
            Some(Global::Label(addr)) if functions.iter().any(|(_, code)| *code == addr) => addr,
            _ => return Err(IntlangError::MissingEntryPoint),
        };
        self.add_entry_stub(main)?;

        finalize(self.memory)
    }

    /// Functions and globals every program can use.
    fn add_builtins(&mut self) -> IntlangResult<()> {
        // print(x): write x to the output and return it.
        let code = self.memory.obtain(SectionKind::Instructions, 0)?;
        let mut f = FunctionBuilder::new(&mut self.memory, code);
        // Argument 0 sits right above the return address.
        f.read_stack(1, R0, SP)?;
        f.output(R0)?;
        f.ret(R0)?;
        self.globals.insert("print".into(), Global::Label(code));

        // input(): read one value from the input and return it.
        let code = self.memory.obtain(SectionKind::Instructions, 0)?;
        let mut f = FunctionBuilder::new(&mut self.memory, code);
        f.input(R0)?;
        f.ret(R0)?;
        self.globals.insert("input".into(), Global::Label(code));

        // Start location of each section: stack, instructions, globals, heap.
        self.globals
            .insert("_sections".into(), Global::Label(self.memory.header()));

        Ok(())
    }

    /// Call `main` and halt. The jump vector points here.
    fn add_entry_stub(&mut self, main: AddrId) -> IntlangResult<()> {
        let code = self.memory.obtain(SectionKind::Instructions, 0)?;
        let mut f = FunctionBuilder::new(&mut self.memory, code);
        f.call(Operand::imm(main))?;
        f.halt()?;
        self.memory.set_entry_point(code)?;
        Ok(())
    }

    fn compile_function(&mut self, func: &FuncDef, code: AddrId) -> IntlangResult<()> {
        debug!("compile function {}({} params)", func.name.name, func.params.len());

        let mut c = FunctionCompiler {
            f: FunctionBuilder::new(&mut self.memory, code),
            globals: &self.globals,
            scope: LocalScope::with_params(func.params.iter().map(|param| &param.name)),
        };

        // Locals are only all known once the body is compiled.
        let frame = c.f.new_patch();

        c.f.push(BP)?;
        c.f.add(Operand::imm(FRAME_LINK_SIZE), SP, BP)?;
        c.f.add(SP, Operand::imm(Cell::Patch(frame)), SP)?;

        for stmt in &func.body {
            c.stmt(stmt)?;
        }

        let frame_size = c.scope.frame_size() as Word;
        debug!("function {} frame size {}", func.name.name, frame_size);
        c.f.set_patch(frame, Cell::Int(-frame_size));

        c.f.add(SP, Operand::imm(frame_size), SP)?;
        c.f.pop(Some(BP))?;
        c.f.ret(R0)?;

        Ok(())
    }
}

/// Lowering state of one function body.
struct FunctionCompiler<'a> {
    f: FunctionBuilder<'a>,
    globals: &'a GlobalScope,
    scope: LocalScope,
}

impl<'a> FunctionCompiler<'a> {
    fn stmt(&mut self, stmt: &Stmt) -> IntlangResult<()> {
        match stmt {
            Stmt::Expr(expr) => {
                expr.lower(self)?;
                // The last value stays in r0, to be returned.
                self.f.pop(Some(R0))?;
            }
            Stmt::Assign(assign) => self.assign(assign)?,
            Stmt::If(if_stmt) => self.if_stmt(if_stmt)?,
        }
        Ok(())
    }

    fn assign(&mut self, assign: &Assign) -> IntlangResult<()> {
        assign.value.lower(self)?;

        match assign.indices.split_last() {
            None => {
                self.f.pop(Some(R0))?;
                self.store(&assign.target, R0)
            }
            Some((last, rest)) => {
                // The value stays on the stack while the target address
                // is computed.
                self.load(&assign.target, R0)?;
                self.f.push(R0)?;

                for index in rest {
                    index.lower(self)?;
                    self.f.pop(Some(R1))?;
                    self.f.pop(Some(R0))?;
                    self.f.load_indirect(R0, R1, R0)?;
                    self.f.push(R0)?;
                }

                last.lower(self)?;
                self.f.pop(Some(R1))?;
                self.f.pop(Some(R0))?;
                self.f.add(R0, R1, R0)?;

                self.f.pop(Some(R1))?;
                self.f.store_indirect(R0, R1)?;
                Ok(())
            }
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) -> IntlangResult<()> {
        let else_target = self.f.new_patch();
        let end_target = self.f.new_patch();

        if_stmt.cond.lower(self)?;
        self.f.pop(Some(R0))?;
        self.f.jge(Operand::imm(0), R0, Operand::imm(Cell::Patch(else_target)))?;

        // Jump distances are relative to the target cell, which is the
        // last cell before each block.
        let start = self.f.size();
        for stmt in &if_stmt.then_body {
            self.stmt(stmt)?;
        }
        self.f.jump(Operand::imm(Cell::Patch(end_target)))?;
        let else_start = self.f.size();
        self.f
            .set_patch(else_target, Cell::Relative((else_start - start + 1) as Word));

        for stmt in &if_stmt.else_body {
            self.stmt(stmt)?;
        }
        let end = self.f.size();
        self.f
            .set_patch(end_target, Cell::Relative((end - else_start + 1) as Word));

        Ok(())
    }

    /// Copy the value of a name to `dest`.
    fn load(&mut self, ident: &Ident, dest: Operand) -> IntlangResult<()> {
        match self.scope.get(&ident.name) {
            Some(Binding::Param(index)) => self.f.read_arg(index, dest)?,
            Some(Binding::Local(slot)) => self.f.read_local(slot, dest)?,
            None => match self.globals.get(&ident.name) {
                Some(Global::Var(addr)) => self.f.mov(Operand::at(addr), dest)?,
                Some(Global::Label(addr)) => self.f.mov(Operand::imm(addr), dest)?,
                None => {
                    return Err(IntlangError::UndefinedVariable {
                        name: ident.name.clone(),
                        line: ident.line,
                    })
                }
            },
        }
        Ok(())
    }

    /// Copy `src` to a name, declaring a new local if the name is unknown.
    fn store(&mut self, ident: &Ident, src: Operand) -> IntlangResult<()> {
        match self.scope.get(&ident.name) {
            Some(Binding::Param(_)) => {
                return Err(IntlangError::ReadOnlyVariable {
                    name: ident.name.clone(),
                    line: ident.line,
                })
            }
            Some(Binding::Local(slot)) => self.f.write_local(slot, src)?,
            None => match self.globals.get(&ident.name) {
                Some(Global::Var(addr)) => self.f.mov(src, Operand::at(addr))?,
                // Labels are stored through, into the block's first cell.
                Some(Global::Label(addr)) => self.f.mov(src, Operand::imm(addr))?,
                None => {
                    let slot = self.scope.declare_local(ident.name.clone());
                    debug!("declare local {} in slot {}", ident.name, slot);
                    self.f.write_local(slot, src)?;
                }
            },
        }
        Ok(())
    }

    /// Replace the top of the stack with 1 when it's at most zero,
    /// otherwise 0.
    fn not(&mut self) -> IntlangResult<()> {
        self.f.pop(Some(R0))?;
        self.f.mov(Operand::imm(1), R2)?;
        self.f.jge(Operand::imm(0), R0, SKIP_NEXT)?;
        self.f.mov(Operand::imm(0), R2)?;
        self.f.push(R2)?;
        Ok(())
    }

    /// Store a list's elements in fresh local slots and push the location
    /// of the first one.
    fn list(&mut self, elements: &[Expr]) -> IntlangResult<()> {
        let len = elements.len();
        let first = self.scope.alloc_slots(len);

        // Slots are laid out downward, so the last element takes the first
        // slot and element 0 ends up at the lowest location.
        for (index, element) in elements.iter().enumerate().rev() {
            element.lower(self)?;
            self.f.pop(Some(R0))?;
            self.f.write_local(first + len - 1 - index, R0)?;
        }

        // Location of slot `first + len - 1`.
        let base = -((first + len + 1) as Word);
        self.f.add(BP, Operand::imm(base), R0)?;
        self.f.push(R0)?;
        Ok(())
    }

    /// Call the address on top of the stack with the arguments below it,
    /// then replace them all with the return value.
    fn call(&mut self, arg_count: usize) -> IntlangResult<()> {
        self.f.pop(Some(R0))?;
        self.f.call(R0)?;
        self.f.add(SP, Operand::imm(arg_count as Word), SP)?;
        self.f.push(R0)?;
        Ok(())
    }
}

/// Syntax node that pushes one value when lowered.
trait Lower {
    fn lower(&self, c: &mut FunctionCompiler) -> IntlangResult<()>;
}

/// Binary operator that computes `r0 = r0 op r1`.
trait Apply: Copy {
    fn apply(self, f: &mut FunctionBuilder) -> EncodeResult;
}

impl Lower for Logical {
    fn lower(&self, c: &mut FunctionCompiler) -> IntlangResult<()> {
        self.lhs.lower(c)?;
        if self.not {
            c.not()?;
        }

        if let Some((op, rhs)) = &self.rhs {
            rhs.lower(c)?;
            c.f.pop(Some(R1))?;
            c.f.pop(Some(R0))?;
            op.apply(&mut c.f)?;
            c.f.push(R0)?;
        }

        Ok(())
    }
}

impl<T, Op> Lower for Binary<T, Op>
where
    T: Lower,
    Op: Apply,
{
    fn lower(&self, c: &mut FunctionCompiler) -> IntlangResult<()> {
        self.lhs.lower(c)?;

        if let Some((op, rhs)) = &self.rhs {
            rhs.lower(c)?;
            c.f.pop(Some(R1))?;
            c.f.pop(Some(R0))?;
            op.apply(&mut c.f)?;
            c.f.push(R0)?;
        }

        Ok(())
    }
}

impl Lower for Atom {
    fn lower(&self, c: &mut FunctionCompiler) -> IntlangResult<()> {
        // Arguments go in reverse, so argument 0 ends up nearest the callee.
        if let Some(args) = &self.call {
            for arg in args.iter().rev() {
                arg.lower(c)?;
            }
        }

        match &self.base {
            AtomBase::Paren(expr) => expr.lower(c)?,
            AtomBase::List(elements) => c.list(elements)?,
            AtomBase::Ident(ident) => {
                c.load(ident, R0)?;
                c.f.push(R0)?;
            }
            AtomBase::Int(value) => c.f.push(Operand::imm(*value))?,
        }

        if let Some(args) = &self.call {
            c.call(args.len())?;
        }

        for index in &self.indices {
            index.lower(c)?;
            c.f.pop(Some(R1))?;
            c.f.pop(Some(R0))?;
            c.f.load_indirect(R0, R1, R0)?;
            c.f.push(R0)?;
        }

        Ok(())
    }
}

impl Apply for LogicalOp {
    fn apply(self, f: &mut FunctionBuilder) -> EncodeResult {
        match self {
            // Exact for operands of 0 and 1.
            LogicalOp::And => f.mul(R0, R1, R0),
            LogicalOp::Or => f.add(R0, R1, R0),
        }
    }
}

impl Apply for AddOp {
    fn apply(self, f: &mut FunctionBuilder) -> EncodeResult {
        match self {
            AddOp::Add => f.add(R0, R1, R0),
            AddOp::Sub => {
                f.mul(R1, Operand::imm(-1), R1)?;
                f.add(R0, R1, R0)
            }
        }
    }
}

impl Apply for MulOp {
    fn apply(self, f: &mut FunctionBuilder) -> EncodeResult {
        match self {
            MulOp::Mul => f.mul(R0, R1, R0),
            MulOp::Div => f.div(R0, R1, R0),
        }
    }
}

impl Apply for CmpOp {
    /// Comparisons produce exactly 0 or 1.
    fn apply(self, f: &mut FunctionBuilder) -> EncodeResult {
        match self {
            CmpOp::Eq => {
                f.mov(Operand::imm(1), R2)?;
                f.jge(R0, R1, SKIP_NEXT)?;
                f.mov(Operand::imm(0), R2)?;
                f.jge(R1, R0, SKIP_NEXT)?;
                f.mov(Operand::imm(0), R2)?;
                return f.mov(R2, R0);
            }
            CmpOp::NotEq => {
                f.mov(Operand::imm(0), R2)?;
                f.jge(R0, R1, SKIP_NEXT)?;
                f.mov(Operand::imm(1), R2)?;
                f.jge(R1, R0, SKIP_NEXT)?;
                f.mov(Operand::imm(1), R2)?;
                return f.mov(R2, R0);
            }
            // The remaining comparisons compute a difference in r0 that is
            // positive exactly when the comparison holds.
            CmpOp::Lt => {
                f.mul(R0, Operand::imm(-1), R0)?;
                f.add(R0, R1, R0)?;
            }
            CmpOp::LtEq => {
                f.add(R1, Operand::imm(1), R1)?;
                f.mul(R0, Operand::imm(-1), R0)?;
                f.add(R0, R1, R0)?;
            }
            CmpOp::Gt => {
                f.mul(R1, Operand::imm(-1), R1)?;
                f.add(R0, R1, R0)?;
            }
            CmpOp::GtEq => {
                f.add(R0, Operand::imm(1), R0)?;
                f.mul(R1, Operand::imm(-1), R1)?;
                f.add(R0, R1, R0)?;
            }
        }

        f.mov(Operand::imm(1), R2)?;
        f.jge(R0, Operand::imm(1), SKIP_NEXT)?;
        f.mov(Operand::imm(0), R2)?;
        f.mov(R2, R0)
    }
}
