//! Reference Intcode machine for running compiled images in tests.
#![allow(dead_code)]

use intlang::{compile_str, constants::*, layout::SectionKind, CompilerConf, Image};
use std::collections::VecDeque;

/// Instructions executed before a run is considered stuck.
const STEP_LIMIT: usize = 1_000_000;

#[derive(Debug)]
pub struct Machine {
    pub memory: Vec<Word>,
    ip: usize,
    /// Location of the stack pointer register, the last cell of the stack.
    sp: Word,
    input: VecDeque<Word>,
    pub output: Vec<Word>,
    /// Stack pointer at the moment of each output.
    pub sp_at_output: Vec<Word>,
}

impl Machine {
    pub fn new(image: &Image) -> Self {
        Self {
            memory: image.cells().to_vec(),
            ip: 0,
            sp: image.section(SectionKind::Stack).end as Word - 1,
            input: VecDeque::new(),
            output: vec![],
            sp_at_output: vec![],
        }
    }

    pub fn with_input(mut self, input: &[Word]) -> Self {
        self.input.extend(input.iter().copied());
        self
    }

    /// Current value of the stack pointer.
    pub fn sp(&self) -> Word {
        self.memory[self.sp as usize]
    }

    fn load(&self, location: Word) -> Result<Word, String> {
        self.memory
            .get(location as usize)
            .copied()
            .filter(|_| location >= 0)
            .ok_or_else(|| format!("read out of bounds at {}", location))
    }

    fn store(&mut self, location: Word, value: Word) -> Result<(), String> {
        if location < 0 || location as usize >= self.memory.len() {
            return Err(format!("write out of bounds at {}", location));
        }
        self.memory[location as usize] = value;
        Ok(())
    }

    /// Value of operand `n` of the current instruction.
    fn param(&self, n: usize) -> Result<Word, String> {
        let raw = self.load((self.ip + 1 + n) as Word)?;
        let opcode = self.load(self.ip as Word)?;
        if (opcode / MODE_WEIGHTS[n]) % 10 == 1 {
            Ok(raw)
        } else {
            self.load(raw)
        }
    }

    /// Destination of operand `n`. Always the raw cell value.
    fn dest(&self, n: usize) -> Result<Word, String> {
        self.load((self.ip + 1 + n) as Word)
    }

    /// Run until halt.
    pub fn run(&mut self) -> Result<(), String> {
        for _ in 0..STEP_LIMIT {
            let opcode = self.load(self.ip as Word)? % 100;
            match opcode {
                OP_ADD | OP_MUL | OP_DIV => {
                    let (a, b) = (self.param(0)?, self.param(1)?);
                    let value = match opcode {
                        OP_ADD => a + b,
                        OP_MUL => a * b,
                        _ if b == 0 => return Err(format!("division by zero at {}", self.ip)),
                        _ => a / b,
                    };
                    let dest = self.dest(2)?;
                    self.store(dest, value)?;
                    self.ip += 4;
                }
                OP_IN => {
                    let value = self.input.pop_front().ok_or("input exhausted")?;
                    let dest = self.dest(0)?;
                    self.store(dest, value)?;
                    self.ip += 2;
                }
                OP_OUT => {
                    let value = self.param(0)?;
                    self.output.push(value);
                    self.sp_at_output.push(self.sp());
                    self.ip += 2;
                }
                OP_JGE => {
                    if self.param(0)? >= self.param(1)? {
                        self.ip = self.param(2)? as usize;
                    } else {
                        self.ip += 4;
                    }
                }
                OP_HALT => return Ok(()),
                other => return Err(format!("invalid opcode {} at {}", other, self.ip)),
            }
        }

        Err("step limit reached".to_string())
    }
}

/// Compile with the default configuration, panicking on errors.
pub fn compile(source: &str) -> Image {
    match compile_str(source, CompilerConf::default()) {
        Ok(image) => image,
        Err(err) => panic!("compile error: {}", err),
    }
}

/// Compile and run a program, returning its output.
pub fn run(source: &str) -> Vec<Word> {
    run_with_input(source, &[])
}

pub fn run_with_input(source: &str, input: &[Word]) -> Vec<Word> {
    let image = compile(source);
    let mut machine = Machine::new(&image).with_input(input);
    if let Err(err) = machine.run() {
        panic!("runtime error: {}", err);
    }
    machine.output
}
