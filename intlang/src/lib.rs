//! Compiler from intlang source code to Intcode memory images.
//!
//! The pipeline runs left to right through the modules: [`lex`] splits the
//! source into tokens, [`parsing`] builds the syntax tree, [`compile`]
//! lowers it to instructions laid out in the [`layout`] memory model, and
//! [`compile::finalize`] resolves the finished image.
pub mod compile;
pub mod constants;
pub mod error;
pub mod layout;
pub mod lex;
pub mod parsing;
pub mod token_stream;
pub mod tokens;

pub use compile::Image;
pub use error::{IntlangError, IntlangResult};

use constants::{DEFAULT_HEAP_SIZE, DEFAULT_STACK_SIZE};
use log::debug;

pub mod prelude {
    pub use super::{compile_str, CompilerConf, Image, IntlangError, IntlangResult};
    pub use crate::layout::SectionKind;
}

/// Sizes of the sections that don't depend on the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConf {
    /// Total cells of the stack section, including the jump vector and
    /// the registers.
    pub stack_size: usize,
    pub heap_size: usize,
}

impl Default for CompilerConf {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            heap_size: DEFAULT_HEAP_SIZE,
        }
    }
}

/// Compile source code into an image.
pub fn compile_str(source: &str, conf: CompilerConf) -> IntlangResult<Image> {
    // Lexical analysis
    let tokens = lex::tokenize(source)?;
    debug!("{} tokens", tokens.len());

    // Syntactic analysis
    let program = parsing::parse_program(&tokens)?;
    debug!("{} top level definitions", program.items.len());

    // Semantic analysis and code generation
    compile::Compiler::new(conf)?.compile(&program)
}
