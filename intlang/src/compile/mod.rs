//! Semantic analysis and code generation.
mod codegen;
mod encoder;
mod finalize;
mod scope;

pub use codegen::Compiler;
pub use encoder::{FunctionBuilder, Operand};
pub use finalize::{finalize, Image};
pub use scope::{Binding, Global, GlobalScope, LocalScope};
