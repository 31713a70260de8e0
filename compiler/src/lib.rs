//! visitgen-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for the single-quoted schema notation,
//!  2) A two-pass declaration collector building a `TypeRegistry`
//!     (enum-like names first, so references may point forward),
//!  3) A registry verifier (duplicate names, undeclared types),
//!  4) C visitor code generation (`compile_schema_to_c` → header + source text),
//!  5) Error types (`GenError` and the per-stage taxonomies).

pub mod error;
pub mod types;
pub mod utils;
pub mod mangle;
pub mod tokenizer;
pub mod parser;
pub mod printer;
pub mod registry;
pub mod verifier;
pub mod writer;
pub mod gen_c;
pub mod compiler;

pub use compiler::compile_schema;
pub use compiler::compile_schema_to_c;
pub use error::GenError;
pub use gen_c::{compile_registry_to_c, Emitter, GeneratedCode, GeneratorOptions};
pub use registry::TypeRegistry;
