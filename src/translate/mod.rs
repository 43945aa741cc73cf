//! C code generation.
//!
//! A single depth-first, source-order pass over the program:
//!
//! - [`translate`]: the generation context and the run driver
//! - [`stmt`]: per-statement generation, including the declare-once policy
//! - [`expr`]: expression rendering to C text
//! - [`stdlib`]: the runtime-support prelude and the print/read builtin
//!   expansions

pub mod expr;
pub mod stdlib;
pub mod stmt;
pub mod translate;
