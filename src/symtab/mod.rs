//! Symbol table module.
//!
//! Implements the scope chain: one table of symbols per lexical block,
//! stacked to mirror block nesting. The code generator pushes a scope when
//! it enters a function body, an if branch or a loop body, and pops it when
//! that block's statements are done. Lookup walks innermost-first, so inner
//! declarations shadow outer ones.

pub mod symtab;
