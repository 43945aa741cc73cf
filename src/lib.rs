#![allow(clippy::module_inception)]

//! lua2c - a static Lua-to-C translator.
//!
//! The crate takes a parsed Lua AST and emits C source text. Lua carries no
//! static types, so the translator reconstructs them: a scope-aware symbol
//! table ([`symtab`]), a best-effort type-inference engine ([`inference`]),
//! and a code generator ([`translate`]) that decides, for every identifier,
//! whether this is its declaration site and which C type to declare it with.
//!
//! Lexing and parsing are external: callers hand in an [`ast::ast::AstNode`]
//! program and an output sink.

use std::rc::Rc;

pub mod ast;
pub mod errors;
pub mod inference;
pub mod symtab;
pub mod translate;

/// A source position: line number plus the text of that line.
///
/// Diagnostics carry a `Position` when the AST producer supplied one;
/// [`Position::null`] marks "no position available".
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::new()))
    }

    /// Whether this position carries real source information.
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn test_null_position() {
        let pos = Position::null();
        assert!(pos.is_null());
        assert_eq!(pos.0, 0);
    }

    #[test]
    fn test_real_position() {
        let pos = Position(12, std::rc::Rc::new(String::from("x = io.read()")));
        assert!(!pos.is_null());
        assert_eq!(&*pos.1, "x = io.read()");
    }
}
