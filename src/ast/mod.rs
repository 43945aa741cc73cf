/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Core AST node definitions and builders
/// - types: The Lua type vocabulary and the literal inference rule
pub mod ast;
pub mod types;
