//! Scope and symbol storage.

use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;

use crate::ast::types::LuaType;
use crate::Position;

/// What kind of name a symbol binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    Return,
}

/// One entry in a scope's symbol table.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: LuaType,
    pub kind: SymbolKind,
    /// Source line number of the declaration, for diagnostics.
    pub lineno: u32,
    /// Source line text of the declaration, for diagnostics.
    pub line: Rc<String>,
    /// Whether the declaration has been emitted to the output.
    pub used: bool,
    /// For functions: the unified per-position parameter types collected
    /// from call sites.
    pub param_types: Option<Vec<LuaType>>,
}

impl Symbol {
    pub fn new(name: &str, ty: LuaType, kind: SymbolKind, pos: &Position) -> Self {
        Symbol {
            name: name.to_string(),
            ty,
            kind,
            lineno: pos.0,
            line: Rc::clone(&pos.1),
            used: false,
            param_types: None,
        }
    }
}

/// One lexical scope: a name-unique symbol map plus its nesting level.
#[derive(Debug)]
pub struct Scope {
    pub level: u32,
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    fn new(level: u32) -> Self {
        Scope {
            level,
            symbols: HashMap::new(),
        }
    }
}

/// The scope chain, kept as a strict stack: the root scope sits at the
/// bottom and the innermost open block on top. The stack position of a
/// scope is its parent link.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Creates a stack holding only the root scope (level 0).
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::new(0)],
        }
    }

    /// Opens a fresh child scope and returns its level.
    pub fn push_scope(&mut self) -> u32 {
        let level = self.scopes.len() as u32;
        self.scopes.push(Scope::new(level));
        level
    }

    /// Closes the innermost scope, releasing its symbols. The root scope is
    /// never popped.
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "attempted to pop the root scope");
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// The nesting level of the innermost open scope.
    pub fn level(&self) -> u32 {
        self.scopes.len() as u32 - 1
    }

    /// Inserts a symbol into the innermost scope. A name already present in
    /// the same scope is silently overwritten (last write wins).
    pub fn insert(&mut self, symbol: Symbol) {
        let scope = self.scopes.last_mut().unwrap();
        scope.symbols.insert(symbol.name.clone(), symbol);
    }

    /// Inserts a symbol into the root scope; used for function names, which
    /// are global regardless of where their definition is generated.
    pub fn insert_in_root(&mut self, symbol: Symbol) {
        let scope = self.scopes.first_mut().unwrap();
        scope.symbols.insert(symbol.name.clone(), symbol);
    }

    /// Searches only the innermost scope.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().unwrap().symbols.get(name)
    }

    /// Searches the whole chain, innermost-first; the first match wins, so
    /// an inner symbol shadows an outer one of the same name. A miss is not
    /// an error: callers interpret it contextually, as "nil" when typing an
    /// expression and as "declare now" when generating an assignment.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    /// Mutable chain lookup, innermost-first.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.symbols.get_mut(name))
    }

    /// Renders the innermost scope as text, in the shape of the original
    /// symbol-table dump. Handy in tests and when debugging inference.
    pub fn dump(&self) -> String {
        let scope = self.scopes.last().unwrap();
        let mut out = String::new();
        writeln!(out, "SYMBOL TABLE \t scope: {}", scope.level).unwrap();
        writeln!(out, "---------------------------").unwrap();
        let mut names: Vec<&String> = scope.symbols.keys().collect();
        names.sort();
        for name in names {
            let sym = &scope.symbols[name];
            writeln!(out, "symbol: {} \t type: {}", sym.name, sym.ty).unwrap();
        }
        writeln!(out, "---------------------------").unwrap();
        out
    }
}
