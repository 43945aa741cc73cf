//! The generation context and run driver.
//!
//! All mutable state of a run lives in [`Translator`]: the output sink, the
//! scope chain, the indentation depth, the synthetic table-key counter and
//! the diagnostics collector. Independent runs share nothing.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use crate::ast::ast::{AstNode, FunctionDef};
use crate::ast::types::LuaType;
use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::{Error, ErrorImpl};
use crate::inference::hints::collect_param_hints;
use crate::inference::inference::{eval_expr_type, infer_func_return_type, ReturnType};
use crate::symtab::symtab::{ScopeStack, Symbol, SymbolKind};
use crate::Position;

use super::stdlib::RUNTIME_PRELUDE;
use super::stmt::gen_statement;

/// Maps a Lua type onto its C spelling.
pub fn c_type(ty: LuaType) -> &'static str {
    match ty {
        LuaType::Integer => "int",
        LuaType::Float | LuaType::Number => "float",
        LuaType::Boolean => "bool",
        LuaType::String => "char*",
        LuaType::Table => "lua_field",
        LuaType::Nil | LuaType::Function | LuaType::Dynamic => "void*",
    }
}

/// The state of one generation run.
pub struct Translator<W: io::Write> {
    out: W,
    pub scopes: ScopeStack,
    pub diags: Diagnostics,
    /// Block nesting depth, in units of one four-space indent.
    pub depth: u32,
    /// Per-position parameter types collected from call sites before
    /// generation starts.
    pub hints: HashMap<String, Vec<LuaType>>,
    table_key_counter: u32,
}

impl<W: io::Write> Translator<W> {
    pub fn new(out: W) -> Self {
        Translator {
            out,
            scopes: ScopeStack::new(),
            diags: Diagnostics::new(),
            depth: 0,
            hints: HashMap::new(),
            table_key_counter: 0,
        }
    }

    /// A translator that collects diagnostics without printing them.
    pub fn silent(out: W) -> Self {
        Translator {
            diags: Diagnostics::silent(),
            ..Translator::new(out)
        }
    }

    /// Writes raw text to the sink. A write failure is fatal.
    pub fn emit(&mut self, text: &str) -> Result<(), Error> {
        io::Write::write_all(&mut self.out, text.as_bytes()).map_err(|e| {
            Error::new(
                ErrorImpl::OutputSink {
                    message: e.to_string(),
                },
                Position::null(),
            )
        })
    }

    /// Writes one indented line, terminated by a newline.
    pub fn line(&mut self, text: &str) -> Result<(), Error> {
        for _ in 0..self.depth {
            self.emit("    ")?;
        }
        self.emit(text)?;
        self.emit("\n")
    }

    /// The next synthetic key for an unkeyed table field. Monotonic for the
    /// whole run.
    pub fn next_table_key(&mut self) -> u32 {
        let key = self.table_key_counter;
        self.table_key_counter += 1;
        key
    }

    /// Runs the whole generation pass: the runtime prelude, every function
    /// definition in source order, then the remaining top-level statements
    /// wrapped in `main`.
    pub fn run(&mut self, program: &[AstNode]) -> Result<(), Error> {
        self.hints = collect_param_hints(program);

        self.emit(RUNTIME_PRELUDE)?;

        for stmt in program {
            if let AstNode::FunctionDef(fdef) = stmt {
                self.gen_function_def(fdef)?;
            }
        }

        self.emit("int main() {\n")?;
        self.scopes.push_scope();
        self.depth += 1;
        for stmt in program {
            if matches!(stmt, AstNode::FunctionDef(_)) {
                continue;
            }
            self.absorb(stmt)?;
        }
        self.depth -= 1;
        self.scopes.pop_scope();
        self.emit("    return 0;\n}\n")?;
        self.finish()
    }

    /// Flushes the sink. Buffered sinks only surface write failures here,
    /// so skipping this would turn a short write into a silent success.
    fn finish(&mut self) -> Result<(), Error> {
        io::Write::flush(&mut self.out).map_err(|e| {
            Error::new(
                ErrorImpl::OutputSink {
                    message: e.to_string(),
                },
                Position::null(),
            )
        })
    }

    /// Generates one statement, absorbing hard errors: the construct is
    /// abandoned with a stub comment and the run continues. Only fatal
    /// errors propagate.
    pub fn absorb(&mut self, stmt: &AstNode) -> Result<(), Error> {
        if let Err(err) = gen_statement(self, stmt) {
            if err.is_fatal() {
                return Err(err);
            }
            self.diags.error(&err);
            self.line("/* untranslated statement */")?;
        }
        Ok(())
    }

    fn gen_function_def(&mut self, fdef: &FunctionDef) -> Result<(), Error> {
        // Parameter types come from the call-site hints; a defaulted
        // parameter falls back to its default expression's type.
        let hinted: Vec<LuaType> = self.hints.get(&fdef.name).cloned().unwrap_or_default();
        let mut param_types = Vec::with_capacity(fdef.params.len());
        for (i, param) in fdef.params.iter().enumerate() {
            let mut ty = hinted.get(i).copied().unwrap_or(LuaType::Dynamic);
            if ty == LuaType::Dynamic {
                if let Some(default) = &param.default {
                    ty = eval_expr_type(default, &self.scopes, &mut self.diags).ty;
                }
            }
            if ty == LuaType::Dynamic {
                self.diags.warning(
                    &format!(
                        "cannot infer type of parameter `{}` of `{}`, using void*",
                        param.name, fdef.name
                    ),
                    Some(&fdef.pos),
                );
            }
            param_types.push(ty);
        }

        // Pre-register the function so recursive calls in the body resolve
        // to something; the final type lands after inference.
        let mut fsym = Symbol::new(&fdef.name, LuaType::Dynamic, SymbolKind::Function, &fdef.pos);
        fsym.used = true;
        fsym.param_types = Some(param_types.clone());
        self.scopes.insert_in_root(fsym);

        // The body is typed with the parameters in scope.
        self.scopes.push_scope();
        for (param, ty) in fdef.params.iter().zip(&param_types) {
            let mut sym = Symbol::new(&param.name, *ty, SymbolKind::Parameter, &fdef.pos);
            sym.used = true;
            self.scopes.insert(sym);
        }

        let ret = match fdef.ret_type {
            Some(ty) => ReturnType::Known(ty),
            None => infer_func_return_type(&fdef.body, &self.scopes, &mut self.diags),
        };
        let (ret_spelling, ret_ty) = match ret {
            ReturnType::Known(LuaType::Nil) | ReturnType::Pending => ("void", LuaType::Nil),
            ReturnType::Known(ty) => (c_type(ty), ty),
            ReturnType::Conflict => ("void*", LuaType::Dynamic),
        };
        if let Some(sym) = self.scopes.lookup_mut(&fdef.name) {
            sym.ty = ret_ty;
        }

        let params: Vec<String> = fdef
            .params
            .iter()
            .zip(&param_types)
            .map(|(param, ty)| format!("{} {}", c_type(*ty), param.name))
            .collect();
        self.emit(&format!(
            "{} {}({}) {{\n",
            ret_spelling,
            fdef.name,
            params.join(", ")
        ))?;

        self.depth += 1;
        for stmt in &fdef.body {
            self.absorb(stmt)?;
        }
        self.depth -= 1;
        self.scopes.pop_scope();
        self.emit("}\n")
    }
}

/// Translates a whole program into the given sink, returning the collected
/// diagnostics of the run.
pub fn translate<W: io::Write>(program: &[AstNode], out: W) -> Result<Diagnostics, Error> {
    let mut tr = Translator::new(out);
    tr.run(program)?;
    Ok(tr.diags)
}

/// Translates a whole program into a file. Failure to create the file is
/// the one fatal, run-aborting error.
pub fn translate_to_file(program: &[AstNode], path: &Path) -> Result<Diagnostics, Error> {
    let file = File::create(path).map_err(|e| {
        Error::new(
            ErrorImpl::OutputSink {
                message: format!("{}: {}", path.display(), e),
            },
            Position::null(),
        )
    })?;
    translate(program, BufWriter::new(file))
}
