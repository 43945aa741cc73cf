//! Statement generation.
//!
//! This is where the declare-once policy lives: an assignment whose target
//! misses the whole scope chain is that variable's declaration site, typed
//! by inference and registered in the current scope. An explicit `local`
//! always declares in the current scope, shadowing any outer binding.

use std::io;

use crate::ast::ast::{AstNode, Declaration, ExprOp, ForNode, IfNode, Variable};
use crate::ast::types::LuaType;
use crate::errors::errors::Error;
use crate::inference::inference::eval_expr_type;
use crate::symtab::symtab::{Symbol, SymbolKind};

use super::expr::gen_expression;
use super::translate::{c_type, Translator};

/// Generates one statement. Hard errors propagate to the caller, which
/// abandons the construct; only sink failures are fatal.
pub fn gen_statement<W: io::Write>(tr: &mut Translator<W>, stmt: &AstNode) -> Result<(), Error> {
    match stmt {
        AstNode::Expr(e) if e.op == ExprOp::Assign => {
            let target = e.left.as_deref();
            match target {
                Some(AstNode::Variable(var)) => gen_assignment(tr, var, &e.right),
                _ => {
                    // An assignment without a variable target cannot
                    // declare anything; emit it as a bare expression.
                    let rendered = gen_expression(tr, stmt)?;
                    tr.line(&format!("{};", rendered))
                }
            }
        }

        AstNode::Declaration(decl) => gen_declaration(tr, decl),

        AstNode::Return(ret) => {
            if ret.exprs.len() > 1 {
                tr.diags.warning(
                    "multiple return values are not translated, only the first is kept",
                    None,
                );
            }
            match ret.exprs.first() {
                Some(expr) => {
                    let rendered = gen_expression(tr, expr)?;
                    tr.line(&format!("return {};", rendered))
                }
                None => tr.line("return;"),
            }
        }

        AstNode::FunctionCall(_) => {
            let rendered = gen_expression(tr, stmt)?;
            tr.line(&format!("{};", rendered))
        }

        AstNode::If(ifn) => gen_if(tr, ifn),

        AstNode::For(forn) => gen_for(tr, forn),

        AstNode::FunctionDef(fdef) => {
            // Only top-level definitions are emitted as C functions.
            tr.diags.warning(
                &format!("nested function `{}` is not translated", fdef.name),
                Some(&fdef.pos),
            );
            tr.line(&format!("/* nested function {} */", fdef.name))
        }

        AstNode::Error => tr.line("/* unparsed statement */"),

        // A value, variable, operator expression or table constructor in
        // statement position has no effect; emit it anyway and warn.
        _ => {
            tr.diags.warning("expression without effect", None);
            let rendered = gen_expression(tr, stmt)?;
            tr.line(&format!("{};", rendered))
        }
    }
}

/// Declare-once assignment.
///
/// A chain hit means the variable is already declared somewhere visible:
/// emit a bare assignment. A miss means this is the declaration site: infer
/// the type, register the symbol in the current scope and emit a typed
/// declaration.
fn gen_assignment<W: io::Write>(
    tr: &mut Translator<W>,
    var: &Variable,
    value: &AstNode,
) -> Result<(), Error> {
    if var.table_key.is_some() {
        // Indexed assignment never declares.
        let target = gen_expression(tr, &AstNode::Variable(var.clone()))?;
        let rendered = gen_expression(tr, value)?;
        return tr.line(&format!("{} = {};", target, rendered));
    }

    if tr.scopes.lookup(&var.name).is_some() {
        let rendered = gen_expression(tr, value)?;
        return tr.line(&format!("{} = {};", var.name, rendered));
    }

    declare(tr, &var.name, var, value)
}

/// Explicit `local`: always a fresh declaration in the current scope, even
/// when the name is visible from an enclosing one.
fn gen_declaration<W: io::Write>(
    tr: &mut Translator<W>,
    decl: &Declaration,
) -> Result<(), Error> {
    let var = match decl.var.as_ref() {
        AstNode::Variable(var) => var,
        _ => return tr.line("/* unparsed declaration */"),
    };

    match &decl.expr {
        Some(value) => declare(tr, &var.name, var, value),
        None => {
            // No initializer: the variable holds nil until assigned.
            let mut sym = Symbol::new(&var.name, LuaType::Nil, SymbolKind::Variable, &var.pos);
            sym.used = true;
            tr.scopes.insert(sym);
            tr.line(&format!("{} {};", c_type(LuaType::Nil), var.name))
        }
    }
}

fn declare<W: io::Write>(
    tr: &mut Translator<W>,
    name: &str,
    var: &Variable,
    value: &AstNode,
) -> Result<(), Error> {
    // Render before registering, so a hard error in the initializer leaves
    // the scope chain untouched.
    let rendered = gen_expression(tr, value)?;
    let ty = eval_expr_type(value, &tr.scopes, &mut tr.diags).ty;

    let mut sym = Symbol::new(name, ty, SymbolKind::Variable, &var.pos);
    sym.used = true;
    tr.scopes.insert(sym);

    if ty == LuaType::Table {
        // Aggregates declare as an array of field entries.
        tr.line(&format!("lua_field {}[] = {};", name, rendered))
    } else {
        tr.line(&format!("{} {} = {};", c_type(ty), name, rendered))
    }
}

/// `if`/`else`, one fresh child scope per branch.
fn gen_if<W: io::Write>(tr: &mut Translator<W>, ifn: &IfNode) -> Result<(), Error> {
    let cond = gen_expression(tr, &ifn.cond)?;
    tr.line(&format!("if ({}) {{", cond))?;

    tr.scopes.push_scope();
    tr.depth += 1;
    for stmt in &ifn.body {
        tr.absorb(stmt)?;
    }
    tr.depth -= 1;
    tr.scopes.pop_scope();

    match &ifn.else_body {
        None => tr.line("}"),
        Some(else_body) => {
            tr.line("} else {")?;
            tr.scopes.push_scope();
            tr.depth += 1;
            for stmt in else_body {
                tr.absorb(stmt)?;
            }
            tr.depth -= 1;
            tr.scopes.pop_scope();
            tr.line("}")
        }
    }
}

/// Numeric `for`. The induction variable is an integer, pre-registered in
/// the loop scope so the body never re-declares it.
fn gen_for<W: io::Write>(tr: &mut Translator<W>, forn: &ForNode) -> Result<(), Error> {
    let start = gen_expression(tr, &forn.start)?;
    let end = gen_expression(tr, &forn.end)?;
    let advance = match &forn.step {
        None => format!("{}++", forn.var),
        Some(step) => {
            let step = gen_expression(tr, step)?;
            format!("{} += {}", forn.var, step)
        }
    };
    tr.line(&format!(
        "for (int {} = {}; {} <= {}; {}) {{",
        forn.var, start, forn.var, end, advance
    ))?;

    tr.scopes.push_scope();
    let mut sym = Symbol::new(
        &forn.var,
        LuaType::Integer,
        SymbolKind::Variable,
        &crate::Position::null(),
    );
    sym.used = true;
    tr.scopes.insert(sym);

    tr.depth += 1;
    for stmt in &forn.body {
        tr.absorb(stmt)?;
    }
    tr.depth -= 1;
    tr.scopes.pop_scope();
    tr.line("}")
}
