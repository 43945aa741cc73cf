//! Runtime-support prelude and builtin call expansions.
//!
//! The emitted program is self-contained: a fixed prelude supplies the
//! three read helpers and the table field type, and the `print` / `io.read`
//! builtins expand into calls against it.

use std::collections::HashMap;
use std::io;

use lazy_static::lazy_static;

use crate::ast::ast::AstNode;
use crate::ast::types::LuaType;
use crate::errors::errors::Error;
use crate::inference::inference::{classify_read_format, eval_expr_type, ReadKind};

use super::expr::gen_expression;
use super::translate::Translator;

/// Fixed C text emitted at the top of every output.
pub const RUNTIME_PRELUDE: &str = r#"#include <stdio.h>
#include <stdlib.h>
#include <string.h>
#include <stdbool.h>
char* c_lua_io_read_line(){
     char *buff;
    scanf("%ms", &buff);
    return buff;
}

float c_lua_io_read_number(){
     float ret;
    scanf("%f", &ret);
    return ret;
}

char *c_lua_io_read_bytes(int n)
{
    char *buff = malloc(sizeof(char) * (n + 1));
    scanf("%ms", &buff);
    buff[n] = '\0';
    return buff;
}

typedef struct
{
    char *key;
    union value
        {
            int int_value;
            double float_value;
            char *string_value;
            bool bool_value;
        } value;
} lua_field;

"#;

lazy_static! {
    /// Per-type printf placeholder: the format glyph, and whether the
    /// value itself is passed as an argument.
    static ref PRINT_PLACEHOLDERS: HashMap<LuaType, (&'static str, bool)> = {
        let mut m = HashMap::new();
        m.insert(LuaType::Integer, ("%d", true));
        m.insert(LuaType::Float, ("%f", true));
        m.insert(LuaType::Number, ("%f", true));
        m.insert(LuaType::String, ("%s", true));
        m.insert(LuaType::Boolean, ("%s", true));
        m.insert(LuaType::Nil, ("nil", false));
        m.insert(LuaType::Table, ("table", false));
        m.insert(LuaType::Function, ("%p", true));
        m.insert(LuaType::Dynamic, ("%d", true));
        m
    };
}

/// Expands a `print` call into one `printf` call.
///
/// Literal string arguments flow into the format text verbatim; every
/// other argument contributes a type-driven placeholder plus itself as a
/// call argument. Booleans pass through an inline ternary so `%s` prints
/// their spelling. The format always ends with a newline.
pub fn expand_print<W: io::Write>(
    tr: &mut Translator<W>,
    args: &[AstNode],
) -> Result<String, Error> {
    let mut format = String::new();
    let mut call_args = Vec::new();

    for arg in args {
        if let Some(val) = arg.as_value() {
            if val.val_type == LuaType::String {
                format.push_str(&val.text);
                continue;
            }
        }

        let ty = eval_expr_type(arg, &tr.scopes, &mut tr.diags).ty;
        let (glyph, passes_value) = PRINT_PLACEHOLDERS[&ty];
        format.push_str(glyph);
        if passes_value {
            let rendered = gen_expression(tr, arg)?;
            if ty == LuaType::Boolean {
                call_args.push(format!("({} ? \"true\" : \"false\")", rendered));
            } else {
                call_args.push(rendered);
            }
        }
    }

    format.push_str("\\n");
    if call_args.is_empty() {
        Ok(format!("printf(\"{}\")", format))
    } else {
        Ok(format!("printf(\"{}\", {})", format, call_args.join(", ")))
    }
}

/// Expands an `io.read` call into one of the three read helpers.
pub fn expand_read(args: &[AstNode]) -> Result<String, Error> {
    let call = match classify_read_format(args)? {
        ReadKind::Line => String::from("c_lua_io_read_line()"),
        ReadKind::Number => String::from("c_lua_io_read_number()"),
        ReadKind::Bytes(n) => format!("c_lua_io_read_bytes({})", n),
    };
    Ok(call)
}
