//! Debug rendering
//!
//! Prints every scalar; composites recurse one indent level deeper.
//!
//! ```text
//! BEGIN Contact -----
//!
//!     name=Alice
//!     tags=
//!         friend
//!         work
//!
//! END Contact -----
//! ```

use crate::codec::Value;

const INDENT: &str = "    ";

/// Render `value` wrapped in a `BEGIN`/`END` block for `kind`.
pub fn render_block(kind: &str, value: &Value) -> String {
    let mut out = String::new();
    out.push_str("BEGIN ");
    out.push_str(kind);
    out.push_str(" -----\n");
    render_value(value, 0, &mut out);
    out.push_str("END ");
    out.push_str(kind);
    out.push_str(" -----\n");
    out
}

/// Render `value` at nesting `level` into `out`.
///
/// Pair arrays print only the second element of each pair.
pub fn render_value(value: &Value, level: usize, out: &mut String) {
    match value {
        Value::Boolean(b) => out.push_str(if *b { "True" } else { "False" }),
        Value::Int32(v) => out.push_str(&v.to_string()),
        Value::UInt64(v) => out.push_str(&v.to_string()),
        Value::Utf8String(s) => out.push_str(s),
        Value::Unit => out.push_str("Null"),
        Value::Sentinel(_) => out.push_str("End"),
        Value::Object(pairs) => {
            out.push('\n');
            for (key, child) in pairs {
                indent(level + 1, out);
                out.push_str(key);
                out.push('=');
                render_value(child, level + 1, out);
                out.push('\n');
            }
        }
        Value::Array(items) => {
            out.push('\n');
            for child in items {
                indent(level + 1, out);
                render_value(child, level + 1, out);
                out.push('\n');
            }
        }
        Value::PairArray(pairs) => {
            for (_, second) in pairs {
                indent(level + 1, out);
                render_value(second, level + 1, out);
                out.push('\n');
            }
        }
    }
}

fn indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}
