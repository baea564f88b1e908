//! Colored, indented JSON rendering.
//!
//! Object keys come out in serde_json's map order (sorted), two spaces per
//! nesting level. Strings and keys keep their JSON escaping so the output
//! parses back to the same value.

use colored::Colorize;
use serde_json::Value;

const INDENT: &str = "  ";

/// Pretty-prints a JSON document, or returns `None` when the bytes are not JSON.
pub fn pretty_print(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    let mut out = render_value(&value, 0);
    out.push('\n');
    Some(out)
}

/// Renders a value whose opening token sits at nesting level `depth`.
pub fn render_value(value: &Value, depth: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, depth);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                push_indent(out, depth + 1);
                out.push_str(&quoted(key).yellow().to_string());
                out.push_str(": ");
                write_value(out, item, depth + 1);
                out.push_str(if i + 1 < map.len() { ",\n" } else { "\n" });
            }
            push_indent(out, depth);
            out.push('}');
        }
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(out, depth + 1);
                write_value(out, item, depth + 1);
                out.push_str(if i + 1 < items.len() { ",\n" } else { "\n" });
            }
            push_indent(out, depth);
            out.push(']');
        }
        Value::String(text) => out.push_str(&quoted(text).green().to_string()),
        Value::Number(number) => out.push_str(&number.to_string().blue().to_string()),
        Value::Bool(flag) => out.push_str(&flag.to_string().red().to_string()),
        Value::Null => out.push_str(&"null".red().to_string()),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn quoted(text: &str) -> String {
    Value::String(text.to_owned()).to_string()
}
