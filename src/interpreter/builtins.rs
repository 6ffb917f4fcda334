//! Built-in functions, dispatched by name.
//!
//! Arguments arrive already evaluated. Built-ins are checked before
//! user-defined functions and never create a call frame. Every failure is
//! reported and yields the builtin's fallback value, so evaluation always
//! continues.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write as _;

use once_cell::sync::Lazy;

use crate::diagnostics::Diagnostics;
use crate::lexer::Position;
use crate::limits::MAX_STRING_LEN;

use super::value::{format_g, Value};

pub type BuiltinFn = fn(&[Value], Position, &mut Diagnostics) -> Value;

static BUILTINS: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, BuiltinFn> = HashMap::new();
    m.insert("sqrt", sqrt);
    m.insert("pow", pow);
    m.insert("sin", sin);
    m.insert("cos", cos);
    m.insert("tan", tan);
    m.insert("abs", abs);
    m.insert("floor", floor);
    m.insert("ceil", ceil);
    m.insert("round", round);
    m.insert("log", log);
    m.insert("exp", exp);
    m.insert("length", length);
    m.insert("upper", upper);
    m.insert("lower", lower);
    m.insert("trim", trim);
    m.insert("replace", replace);
    m.insert("substr", substr);
    m.insert("indexOf", index_of);
    m.insert("first", first);
    m.insert("last", last);
    m.insert("reverse", reverse);
    m.insert("slice", slice);
    m.insert("join", join);
    m.insert("push", push);
    m.insert("pop", pop);
    m.insert("read", read);
    m.insert("write", write);
    m.insert("append", append);
    m
});

/// Look up a built-in by name.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    BUILTINS.get(name).copied()
}

fn sqrt(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "sqrt() requires 1 argument");
        return Value::Float(0.0);
    }
    let value = args[0].to_float();
    if value < 0.0 {
        diagnostics.report(position, "sqrt() of negative number");
        return Value::Float(0.0);
    }
    Value::Float(value.sqrt())
}

fn pow(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 2 {
        diagnostics.report(position, "pow() requires 2 arguments");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().powf(args[1].to_float()))
}

fn sin(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "sin() requires 1 argument");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().sin())
}

fn cos(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "cos() requires 1 argument");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().cos())
}

fn tan(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "tan() requires 1 argument");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().tan())
}

fn abs(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "abs() requires 1 argument");
        return Value::Float(0.0);
    }
    match &args[0] {
        Value::Int(value) => Value::Int(value.wrapping_abs()),
        other => Value::Float(other.to_float().abs()),
    }
}

fn floor(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "floor() requires 1 argument");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().floor())
}

fn ceil(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "ceil() requires 1 argument");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().ceil())
}

fn round(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "round() requires 1 argument");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().round())
}

fn log(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "log() requires 1 argument");
        return Value::Float(0.0);
    }
    let value = args[0].to_float();
    if value <= 0.0 {
        diagnostics.report(position, "log() of non-positive number");
        return Value::Float(0.0);
    }
    Value::Float(value.ln())
}

fn exp(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "exp() requires 1 argument");
        return Value::Float(0.0);
    }
    Value::Float(args[0].to_float().exp())
}

fn length(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "length() requires 1 argument");
        return Value::Int(0);
    }
    match &args[0] {
        Value::Str(text) => Value::Int(text.len() as i32),
        Value::Array(elements) => Value::Int(elements.len() as i32),
        _ => Value::Int(0),
    }
}

fn upper(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "upper() requires 1 argument");
        return Value::string("");
    }
    let Value::Str(text) = &args[0] else {
        diagnostics.report(position, "upper() requires a string");
        return Value::string("");
    };
    Value::string(text.to_ascii_uppercase())
}

fn lower(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "lower() requires 1 argument");
        return Value::string("");
    }
    let Value::Str(text) = &args[0] else {
        diagnostics.report(position, "lower() requires a string");
        return Value::string("");
    };
    Value::string(text.to_ascii_lowercase())
}

fn trim(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "trim() requires 1 argument");
        return Value::string("");
    }
    let Value::Str(text) = &args[0] else {
        diagnostics.report(position, "trim() requires a string");
        return Value::string("");
    };
    Value::string(text.trim())
}

fn replace(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 3 {
        diagnostics.report(position, "replace() requires 3 arguments (string, old, new)");
        return Value::string("");
    }
    let (Value::Str(text), Value::Str(old), Value::Str(new)) = (&args[0], &args[1], &args[2])
    else {
        diagnostics.report(position, "replace() requires string arguments");
        return Value::string("");
    };
    if old.is_empty() {
        return Value::string(text.clone());
    }
    Value::string(text.replace(old.as_str(), new))
}

fn substr(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 3 {
        diagnostics.report(
            position,
            "substr() requires 3 arguments (string, start, length)",
        );
        return Value::string("");
    }
    let Value::Str(text) = &args[0] else {
        diagnostics.report(position, "substr() requires a string as first argument");
        return Value::string("");
    };

    let start = args[1].to_int();
    let len = args[2].to_int();
    if start < 0 || start as usize >= text.len() || len < 0 {
        return Value::string("");
    }

    let start = floor_char_boundary(text, start as usize);
    let end = floor_char_boundary(text, (start + len as usize).min(text.len()));
    Value::string(&text[start..end])
}

fn index_of(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 2 {
        diagnostics.report(position, "indexOf() requires 2 arguments (string, substring)");
        return Value::Int(-1);
    }
    let (Value::Str(text), Value::Str(needle)) = (&args[0], &args[1]) else {
        diagnostics.report(position, "indexOf() requires string arguments");
        return Value::Int(-1);
    };
    match text.find(needle.as_str()) {
        Some(index) => Value::Int(index as i32),
        None => Value::Int(-1),
    }
}

fn first(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "first() requires 1 argument");
        return Value::Int(0);
    }
    match &args[0] {
        Value::Array(elements) if !elements.is_empty() => elements[0].clone(),
        _ => {
            diagnostics.report(position, "first() on non-array or empty array");
            Value::Int(0)
        }
    }
}

fn last(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "last() requires 1 argument");
        return Value::Int(0);
    }
    match &args[0] {
        Value::Array(elements) if !elements.is_empty() => {
            elements[elements.len() - 1].clone()
        }
        _ => {
            diagnostics.report(position, "last() on non-array or empty array");
            Value::Int(0)
        }
    }
}

fn reverse(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "reverse() requires 1 argument");
        return Value::Array(vec![]);
    }
    let Value::Array(elements) = &args[0] else {
        diagnostics.report(position, "reverse() requires an array");
        return Value::Array(vec![]);
    };
    let mut reversed = elements.clone();
    reversed.reverse();
    Value::Array(reversed)
}

fn slice(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 3 {
        diagnostics.report(position, "slice() requires 3 arguments (array, start, end)");
        return Value::Array(vec![]);
    }
    let Value::Array(elements) = &args[0] else {
        diagnostics.report(position, "slice() requires an array");
        return Value::Array(vec![]);
    };

    let size = elements.len() as i32;
    let mut start = args[1].to_int();
    let mut end = args[2].to_int();
    if start < 0 {
        start = 0;
    }
    if end > size {
        end = size;
    }
    if start > end {
        start = end;
    }

    Value::Array(elements[start as usize..end as usize].to_vec())
}

fn join(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 2 {
        diagnostics.report(position, "join() requires 2 arguments (array, separator)");
        return Value::string("");
    }
    let (Value::Array(elements), Value::Str(separator)) = (&args[0], &args[1]) else {
        diagnostics.report(position, "join() requires an array and string separator");
        return Value::string("");
    };

    let mut result = String::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            result.push_str(separator);
        }
        match element {
            Value::Int(value) => result.push_str(&value.to_string()),
            Value::Float(value) => result.push_str(&format_g(*value)),
            Value::Str(text) => result.push_str(text),
            Value::Array(_) => {}
        }
    }
    Value::string(result)
}

fn push(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 2 {
        diagnostics.report(position, "push() requires 2 arguments (array, value)");
        return Value::Int(0);
    }
    // Arguments arrive by value, so the caller's array is never touched;
    // the result is only the element count.
    match &args[0] {
        Value::Array(elements) => Value::Int(elements.len() as i32),
        _ => Value::Int(0),
    }
}

fn pop(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "pop() requires 1 argument");
        return Value::Int(0);
    }
    match &args[0] {
        Value::Array(elements) if !elements.is_empty() => {
            elements[elements.len() - 1].clone()
        }
        _ => {
            diagnostics.report(position, "pop() on empty array");
            Value::Int(0)
        }
    }
}

fn read(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 1 {
        diagnostics.report(position, "read() requires 1 argument (filename)");
        return Value::string("");
    }
    let Value::Str(filename) = &args[0] else {
        diagnostics.report(position, "read() requires a string filename");
        return Value::string("");
    };

    match fs::read(filename) {
        Ok(mut bytes) => {
            bytes.truncate(MAX_STRING_LEN - 1);
            Value::string(String::from_utf8_lossy(&bytes).into_owned())
        }
        Err(_) => {
            diagnostics.report(position, format!("Cannot open file for reading: {filename}"));
            Value::string("")
        }
    }
}

fn write(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 2 {
        diagnostics.report(position, "write() requires 2 arguments (filename, content)");
        return Value::Int(0);
    }
    let Value::Str(filename) = &args[0] else {
        diagnostics.report(position, "write() requires a string filename");
        return Value::Int(0);
    };

    let content = file_content(&args[1]);
    match fs::write(filename, content.as_bytes()) {
        Ok(()) => Value::Int(content.len() as i32),
        Err(_) => {
            diagnostics.report(position, format!("Cannot open file for writing: {filename}"));
            Value::Int(0)
        }
    }
}

fn append(args: &[Value], position: Position, diagnostics: &mut Diagnostics) -> Value {
    if args.len() != 2 {
        diagnostics.report(position, "append() requires 2 arguments (filename, content)");
        return Value::Int(0);
    }
    let Value::Str(filename) = &args[0] else {
        diagnostics.report(position, "append() requires a string filename");
        return Value::Int(0);
    };

    let content = file_content(&args[1]);
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(filename)
        .and_then(|mut file| file.write_all(content.as_bytes()));
    match result {
        Ok(()) => Value::Int(content.len() as i32),
        Err(_) => {
            diagnostics.report(
                position,
                format!("Cannot open file for appending: {filename}"),
            );
            Value::Int(0)
        }
    }
}

fn file_content(value: &Value) -> String {
    match value {
        Value::Str(text) => text.clone(),
        Value::Int(value) => value.to_string(),
        Value::Float(value) => format_g(*value),
        Value::Array(_) => String::new(),
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
