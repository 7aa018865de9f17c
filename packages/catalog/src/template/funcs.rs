//! Template Functions
//!
//! Built-in functions plus the caller-supplied function table.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A template function. Errors are reported as plain messages and wrapped
/// into `TemplateError::Exec` by the executor.
pub type TemplateFn = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// Functions callable by name from template actions. Entries shadow the
/// built-ins of the same name.
#[derive(Clone, Default)]
pub struct FunctionTable {
    funcs: IndexMap<String, TemplateFn>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(func));
    }

    pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.insert(name, func);
        self
    }

    /// Look up a caller function, then a built-in.
    pub fn get(&self, name: &str) -> Option<&TemplateFn> {
        self.funcs.get(name).or_else(|| BUILTINS.get(name))
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("funcs", &self.funcs.keys().collect::<Vec<_>>())
            .finish()
    }
}

static BUILTINS: Lazy<IndexMap<String, TemplateFn>> = Lazy::new(|| {
    let mut builtins: IndexMap<String, TemplateFn> = IndexMap::new();
    builtins.insert("and".into(), Arc::new(and));
    builtins.insert("or".into(), Arc::new(or));
    builtins.insert("not".into(), Arc::new(not));
    builtins.insert("len".into(), Arc::new(len));
    builtins.insert("index".into(), Arc::new(index));
    builtins.insert("print".into(), Arc::new(print));
    builtins.insert("eq".into(), Arc::new(eq));
    builtins.insert("ne".into(), Arc::new(ne));
    builtins.insert("lt".into(), Arc::new(|args: &[Value]| compare(args, "lt", Ordering::is_lt)));
    builtins.insert("le".into(), Arc::new(|args: &[Value]| compare(args, "le", Ordering::is_le)));
    builtins.insert("gt".into(), Arc::new(|args: &[Value]| compare(args, "gt", Ordering::is_gt)));
    builtins.insert("ge".into(), Arc::new(|args: &[Value]| compare(args, "ge", Ordering::is_ge)));
    builtins
});

/// Template truthiness: false, 0, nil and empty collections are false.
pub fn is_true(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Text form of a value as it appears in rendered output.
///
/// Arrays and objects print as compact JSON text.
pub fn print_value(value: &Value) -> String {
    match value {
        Value::Null => "<no value>".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn arity(args: &[Value], name: &str, want: usize) -> Result<(), String> {
    if args.len() != want {
        return Err(format!(
            "wrong number of args for {}: want {} got {}",
            name,
            want,
            args.len()
        ));
    }
    Ok(())
}

fn and(args: &[Value]) -> Result<Value, String> {
    let last = args.last().ok_or("wrong number of args for and: want at least 1 got 0")?;
    Ok(args.iter().find(|v| !is_true(v)).unwrap_or(last).clone())
}

fn or(args: &[Value]) -> Result<Value, String> {
    let last = args.last().ok_or("wrong number of args for or: want at least 1 got 0")?;
    Ok(args.iter().find(|v| is_true(v)).unwrap_or(last).clone())
}

fn not(args: &[Value]) -> Result<Value, String> {
    arity(args, "not", 1)?;
    Ok(Value::Bool(!is_true(&args[0])))
}

/// Strings measure in bytes, not characters.
fn len(args: &[Value]) -> Result<Value, String> {
    arity(args, "len", 1)?;
    let n = match &args[0] {
        Value::String(s) => s.len(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        other => return Err(format!("len of type {}", type_name(other))),
    };
    Ok(Value::from(n))
}

fn index(args: &[Value]) -> Result<Value, String> {
    let (first, keys) = args
        .split_first()
        .ok_or("wrong number of args for index: want at least 1 got 0")?;
    let mut current = first.clone();
    for key in keys {
        current = match (&current, key) {
            (Value::Array(items), Value::Number(n)) => {
                let i = n
                    .as_u64()
                    .ok_or_else(|| format!("cannot index slice/array with {}", n))?;
                items
                    .get(i as usize)
                    .cloned()
                    .ok_or_else(|| format!("index out of range: {}", i))?
            }
            (Value::Object(map), Value::String(k)) => map.get(k).cloned().unwrap_or(Value::Null),
            (Value::Null, _) => return Err("index of untyped nil".to_string()),
            (container, key) => {
                return Err(format!(
                    "cannot index {} with {}",
                    type_name(container),
                    type_name(key)
                ))
            }
        };
    }
    Ok(current)
}

// Operands are separated by a space when neither side is a string.
fn print(args: &[Value]) -> Result<Value, String> {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !args[i - 1].is_string() && !arg.is_string() {
            out.push(' ');
        }
        out.push_str(&print_value(arg));
    }
    Ok(Value::String(out))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn eq(args: &[Value]) -> Result<Value, String> {
    let (first, rest) = args
        .split_first()
        .ok_or("missing argument for comparison")?;
    if rest.is_empty() {
        return Err("missing argument for comparison".to_string());
    }
    Ok(Value::Bool(rest.iter().any(|v| values_equal(first, v))))
}

fn ne(args: &[Value]) -> Result<Value, String> {
    arity(args, "ne", 2)?;
    Ok(Value::Bool(!values_equal(&args[0], &args[1])))
}

fn compare(args: &[Value], name: &str, accept: fn(Ordering) -> bool) -> Result<Value, String> {
    arity(args, name, 2)?;
    let ordering = match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
    .ok_or_else(|| {
        format!(
            "incompatible types for comparison: {} and {}",
            type_name(&args[0]),
            type_name(&args[1])
        )
    })?;
    Ok(Value::Bool(accept(ordering)))
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, args: &[Value]) -> Result<Value, String> {
        let table = FunctionTable::new();
        let func = table.get(name).unwrap();
        func(args)
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_true(&json!(null)));
        assert!(!is_true(&json!(0)));
        assert!(!is_true(&json!("")));
        assert!(!is_true(&json!([])));
        assert!(is_true(&json!(1)));
        assert!(is_true(&json!("x")));
        assert!(is_true(&json!({"a": 1})));
    }

    #[test]
    fn test_logic_builtins() {
        assert_eq!(call("and", &[json!(1), json!(0), json!(2)]), Ok(json!(0)));
        assert_eq!(call("or", &[json!(0), json!(""), json!("x")]), Ok(json!("x")));
        assert_eq!(call("not", &[json!(false)]), Ok(json!(true)));
        assert!(call("not", &[]).is_err());
    }

    #[test]
    fn test_print_value() {
        assert_eq!(print_value(&Value::Null), "<no value>");
        assert_eq!(print_value(&json!("text")), "text");
        assert_eq!(print_value(&json!(2.5)), "2.5");
        assert_eq!(print_value(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(print_value(&json!({"k": true})), r#"{"k":true}"#);
    }

    #[test]
    fn test_len_and_index() {
        assert_eq!(call("len", &[json!("hello")]), Ok(json!(5)));
        assert_eq!(call("len", &[json!("héllo")]), Ok(json!(6)));
        assert_eq!(call("len", &[json!([1, 2])]), Ok(json!(2)));
        assert_eq!(call("index", &[json!({"a": [1, 2]}), json!("a"), json!(1)]), Ok(json!(2)));
        assert!(call("index", &[json!([1]), json!(5)]).is_err());
    }

    #[test]
    fn test_print_spacing() {
        assert_eq!(call("print", &[json!(1), json!(2)]), Ok(json!("1 2")));
        assert_eq!(call("print", &[json!("a"), json!(2)]), Ok(json!("a2")));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(call("eq", &[json!(1), json!(2), json!(1.0)]), Ok(json!(true)));
        assert_eq!(call("ne", &[json!("a"), json!("a")]), Ok(json!(false)));
        assert_eq!(call("lt", &[json!(1), json!(2)]), Ok(json!(true)));
        assert_eq!(call("ge", &[json!("b"), json!("a")]), Ok(json!(true)));
        assert!(call("lt", &[json!(1), json!("a")]).is_err());
    }

    #[test]
    fn test_caller_functions_shadow_builtins() {
        let table = FunctionTable::new().with("len", |_: &[Value]| Ok(json!(42)));
        let func = table.get("len").unwrap();
        assert_eq!(func(&[json!("abc")]), Ok(json!(42)));
        assert_eq!(table.len(), 1);
    }
}
