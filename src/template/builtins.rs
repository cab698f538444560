//! Callables bound to every template at compile time.

use std::collections::HashMap;

use serde_json::Value;
use tera::Tera;

use super::functions::string_arg;
use super::Callables;
use crate::path;

/// The compile-time callable table: `globFilter` and `require`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins;

impl Callables for Builtins {
    fn register(&self, tera: &mut Tera) {
        tera.register_filter("globFilter", glob_filter);
        tera.register_filter("require", require_filter);
        tera.register_function("require", require_function);
    }
}

/// Keep the strings of a list that match the glob `pattern` argument.
///
/// ```text
/// {{ files(pattern="/target/**/*") | globFilter(pattern="/target/docs/*") }}
/// ```
pub fn glob_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let pattern = string_arg(args, "globFilter", "pattern")?;
    let pattern = path::compile_glob(pattern).map_err(|e| tera::Error::msg(e.to_string()))?;

    let items = value.as_array().ok_or_else(|| {
        tera::Error::msg(format!("globFilter: expected a list, got {}", value))
    })?;

    let mut matched = Vec::new();
    for item in items {
        let candidate = item.as_str().ok_or_else(|| {
            tera::Error::msg(format!("globFilter: unsupported type: {}", item))
        })?;
        if path::glob_matches(&pattern, candidate) {
            matched.push(item.clone());
        }
    }

    Ok(Value::Array(matched))
}

/// Pass `value` through, failing if it is empty.
pub fn require_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    require(value)
}

/// `require(value=...)`: the function form of [`require_filter`].
pub fn require_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    match args.get("value") {
        Some(value) => require(value),
        None => Err(tera::Error::msg("require: missing argument 'value'")),
    }
}

fn require(value: &Value) -> tera::Result<Value> {
    if is_zero(value) {
        Err(tera::Error::msg("zero value is not allowed"))
    } else {
        Ok(value.clone())
    }
}

/// Returns true for `null`, `false`, `0`, `""`, `[]` and `{}`.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{CompiledTemplate, Options};
    use serde_json::json;

    fn args(pattern: &str) -> HashMap<String, Value> {
        HashMap::from([("pattern".to_string(), json!(pattern))])
    }

    #[test]
    fn test_glob_filter() {
        let files = json!(["/t/a.md", "/t/b.txt", "/t/docs/c.md"]);
        assert_eq!(
            glob_filter(&files, &args("/t/*.md")).unwrap(),
            json!(["/t/a.md"])
        );
        assert_eq!(
            glob_filter(&files, &args("/t/**/*.md")).unwrap(),
            json!(["/t/a.md", "/t/docs/c.md"])
        );
    }

    #[test]
    fn test_glob_filter_errors() {
        assert!(glob_filter(&json!(["/a"]), &args("[")).is_err());
        assert!(glob_filter(&json!("/a"), &args("/*")).is_err());
        assert!(glob_filter(&json!(["/a"]), &HashMap::new()).is_err());

        let err = glob_filter(&json!(["/a", 1]), &args("/*")).unwrap_err();
        assert!(err.to_string().contains("unsupported type"), "{}", err);
    }

    #[test]
    fn test_is_zero() {
        for zero in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_zero(&zero), "{}", zero);
        }
        for value in [json!(true), json!(1), json!("x"), json!([0]), json!({"a": null})] {
            assert!(!is_zero(&value), "{}", value);
        }
    }

    #[test]
    fn test_require_in_template() {
        let compiled = CompiledTemplate::compile(
            "/t/a",
            "{{ Name | require }}/{{ require(value=Version) }}",
            &Builtins,
            &Options::default(),
        )
        .unwrap();

        assert_eq!(
            compiled
                .render(&Builtins, &json!({"Name": "tmpl", "Version": 2}))
                .unwrap(),
            "tmpl/2"
        );

        let err = compiled
            .render(&Builtins, &json!({"Name": "", "Version": 2}))
            .unwrap_err();
        assert!(err.to_string().contains("zero value is not allowed"), "{}", err);
    }

    #[test]
    fn test_glob_filter_in_template() {
        let compiled = CompiledTemplate::compile(
            "/t/a",
            "{% set items = [\"/t/a.md\", \"/t/b.txt\"] %}{{ items | globFilter(pattern=\"/t/*.md\") | join(sep=\",\") }}",
            &Builtins,
            &Options::default(),
        )
        .unwrap();

        assert_eq!(compiled.render(&Builtins, &json!({})).unwrap(), "/t/a.md");
    }
}
