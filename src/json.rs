//! Scalar lookups in JSON configuration files
//!
//! Values are addressed by dotted names. `a.b.c` walks into object `a`, then
//! object `b`, and reads key `c` there:
//!
//! ```text
//! { "a": { "b": { "c": 1.5 } } }     a.b.c  ->  "1.5"
//! ```
//!
//! Descent stops at the first token that is not an object child; that token
//! is the key and must be the last one. Scalars are returned as their text
//! and parsed on demand, so `"2.5"` and `2.5` both read as a double.

use crate::error::{MatError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Parsed JSON document
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    root: Value,
}

impl JsonFile {
    /// Load and parse a file
    ///
    /// # Errors
    ///
    /// `Open` if the file cannot be read, `Json` with the line and column of
    /// the first syntax error otherwise.
    pub fn open<P: AsRef<Path>>(path: P, verbose: bool) -> Result<Self> {
        let path = path.as_ref();
        if verbose {
            info!("... loading \"{}\"", path.display());
        }

        let text = std::fs::read_to_string(path).map_err(|source| MatError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let root = Self::parse(path, &text)?;

        Ok(JsonFile {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Parse an in-memory document; `path` is only used in messages
    pub fn from_text<P: AsRef<Path>>(path: P, text: &str) -> Result<Self> {
        let path = path.as_ref();
        Ok(JsonFile {
            path: path.to_path_buf(),
            root: Self::parse(path, text)?,
        })
    }

    fn parse(path: &Path, text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| {
            let full = e.to_string();
            let message = full
                .split(" at line ")
                .next()
                .unwrap_or(full.as_str())
                .to_string();
            MatError::Json {
                path: path.to_path_buf(),
                line: e.line(),
                column: e.column(),
                message,
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text of the scalar at a dotted name
    ///
    /// Returns `None` if the name does not resolve to a string, number or
    /// boolean.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let mut node = &self.root;
        let mut tokens = name.split('.').filter(|t| !t.is_empty());

        let mut key = None;
        for token in tokens.by_ref() {
            match node.get(token) {
                Some(child) if child.is_object() => node = child,
                _ => {
                    key = Some(token);
                    break;
                }
            }
        }

        let key = key?;
        if tokens.next().is_some() {
            return None;
        }

        match node.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn parse_value<T: std::str::FromStr>(&self, name: &str, kind: &'static str) -> Result<Option<T>> {
        let Some(token) = self.lookup(name) else {
            return Ok(None);
        };
        token
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| MatError::ParseValue {
                kind,
                value: token.clone(),
                path: self.path.clone(),
            })
    }

    /// Double at a dotted name
    ///
    /// `Ok(None)` if absent; `ParseValue` if present but not a number.
    /// Absent values are not logged here; reporting them is up to the caller.
    pub fn get_double(&self, name: &str) -> Result<Option<f64>> {
        self.parse_value(name, "double")
    }

    /// Integer at a dotted name
    pub fn get_int(&self, name: &str) -> Result<Option<i64>> {
        self.parse_value(name, "int")
    }

    /// String at a dotted name; numbers and booleans come back as text
    pub fn get_string(&self, name: &str) -> Result<Option<String>> {
        Ok(self.lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> JsonFile {
        JsonFile::from_text(
            "cfg.json",
            r#"{
                "solver": { "tol": 1e-6, "steps": 200, "name": "dassl", "fast": true },
                "gain": "2.5",
                "list": [1, 2],
                "nothing": null,
                "a": { "b": { "c": 3 } }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_nested_lookup() {
        let json = doc();
        assert_eq!(json.get_double("solver.tol").unwrap(), Some(1e-6));
        assert_eq!(json.get_int("solver.steps").unwrap(), Some(200));
        assert_eq!(json.get_string("solver.name").unwrap().as_deref(), Some("dassl"));
        assert_eq!(json.get_string("solver.fast").unwrap().as_deref(), Some("true"));
        assert_eq!(json.get_int("a.b.c").unwrap(), Some(3));
    }

    #[test]
    fn test_string_scalars_parse_as_numbers() {
        assert_eq!(doc().get_double("gain").unwrap(), Some(2.5));
    }

    #[test]
    fn test_missing_paths() {
        let json = doc();
        assert_eq!(json.lookup("solver.missing"), None);
        assert_eq!(json.lookup("missing"), None);
        // Key must be the last token
        assert_eq!(json.lookup("solver.tol.extra"), None);
        // Name resolves to an object, not a value
        assert_eq!(json.lookup("solver"), None);
        assert_eq!(json.lookup("a.b"), None);
        assert_eq!(json.lookup("list"), None);
        assert_eq!(json.lookup("nothing"), None);
        assert_eq!(json.lookup(""), None);
    }

    #[test]
    fn test_unparsable_values() {
        let json = doc();
        let err = json.get_int("solver.tol").unwrap_err();
        assert!(matches!(err, MatError::ParseValue { kind: "int", .. }));
        let err = json.get_double("solver.name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot read double value \"dassl\" from file \"cfg.json\""
        );
    }

    #[test]
    fn test_parse_error_position() {
        let err = JsonFile::from_text("bad.json", "{\n\"a\": [1,\n}").unwrap_err();
        match err {
            MatError::Json { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(!message.contains("at line"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let err = JsonFile::open("/nonexistent/cfg.json", false).unwrap_err();
        assert!(matches!(err, MatError::Open { .. }));
    }
}
