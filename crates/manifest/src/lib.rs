//! Typed, read-only access to the policy document (the manifest).
//!
//! The manifest is parsed once at the start of bootstrap and never mutated.
//! Lookups use dotted key paths (`loader.argv_src_file`) and distinguish
//! three outcomes: absent, present with the wrong type, present with a
//! value. Nothing is coerced; a wrong-typed value is an error, not a
//! default.

use thiserror::Error;
use toml::{Table, Value};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("cannot parse manifest: {0}")]
    Syntax(String),
    #[error("cannot parse '{key}' (expected {expected})")]
    WrongType { key: String, expected: &'static str },
    #[error("cannot parse '{key}' (the value must be 0 or 1)")]
    BadSwitch { key: String },
}

impl ManifestError {
    fn wrong_type(key: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType { key: key.into(), expected }
    }
}

/// A parsed manifest document.
#[derive(Clone, Debug)]
pub struct Manifest {
    root: Table,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let root = text.parse::<Table>().map_err(|err| ManifestError::Syntax(err.to_string()))?;
        Ok(Self { root })
    }

    /// Walks the dotted `key` path through nested tables. A missing or
    /// non-table intermediate component means the key is absent.
    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut table = &self.root;
        let mut parts = key.split('.');
        let mut current = parts.next()?;
        for next in parts {
            match table.get(current) {
                Some(Value::Table(inner)) => {
                    table = inner;
                    current = next;
                }
                _ => return None,
            }
        }
        table.get(current)
    }

    /// Whether `key` is present at all, regardless of its type.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn string(&self, key: &str) -> Result<Option<String>, ManifestError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ManifestError::wrong_type(key, "a string")),
        }
    }

    pub fn integer(&self, key: &str) -> Result<Option<i64>, ManifestError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(*n)),
            Some(_) => Err(ManifestError::wrong_type(key, "an integer")),
        }
    }

    /// A 0/1 switch. Absent means `false`; anything other than the two
    /// canonical values is an error.
    pub fn switch(&self, key: &str) -> Result<bool, ManifestError> {
        match self.integer(key).map_err(|_| ManifestError::BadSwitch { key: key.into() })? {
            None => Ok(false),
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(_) => Err(ManifestError::BadSwitch { key: key.into() }),
        }
    }

    /// The string-valued table at `key`, in declaration order. A non-string
    /// entry value is an error naming the full entry path.
    pub fn string_table(&self, key: &str) -> Result<Option<Vec<(String, String)>>, ManifestError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(Value::Table(table)) => {
                let mut entries = Vec::with_capacity(table.len());
                for (name, value) in table {
                    match value {
                        Value::String(s) => entries.push((name.clone(), s.clone())),
                        _ => {
                            return Err(ManifestError::wrong_type(
                                format!("{key}.{name}"),
                                "a string",
                            ));
                        }
                    }
                }
                Ok(Some(entries))
            }
            Some(_) => Err(ManifestError::wrong_type(key, "a table")),
        }
    }
}
