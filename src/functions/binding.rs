//! Binding supplied arguments to declared parameters.

use serde_json::Value;

use super::function::Parameter;

/// Raw argument object as received.
pub type Arguments = serde_json::Map<String, Value>;

/// Arguments did not match the declared parameter list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.describe())]
pub struct BindError {
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl BindError {
    fn describe(&self) -> String {
        let quoted = |names: &[String]| {
            names
                .iter()
                .map(|n| format!("'{}'", n))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing required argument(s): {}", quoted(&self.missing)));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unexpected argument(s): {}", quoted(&self.unexpected)));
        }
        parts.join("; ")
    }
}

/// A supplied value could not be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{name}' must be {expected}, got {got}")]
pub struct ArgumentError {
    pub name: String,
    pub expected: &'static str,
    pub got: String,
}

impl ArgumentError {
    fn absent(name: &str, expected: &'static str) -> Self {
        Self {
            name: name.to_string(),
            expected,
            got: "nothing".to_string(),
        }
    }
}

/// Arguments that passed binding: every key is a declared parameter and
/// every required parameter is present. `null` values were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: Arguments,
}

/// Bind `args` to `params`. Missing and unexpected names are reported
/// together.
pub fn bind(params: &[Parameter], args: Arguments) -> Result<BoundArguments, BindError> {
    let values: Arguments = args.into_iter().filter(|(_, v)| !v.is_null()).collect();

    let unexpected: Vec<String> = values
        .keys()
        .filter(|key| !params.iter().any(|p| p.name == key.as_str()))
        .cloned()
        .collect();
    let missing: Vec<String> = params
        .iter()
        .filter(|p| p.required && !values.contains_key(p.name))
        .map(|p| p.name.to_string())
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        Ok(BoundArguments { values })
    } else {
        Err(BindError {
            missing,
            unexpected,
        })
    }
}

impl BoundArguments {
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Read a text argument. Numbers and booleans are rendered to text.
    pub fn string(&self, name: &str) -> Result<Option<String>, ArgumentError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
            Some(other) => Err(ArgumentError {
                name: name.to_string(),
                expected: "a string",
                got: other.to_string(),
            }),
        }
    }

    /// Read a text argument that binding guaranteed to be present.
    pub fn require_string(&self, name: &str) -> Result<String, ArgumentError> {
        self.string(name)?
            .ok_or_else(|| ArgumentError::absent(name, "a string"))
    }

    /// Read a whole-number argument. Accepts integers, integral floats and
    /// numeric strings.
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ArgumentError> {
        let Some(value) = self.values.get(name) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        parsed.map(Some).ok_or_else(|| ArgumentError {
            name: name.to_string(),
            expected: "a whole number",
            got: value.to_string(),
        })
    }

    /// Read a whole-number argument that binding guaranteed to be present.
    pub fn require_integer(&self, name: &str) -> Result<i64, ArgumentError> {
        self.integer(name)?
            .ok_or_else(|| ArgumentError::absent(name, "a whole number"))
    }
}
