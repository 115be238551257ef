//! Declarative indicator inputs.
//!
//! An indicator describes what it can be configured with as a list of
//! [`InputSpec`]s. A host (the CLI, a chart UI) registers those, collects
//! overrides as strings and hands them to [`InputValues::resolve`], which
//! fills defaults, coerces types and checks bounds before anything is
//! computed.
//!
//! # Example
//!
//! ```
//! use lazy_ta::inputs::{InputSpec, InputValues};
//!
//! let specs = [
//!     InputSpec::int("length", "Length", 20).min(1.0),
//!     InputSpec::float("mult", "StdDev", 2.0).min(0.001).step(0.1),
//! ];
//! let values = InputValues::resolve(&specs, [("length", "50")]).unwrap();
//! assert_eq!(values.int("length").unwrap(), 50);
//! assert!((values.float("mult").unwrap() - 2.0).abs() < 1e-12);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use lazy_ta_core::store::Source;
use lazy_ta_core::{Error, Result};

/// The type of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Whole number.
    Int,
    /// Real number.
    Float,
    /// Flag.
    Bool,
    /// Free text, or one of a fixed set of options.
    String,
    /// A bar field such as `close` or `hl2`.
    Source,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Source => "source",
        })
    }
}

/// A typed input value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum InputValue {
    /// Whole number.
    Int(i64),
    /// Real number.
    Float(f64),
    /// Flag.
    Bool(bool),
    /// Text.
    String(String),
    /// Bar field.
    Source(Source),
}

impl InputValue {
    /// The kind this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        match self {
            Self::Int(_) => InputKind::Int,
            Self::Float(_) => InputKind::Float,
            Self::Bool(_) => InputKind::Bool,
            Self::String(_) => InputKind::String,
            Self::Source(_) => InputKind::Source,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Source(v) => write!(f, "{v}"),
        }
    }
}

/// One configurable input of an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Stable identifier used for overrides.
    pub id: String,
    /// Human-readable label.
    pub title: String,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: InputKind,
    /// Value used when no override is given.
    pub default: InputValue,
    /// Inclusive lower bound for numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// UI step hint for numbers; not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Allowed values for a string input; empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl InputSpec {
    fn with_default(id: &str, title: &str, default: InputValue) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind: default.kind(),
            default,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
        }
    }

    /// Integer input.
    #[must_use]
    pub fn int(id: &str, title: &str, default: i64) -> Self {
        Self::with_default(id, title, InputValue::Int(default))
    }

    /// Real-valued input.
    #[must_use]
    pub fn float(id: &str, title: &str, default: f64) -> Self {
        Self::with_default(id, title, InputValue::Float(default))
    }

    /// Boolean input.
    #[must_use]
    pub fn bool(id: &str, title: &str, default: bool) -> Self {
        Self::with_default(id, title, InputValue::Bool(default))
    }

    /// Text input.
    #[must_use]
    pub fn string(id: &str, title: &str, default: &str) -> Self {
        Self::with_default(id, title, InputValue::String(default.to_string()))
    }

    /// Bar-field input.
    #[must_use]
    pub fn source(id: &str, title: &str, default: Source) -> Self {
        Self::with_default(id, title, InputValue::Source(default))
    }

    /// Sets the inclusive minimum.
    #[must_use]
    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive maximum.
    #[must_use]
    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the step hint.
    #[must_use]
    pub const fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Restricts a string input to `options`.
    #[must_use]
    pub fn options<S: AsRef<str>>(mut self, options: &[S]) -> Self {
        self.options = options.iter().map(|o| o.as_ref().to_string()).collect();
        self
    }

    /// Parses a command-line style override for this input.
    ///
    /// Integers accept a plain whole number, floats any real number, flags
    /// `true/false`, `yes/no`, `on/off` or `1/0`, and sources a bar field
    /// name. The result is checked with [`InputSpec::check`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the text does not parse or the
    /// value is out of bounds.
    pub fn parse_override(&self, raw: &str) -> Result<InputValue> {
        let text = raw.trim();
        let value = match self.kind {
            InputKind::Int => text
                .parse::<i64>()
                .map(InputValue::Int)
                .map_err(|_| self.invalid(format!("'{raw}' is not a whole number")))?,
            InputKind::Float => text
                .parse::<f64>()
                .map(InputValue::Float)
                .map_err(|_| self.invalid(format!("'{raw}' is not a number")))?,
            InputKind::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => InputValue::Bool(true),
                "false" | "no" | "off" | "0" => InputValue::Bool(false),
                _ => return Err(self.invalid(format!("'{raw}' is not true or false"))),
            },
            InputKind::String => InputValue::String(text.to_string()),
            InputKind::Source => text
                .parse::<Source>()
                .map(InputValue::Source)
                .map_err(|_| self.invalid(format!("'{raw}' is not a bar field")))?,
        };
        self.check(value)
    }

    /// Validates `value` against this input's type, bounds and options.
    ///
    /// An integer is accepted for a float input and widened.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput`.
    #[allow(clippy::cast_precision_loss)]
    pub fn check(&self, value: InputValue) -> Result<InputValue> {
        let value = match (self.kind, value) {
            (InputKind::Float, InputValue::Int(v)) => InputValue::Float(v as f64),
            (kind, value) if value.kind() == kind => value,
            (kind, value) => {
                return Err(self.invalid(format!("expected {kind}, got {}", value.kind())));
            }
        };

        if let Some(number) = value.as_number() {
            if !number.is_finite() {
                return Err(self.invalid("must be a finite number".to_string()));
            }
            if let Some(min) = self.min.filter(|&min| number < min) {
                return Err(self.invalid(format!("{value} is below the minimum {min}")));
            }
            if let Some(max) = self.max.filter(|&max| number > max) {
                return Err(self.invalid(format!("{value} is above the maximum {max}")));
            }
        }

        if let InputValue::String(text) = &value {
            if !self.options.is_empty() && !self.options.iter().any(|o| o == text) {
                return Err(self.invalid(format!(
                    "'{text}' is not one of {}",
                    self.options.join(", ")
                )));
            }
        }
        Ok(value)
    }

    fn invalid(&self, reason: String) -> Error {
        Error::InvalidInput {
            id: self.id.clone(),
            reason,
        }
    }
}

/// Resolved input values, keyed by input id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputValues {
    values: BTreeMap<String, InputValue>,
}

impl InputValues {
    /// Every input at its default.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if a default violates its own spec.
    pub fn defaults(specs: &[InputSpec]) -> Result<Self> {
        Self::resolve(specs, std::iter::empty::<(&str, &str)>())
    }

    /// Applies string `overrides` on top of the defaults of `specs`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownInput` for an id no spec declares and
    /// `Error::InvalidInput` for a value that fails to parse or validate.
    pub fn resolve<I, K, V>(specs: &[InputSpec], overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        for spec in specs {
            values.insert(spec.id.clone(), spec.check(spec.default.clone())?);
        }
        for (id, raw) in overrides {
            let id = id.as_ref();
            let spec = specs
                .iter()
                .find(|spec| spec.id == id)
                .ok_or_else(|| Error::UnknownInput { id: id.to_string() })?;
            let value = spec.parse_override(raw.as_ref())?;
            log::debug!("input {id} = {value}");
            values.insert(spec.id.clone(), value);
        }
        Ok(Self { values })
    }

    /// Raw value of `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&InputValue> {
        self.values.get(id)
    }

    /// Iterates `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.values.iter().map(|(id, value)| (id.as_str(), value))
    }

    fn require(&self, id: &str) -> Result<&InputValue> {
        self.values
            .get(id)
            .ok_or_else(|| Error::UnknownInput { id: id.to_string() })
    }

    fn mismatch(id: &str, wanted: InputKind, found: &InputValue) -> Error {
        Error::InvalidInput {
            id: id.to_string(),
            reason: format!("expected {wanted}, holds {}", found.kind()),
        }
    }

    /// Integer value of `id`.
    ///
    /// # Errors
    ///
    /// `Error::UnknownInput` if absent, `Error::InvalidInput` if not an int.
    pub fn int(&self, id: &str) -> Result<i64> {
        match self.require(id)? {
            InputValue::Int(v) => Ok(*v),
            other => Err(Self::mismatch(id, InputKind::Int, other)),
        }
    }

    /// Integer value of `id` as a window length.
    ///
    /// # Errors
    ///
    /// As [`InputValues::int`], plus `Error::InvalidInput` for a negative
    /// value.
    pub fn length(&self, id: &str) -> Result<usize> {
        let v = self.int(id)?;
        usize::try_from(v).map_err(|_| Error::InvalidInput {
            id: id.to_string(),
            reason: format!("{v} is not a valid length"),
        })
    }

    /// Real value of `id`; integers are widened.
    ///
    /// # Errors
    ///
    /// `Error::UnknownInput` if absent, `Error::InvalidInput` if not numeric.
    pub fn float(&self, id: &str) -> Result<f64> {
        let value = self.require(id)?;
        value
            .as_number()
            .ok_or_else(|| Self::mismatch(id, InputKind::Float, value))
    }

    /// Flag value of `id`.
    ///
    /// # Errors
    ///
    /// `Error::UnknownInput` if absent, `Error::InvalidInput` if not a bool.
    pub fn bool(&self, id: &str) -> Result<bool> {
        match self.require(id)? {
            InputValue::Bool(v) => Ok(*v),
            other => Err(Self::mismatch(id, InputKind::Bool, other)),
        }
    }

    /// Text value of `id`.
    ///
    /// # Errors
    ///
    /// `Error::UnknownInput` if absent, `Error::InvalidInput` if not text.
    pub fn string(&self, id: &str) -> Result<&str> {
        match self.require(id)? {
            InputValue::String(v) => Ok(v),
            other => Err(Self::mismatch(id, InputKind::String, other)),
        }
    }

    /// Bar-field value of `id`.
    ///
    /// # Errors
    ///
    /// `Error::UnknownInput` if absent, `Error::InvalidInput` if not a source.
    pub fn source(&self, id: &str) -> Result<Source> {
        match self.require(id)? {
            InputValue::Source(v) => Ok(*v),
            other => Err(Self::mismatch(id, InputKind::Source, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<InputSpec> {
        vec![
            InputSpec::int("length", "Length", 14).min(1.0).max(500.0),
            InputSpec::float("factor", "Factor", 3.0).min(0.0).step(0.1),
            InputSpec::bool("extend", "Extend", true),
            InputSpec::string("ma_type", "MA Type", "SMA").options(&["SMA", "EMA"]),
            InputSpec::source("source", "Source", Source::Close),
        ]
    }

    #[test]
    fn test_defaults() {
        let values = InputValues::defaults(&specs()).unwrap();
        assert_eq!(values.int("length").unwrap(), 14);
        assert_eq!(values.length("length").unwrap(), 14);
        assert!((values.float("factor").unwrap() - 3.0).abs() < f64::EPSILON);
        assert!(values.bool("extend").unwrap());
        assert_eq!(values.string("ma_type").unwrap(), "SMA");
        assert_eq!(values.source("source").unwrap(), Source::Close);
    }

    #[test]
    fn test_overrides_are_parsed_by_kind() {
        let values = InputValues::resolve(
            &specs(),
            [
                ("length", "21"),
                ("factor", "2"),
                ("extend", "off"),
                ("ma_type", "EMA"),
                ("source", "hlc3"),
            ],
        )
        .unwrap();
        assert_eq!(values.int("length").unwrap(), 21);
        assert_eq!(values.get("factor"), Some(&InputValue::Float(2.0)));
        assert!(!values.bool("extend").unwrap());
        assert_eq!(values.string("ma_type").unwrap(), "EMA");
        assert_eq!(values.source("source").unwrap(), Source::Hlc3);
    }

    #[test]
    fn test_unknown_override() {
        let err = InputValues::resolve(&specs(), [("lenght", "3")]).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownInput {
                id: "lenght".to_string()
            }
        );
    }

    #[test]
    fn test_bounds_and_options() {
        for (id, raw) in [
            ("length", "0"),
            ("length", "501"),
            ("length", "2.5"),
            ("factor", "-1"),
            ("factor", "nan"),
            ("extend", "maybe"),
            ("ma_type", "HMA"),
            ("source", "bogus"),
        ] {
            let err = InputValues::resolve(&specs(), [(id, raw)]).unwrap_err();
            assert!(
                matches!(&err, Error::InvalidInput { id: got, .. } if got == id),
                "{id}={raw}: {err}"
            );
        }
    }

    #[test]
    fn test_getter_type_mismatch() {
        let values = InputValues::defaults(&specs()).unwrap();
        assert!(matches!(
            values.bool("length"),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            values.int("missing"),
            Err(Error::UnknownInput { .. })
        ));
        // ints widen to floats
        assert!((values.float("length").unwrap() - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_length_rejected() {
        let specs = [InputSpec::int("offset", "Offset", -2)];
        let values = InputValues::defaults(&specs).unwrap();
        assert_eq!(values.int("offset").unwrap(), -2);
        assert!(values.length("offset").is_err());
    }

    #[test]
    fn test_spec_json_shape() {
        let spec = InputSpec::int("length", "Length", 20).min(1.0);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "int");
        assert_eq!(json["default"]["type"], "int");
        assert_eq!(json["default"]["value"], 20);
        assert_eq!(json["min"], 1.0);
        assert!(json.get("max").is_none());
        assert!(json.get("options").is_none());

        let back: InputSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
