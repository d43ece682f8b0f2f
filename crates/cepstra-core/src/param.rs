//! Declared, range-checked node parameters.
//!
//! Every algorithm declares its parameters once as a static slice of
//! [`ParamDescriptor`]s. Configuration requests arrive as a [`ParameterMap`]
//! of overrides, are checked against the declarations with
//! [`ParameterMap::merged`], and only then reach the algorithm. A rejected
//! override never touches the node's previous configuration.
//!
//! # Example
//!
//! ```rust
//! use cepstra_core::param::{ParamDescriptor, ParamRange, ParamValue, ParameterMap};
//!
//! const PARAMS: &[ParamDescriptor] = &[ParamDescriptor::int(
//!     "frameSize",
//!     "the frame size",
//!     ParamRange::positive(),
//!     2048,
//! )];
//!
//! let defaults = ParameterMap::defaults(PARAMS);
//! let merged = defaults
//!     .merged("FrameCutter", PARAMS, &ParameterMap::new().with("frameSize", 1024))
//!     .unwrap();
//! assert_eq!(merged.int("frameSize"), Some(1024));
//!
//! let bad = ParameterMap::new().with("frameSize", 0);
//! assert!(defaults.merged("FrameCutter", PARAMS, &bad).is_err());
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::error::ConfigError;

/// A parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Integer value.
    Int(i64),
    /// Real value.
    Real(f64),
    /// Boolean flag.
    Bool(bool),
    /// Text value (choices, names).
    Text(Cow<'static, str>),
}

impl ParamValue {
    /// Short name of the value kind, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "integer",
            ParamValue::Real(_) => "real",
            ParamValue::Bool(_) => "boolean",
            ParamValue::Text(_) => "text",
        }
    }

    /// Numeric view of the value (integers widen to `f64`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Real(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Real(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Real(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Real(f64::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&'static str> for ParamValue {
    fn from(v: &'static str) -> Self {
        ParamValue::Text(Cow::Borrowed(v))
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(Cow::Owned(v))
    }
}

/// Allowed values of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRange {
    /// Open numeric interval `(min, max)`. `max` may be infinite.
    Open {
        /// Exclusive lower bound.
        min: f64,
        /// Exclusive upper bound.
        max: f64,
    },
    /// Closed numeric interval `[min, max]`.
    Closed {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// One of a fixed set of text values.
    Choice(&'static [&'static str]),
    /// No constraint beyond the value kind.
    Any,
}

/// Largest frame or hop size, in samples, any node accepts.
pub const MAX_FRAME_SIZE: usize = 1 << 20;

impl ParamRange {
    /// `(0, inf)`, the range of rates and counts.
    pub const fn positive() -> Self {
        ParamRange::Open {
            min: 0.0,
            max: f64::INFINITY,
        }
    }

    /// `[min, MAX_FRAME_SIZE]`, the range of frame and hop sizes.
    pub const fn samples(min: usize) -> Self {
        ParamRange::Closed {
            min: min as f64,
            max: MAX_FRAME_SIZE as f64,
        }
    }

    fn contains(&self, v: f64) -> bool {
        match *self {
            ParamRange::Open { min, max } => v > min && v < max,
            ParamRange::Closed { min, max } => v >= min && v <= max,
            ParamRange::Choice(_) | ParamRange::Any => true,
        }
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn bound(v: f64) -> String {
            if v.is_infinite() {
                "inf".to_string()
            } else {
                format!("{v}")
            }
        }
        match self {
            ParamRange::Open { min, max } => write!(f, "({}, {})", bound(*min), bound(*max)),
            ParamRange::Closed { min, max } => write!(f, "[{}, {}]", bound(*min), bound(*max)),
            ParamRange::Choice(choices) => write!(f, "{{{}}}", choices.join(",")),
            ParamRange::Any => write!(f, "any"),
        }
    }
}

/// Static declaration of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Stable parameter name (part of the public interface).
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Allowed values.
    pub range: ParamRange,
    /// Default value; its kind is the parameter's kind.
    pub default: ParamValue,
}

impl ParamDescriptor {
    /// Integer parameter.
    pub const fn int(
        name: &'static str,
        description: &'static str,
        range: ParamRange,
        default: i64,
    ) -> Self {
        Self {
            name,
            description,
            range,
            default: ParamValue::Int(default),
        }
    }

    /// Real parameter.
    pub const fn real(
        name: &'static str,
        description: &'static str,
        range: ParamRange,
        default: f64,
    ) -> Self {
        Self {
            name,
            description,
            range,
            default: ParamValue::Real(default),
        }
    }

    /// Boolean parameter.
    pub const fn flag(name: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            name,
            description,
            range: ParamRange::Any,
            default: ParamValue::Bool(default),
        }
    }

    /// Text parameter restricted to `choices`.
    pub const fn choice(
        name: &'static str,
        description: &'static str,
        choices: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            range: ParamRange::Choice(choices),
            default: ParamValue::Text(Cow::Borrowed(default)),
        }
    }

    /// Checks `value` against this declaration, returning the value coerced
    /// to the declared kind.
    pub fn check(&self, value: &ParamValue) -> Result<ParamValue, ConfigError> {
        let wrong_type = || ConfigError::WrongType {
            name: self.name.to_string(),
            expected: self.default.kind(),
            found: value.kind(),
        };

        let coerced = match (&self.default, value) {
            (ParamValue::Int(_), ParamValue::Int(v)) => ParamValue::Int(*v),
            (ParamValue::Real(_), ParamValue::Int(v)) => ParamValue::Real(*v as f64),
            (ParamValue::Real(_), ParamValue::Real(v)) => ParamValue::Real(*v),
            (ParamValue::Bool(_), ParamValue::Bool(v)) => ParamValue::Bool(*v),
            (ParamValue::Text(_), ParamValue::Text(v)) => ParamValue::Text(v.clone()),
            _ => return Err(wrong_type()),
        };

        if let ParamRange::Choice(choices) = self.range
            && let ParamValue::Text(text) = &coerced
        {
            if !choices.iter().any(|c| *c == text.as_ref()) {
                return Err(ConfigError::InvalidChoice {
                    name: self.name.to_string(),
                    value: text.to_string(),
                    choices,
                });
            }
            return Ok(coerced);
        }

        if let Some(v) = coerced.as_f64()
            && (!v.is_finite() || !self.range.contains(v))
        {
            return Err(ConfigError::OutOfRange {
                name: self.name.to_string(),
                value: coerced.to_string(),
                range: self.range.to_string(),
            });
        }

        Ok(coerced)
    }
}

/// Ordered name → value map of parameter settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map holding the declared default of every descriptor.
    pub fn defaults(descriptors: &[ParamDescriptor]) -> Self {
        Self {
            entries: descriptors
                .iter()
                .map(|d| (d.name.to_string(), d.default.clone()))
                .collect(),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets `name`, replacing any previous value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Integer value of `name`.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Real value of `name` (integers widen).
    pub fn real(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    /// Boolean value of `name`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value of `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::Text(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Validates `overrides` against `descriptors` and returns `self` with the
    /// overrides applied. `self` is left untouched on error.
    pub fn merged(
        &self,
        node: &str,
        descriptors: &[ParamDescriptor],
        overrides: &ParameterMap,
    ) -> Result<ParameterMap, ConfigError> {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            let descriptor = descriptors.iter().find(|d| d.name == name).ok_or_else(|| {
                ConfigError::UnknownParameter {
                    node: node.to_string(),
                    name: name.to_string(),
                }
            })?;
            merged.set(name, descriptor.check(value)?);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &[ParamDescriptor] = &[
        ParamDescriptor::int("frameSize", "frame size", ParamRange::positive(), 2048),
        ParamDescriptor::real("sampleRate", "sample rate", ParamRange::positive(), 44100.0),
        ParamDescriptor::choice("silentFrames", "silence policy", &["drop", "keep", "noise"], "noise"),
        ParamDescriptor::real(
            "cutoff",
            "energy ratio",
            ParamRange::Closed { min: 0.0, max: 1.0 },
            0.85,
        ),
    ];

    #[test]
    fn defaults_follow_declaration_order() {
        let map = ParameterMap::defaults(PARAMS);
        let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["frameSize", "sampleRate", "silentFrames", "cutoff"]);
        assert_eq!(map.int("frameSize"), Some(2048));
        assert_eq!(map.text("silentFrames"), Some("noise"));
    }

    #[test]
    fn integer_widens_to_real() {
        let map = ParameterMap::defaults(PARAMS)
            .merged("x", PARAMS, &ParameterMap::new().with("sampleRate", 22050))
            .unwrap();
        assert_eq!(map.get("sampleRate"), Some(&ParamValue::Real(22050.0)));
    }

    #[test]
    fn real_does_not_narrow_to_integer() {
        let err = ParameterMap::defaults(PARAMS)
            .merged("x", PARAMS, &ParameterMap::new().with("frameSize", 1024.0))
            .unwrap_err();
        assert!(matches!(err, ConfigError::WrongType { expected: "integer", .. }));
    }

    #[test]
    fn open_bounds_are_exclusive() {
        let base = ParameterMap::defaults(PARAMS);
        assert!(base.merged("x", PARAMS, &ParameterMap::new().with("frameSize", 0)).is_err());
        assert!(base.merged("x", PARAMS, &ParameterMap::new().with("frameSize", 1)).is_ok());
        assert!(
            base.merged("x", PARAMS, &ParameterMap::new().with("sampleRate", -1.0))
                .is_err()
        );
    }

    #[test]
    fn closed_bounds_are_inclusive() {
        let base = ParameterMap::defaults(PARAMS);
        assert!(base.merged("x", PARAMS, &ParameterMap::new().with("cutoff", 1.0)).is_ok());
        assert!(base.merged("x", PARAMS, &ParameterMap::new().with("cutoff", 1.01)).is_err());
    }

    #[test]
    fn sample_counts_are_bounded() {
        const SIZES: &[ParamDescriptor] =
            &[ParamDescriptor::int("frameSize", "frame size", ParamRange::samples(2), 2048)];
        let base = ParameterMap::defaults(SIZES);
        let max = MAX_FRAME_SIZE as i64;

        assert!(base.merged("x", SIZES, &ParameterMap::new().with("frameSize", 2)).is_ok());
        assert!(base.merged("x", SIZES, &ParameterMap::new().with("frameSize", max)).is_ok());
        for rejected in [1, max + 1, i64::MAX] {
            let err = base
                .merged("x", SIZES, &ParameterMap::new().with("frameSize", rejected))
                .unwrap_err();
            assert!(matches!(err, ConfigError::OutOfRange { .. }), "{rejected}");
        }
    }

    #[test]
    fn non_finite_values_rejected() {
        let base = ParameterMap::defaults(PARAMS);
        let err = base
            .merged("x", PARAMS, &ParameterMap::new().with("sampleRate", f64::NAN))
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn unknown_parameter_names_the_node() {
        let err = ParameterMap::defaults(PARAMS)
            .merged("FrameCutter", PARAMS, &ParameterMap::new().with("bogus", 1))
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown parameter 'bogus' for 'FrameCutter'");
    }

    #[test]
    fn choice_rejects_unlisted_text() {
        let err = ParameterMap::defaults(PARAMS)
            .merged("x", PARAMS, &ParameterMap::new().with("silentFrames", "mute"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChoice { .. }));
    }

    #[test]
    fn failed_merge_leaves_map_untouched() {
        let base = ParameterMap::defaults(PARAMS);
        let overrides = ParameterMap::new().with("frameSize", 512).with("cutoff", 2.0);
        assert!(base.merged("x", PARAMS, &overrides).is_err());
        assert_eq!(base.int("frameSize"), Some(2048));
    }

    #[test]
    fn range_display() {
        assert_eq!(ParamRange::positive().to_string(), "(0, inf)");
        assert_eq!(ParamRange::Closed { min: 0.0, max: 1.0 }.to_string(), "[0, 1]");
        assert_eq!(ParamRange::samples(1).to_string(), "[1, 1048576]");
        assert_eq!(ParamRange::Choice(&["a", "b"]).to_string(), "{a,b}");
    }
}
