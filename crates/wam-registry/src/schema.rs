//! Property schemas: declared fields plus validation rules.
//!
//! Schemas describe the closed property union field by field so the
//! validator can walk them generically. Each field carries an accessor
//! function that projects the value out of a `ComponentProperties`; the
//! accessor returns `None` when the component's variant does not carry the
//! field at all (a pipe-typed component holding plenum properties, say),
//! which is how "required but missing" surfaces with a sum-typed model.

use wam_model::ComponentProperties;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
    Bool,
    Text,
    FloatList,
    LayerList,
}

/// A value projected out of a property set for rule checking.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    FloatList(Vec<f64>),
    /// Layer lists are checked by length only.
    LayerList(usize),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::FloatList(_) => FieldKind::FloatList,
            FieldValue::LayerList(_) => FieldKind::LayerList,
        }
    }

    /// Numeric view for min/max/range rules. Lists expose their length.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::FloatList(v) => Some(v.len() as f64),
            FieldValue::LayerList(n) => Some(*n as f64),
            FieldValue::Bool(_) | FieldValue::Text(_) => None,
        }
    }
}

/// A single validation rule with its own user-facing message.
#[derive(Clone)]
pub enum FieldRule {
    Min { limit: f64, message: &'static str },
    Max { limit: f64, message: &'static str },
    Range { min: f64, max: f64, message: &'static str },
    /// Substring match on a text field. Non-text values pass unchecked,
    /// like the numeric rules on non-numeric values.
    Pattern { needle: &'static str, message: &'static str },
    /// Cross-field predicate over the whole property set.
    Custom {
        check: fn(&ComponentProperties) -> bool,
        message: &'static str,
    },
}

impl FieldRule {
    pub fn message(&self) -> &'static str {
        match self {
            FieldRule::Min { message, .. }
            | FieldRule::Max { message, .. }
            | FieldRule::Range { message, .. }
            | FieldRule::Pattern { message, .. }
            | FieldRule::Custom { message, .. } => message,
        }
    }

    /// True if the rule holds for the given field value / property set.
    pub fn holds(&self, value: &FieldValue, props: &ComponentProperties) -> bool {
        match self {
            FieldRule::Min { limit, .. } => value.as_number().is_none_or(|v| v >= *limit),
            FieldRule::Max { limit, .. } => value.as_number().is_none_or(|v| v <= *limit),
            FieldRule::Range { min, max, .. } => {
                value.as_number().is_none_or(|v| v >= *min && v <= *max)
            }
            FieldRule::Pattern { needle, .. } => match value {
                FieldValue::Text(s) => s.contains(needle),
                _ => true,
            },
            FieldRule::Custom { check, .. } => check(props),
        }
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRule::Min { limit, .. } => write!(f, "Min({limit})"),
            FieldRule::Max { limit, .. } => write!(f, "Max({limit})"),
            FieldRule::Range { min, max, .. } => write!(f, "Range({min}..{max})"),
            FieldRule::Pattern { needle, .. } => write!(f, "Pattern({needle:?})"),
            FieldRule::Custom { message, .. } => write!(f, "Custom({message:?})"),
        }
    }
}

/// One declared field of a property set.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub get: fn(&ComponentProperties) -> Option<FieldValue>,
    pub rules: Vec<FieldRule>,
}

impl FieldSchema {
    pub fn new(
        name: &'static str,
        kind: FieldKind,
        get: fn(&ComponentProperties) -> Option<FieldValue>,
    ) -> Self {
        Self {
            name,
            kind,
            required: true,
            get,
            rules: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// The full declared schema for one component kind.
#[derive(Debug, Clone, Default)]
pub struct PropertySchema {
    pub fields: Vec<FieldSchema>,
}

impl PropertySchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }
}
