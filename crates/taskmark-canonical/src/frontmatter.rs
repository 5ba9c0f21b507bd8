//! Frontmatter parsing.
//!
//! Two parsers implement [`FrontmatterParser`]: a full YAML parser (behind the
//! `yaml` feature) and a minimal line-oriented parser that understands
//! `key: value` pairs and `- item` lists. [`default_parser`] picks one once, at
//! startup; callers only ever see the trait.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::canonicalizer::CanonicalizationError;

/// Parsed frontmatter, keyed and iterated in lexicographic key order.
pub type Frontmatter = BTreeMap<String, FieldValue>;

/// Value of a single frontmatter field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit `null` (or `~`).
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Integer scalar.
    Integer(i64),
    /// Floating point scalar.
    Float(f64),
    /// Any other scalar, kept verbatim.
    String(String),
    /// Ordered list of scalars.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns the string content for string scalars.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns an integer for integer scalars and for strings holding one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns true for `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    /// Scalar rendering used by the canonical serializer: booleans lowercase,
    /// `null` literal, strings verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", render_float(*x)),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

fn render_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        let sign = if x > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        x.to_string()
    }
}

/// Turns raw frontmatter text (between the delimiters) into a [`Frontmatter`].
pub trait FrontmatterParser: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Parses the frontmatter block.
    fn parse(&self, raw: &str) -> Result<Frontmatter, CanonicalizationError>;
}

/// Returns the best parser compiled into this build.
pub fn default_parser() -> Box<dyn FrontmatterParser> {
    #[cfg(feature = "yaml")]
    {
        Box::new(YamlFrontmatterParser)
    }
    #[cfg(not(feature = "yaml"))]
    {
        Box::new(SimpleFrontmatterParser)
    }
}

/// Full YAML frontmatter parser backed by `serde_yaml`.
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontmatterParser;

#[cfg(feature = "yaml")]
impl FrontmatterParser for YamlFrontmatterParser {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn parse(&self, raw: &str) -> Result<Frontmatter, CanonicalizationError> {
        use serde_yaml::Value;

        if raw.trim().is_empty() {
            return Ok(Frontmatter::new());
        }

        let value: Value = serde_yaml::from_str(raw)
            .map_err(|e| CanonicalizationError::InvalidFrontmatter(e.to_string()))?;

        let mapping = match value {
            Value::Null => return Ok(Frontmatter::new()),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(CanonicalizationError::InvalidFrontmatter(
                    "frontmatter is not a key/value mapping".to_string(),
                ))
            }
        };

        let mut out = Frontmatter::new();
        for (key, value) in mapping {
            let key = match key {
                Value::String(s) => s,
                other => yaml_to_field(other, true)?.to_string(),
            };
            let field = yaml_to_field(value, false)?;
            out.insert(key, field);
        }
        Ok(out)
    }
}

/// Converts a YAML node. Nested collections (mappings anywhere, sequences
/// inside sequences) collapse to compact JSON text.
#[cfg(feature = "yaml")]
fn yaml_to_field(value: serde_yaml::Value, nested: bool) -> Result<FieldValue, CanonicalizationError> {
    use serde_yaml::Value;

    Ok(match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(x) = n.as_f64() {
                FieldValue::Float(x)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        Value::String(s) => FieldValue::String(s),
        Value::Sequence(items) if !nested => FieldValue::List(
            items
                .into_iter()
                .map(|item| yaml_to_field(item, true))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Tagged(tagged) => yaml_to_field(tagged.value, nested)?,
        collection @ (Value::Sequence(_) | Value::Mapping(_)) => {
            let compact = serde_json::to_string(&collection)
                .map_err(|e| CanonicalizationError::InvalidFrontmatter(e.to_string()))?;
            FieldValue::String(compact)
        }
    })
}

/// Minimal parser for flat `key: value` frontmatter with `- item` lists.
///
/// A key with an empty value (or a `|` / `>` block indicator) opens a list that
/// collects the following `- item` lines. Blank lines and `#` comments are
/// ignored. Unquoted `true`/`false`, `null`/`~` and integers are typed; quoted
/// values stay strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFrontmatterParser;

impl FrontmatterParser for SimpleFrontmatterParser {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn parse(&self, raw: &str) -> Result<Frontmatter, CanonicalizationError> {
        let mut out = Frontmatter::new();
        let mut open_list: Option<String> = None;

        for line in raw.lines() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(item) = line.trim_start().strip_prefix("- ") {
                if let Some(FieldValue::List(items)) =
                    open_list.as_ref().and_then(|key| out.get_mut(key))
                {
                    items.push(simple_scalar(item.trim()));
                }
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim().to_string();
                let value = value.trim();
                if value.is_empty() || value == "|" || value == ">" {
                    out.insert(key.clone(), FieldValue::List(Vec::new()));
                    open_list = Some(key);
                } else {
                    out.insert(key, simple_scalar(value));
                    open_list = None;
                }
            }
        }

        Ok(out)
    }
}

fn simple_scalar(raw: &str) -> FieldValue {
    let unquoted = raw.trim_matches('"').trim_matches('\'');
    if unquoted.len() != raw.len() {
        return FieldValue::String(unquoted.to_string());
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => return FieldValue::Bool(true),
        "false" => return FieldValue::Bool(false),
        "null" | "~" => return FieldValue::Null,
        _ => {}
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(i) = raw.parse() {
            return FieldValue::Integer(i);
        }
    }
    FieldValue::String(raw.to_string())
}
