//! Typed Property Extraction
//!
//! Helpers that turn raw grammar captures into typed values. They encode the
//! precedence rules the grammar alone leaves to the caller, e.g. exclusive
//! bounds are tried before inclusive ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GrammarError;
use crate::grammar::PatternId;

// =============================================================================
// Field Types
// =============================================================================

/// Value of a `\type` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Integer,
    Real,
    Alpha,
    Choice,
    Node,
    ObjectList,
    ExternalList,
    Url,
    Handle,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Alpha => "alpha",
            Self::Choice => "choice",
            Self::Node => "node",
            Self::ObjectList => "object-list",
            Self::ExternalList => "external-list",
            Self::Url => "url",
            Self::Handle => "handle",
        }
    }

    /// Numeric types accept `\minimum` and `\maximum`
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

impl FromStr for FieldType {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" => Ok(Self::Integer),
            "real" => Ok(Self::Real),
            "alpha" => Ok(Self::Alpha),
            "choice" => Ok(Self::Choice),
            "node" => Ok(Self::Node),
            "object-list" => Ok(Self::ObjectList),
            "external-list" => Ok(Self::ExternalList),
            "url" => Ok(Self::Url),
            "handle" => Ok(Self::Handle),
            _ => Err(GrammarError::InvalidFieldType(s.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the text following `\type`
pub fn field_type(text: &str) -> Option<FieldType> {
    let m = PatternId::TypeProperty.captures(text)?;
    m.group(1)?.parse().ok()
}

// =============================================================================
// Field Tokens
// =============================================================================

/// Alpha (`A`) or numeric (`N`) field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Alpha,
    Numeric,
}

/// A field declaration token such as `A1` or `N12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldToken {
    pub kind: FieldKind,
    pub index: usize,
}

impl fmt::Display for FieldToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.kind {
            FieldKind::Alpha => 'A',
            FieldKind::Numeric => 'N',
        };
        write!(f, "{}{}", letter, self.index)
    }
}

/// Parse the field token at the start of a line, with the text after its separator
pub fn field_token(line: &str) -> Option<(FieldToken, &str)> {
    let m = PatternId::Field.captures(line)?;
    let kind = match m.group(1)? {
        "A" => FieldKind::Alpha,
        _ => FieldKind::Numeric,
    };
    // Digit runs too long for usize are not valid field numbers.
    let index = m.group(2)?.parse().ok()?;
    Some((FieldToken { kind, index }, m.group(3)?))
}

// =============================================================================
// Bounds
// =============================================================================

/// A `\minimum` or `\maximum` bound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    pub value: String,
    pub exclusive: bool,
}

impl Bound {
    pub fn as_f64(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

fn bound(text: &str, exclusive: PatternId, inclusive: PatternId) -> Option<Bound> {
    if let Some(m) = exclusive.captures(text) {
        return Some(Bound {
            value: m.group(1)?.trim().to_string(),
            exclusive: true,
        });
    }
    let m = inclusive.captures(text)?;
    Some(Bound {
        value: m.group(1)?.trim().to_string(),
        exclusive: false,
    })
}

/// Parse the text following a backslash as `minimum>` or `minimum`
pub fn min_bound(text: &str) -> Option<Bound> {
    bound(
        text,
        PatternId::MinExclusiveProperty,
        PatternId::MinInclusiveProperty,
    )
}

/// Parse the text following a backslash as `maximum<` or `maximum`
pub fn max_bound(text: &str) -> Option<Bound> {
    bound(
        text,
        PatternId::MaxExclusiveProperty,
        PatternId::MaxInclusiveProperty,
    )
}

// =============================================================================
// Defaults
// =============================================================================

/// Keyword default that the engine resolves at simulation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoDefault {
    Autosize,
    Autocalculate,
}

/// Detect `autosize` or `autocalculate` anywhere in a default value
pub fn automatic_default(text: &str) -> Option<AutoDefault> {
    let m = PatternId::AutomaticDefault.captures(text)?;
    if m.group(1)?.eq_ignore_ascii_case("autosize") {
        Some(AutoDefault::Autosize)
    } else {
        Some(AutoDefault::Autocalculate)
    }
}

// =============================================================================
// Counts and Free Text
// =============================================================================

fn count(id: PatternId, text: &str) -> Option<usize> {
    id.captures(text)?.group(1)?.parse().ok()
}

pub fn extensible_count(text: &str) -> Option<usize> {
    count(PatternId::ExtensibleProperty, text)
}

pub fn min_fields(text: &str) -> Option<usize> {
    count(PatternId::MinFieldsProperty, text)
}

pub fn max_fields(text: &str) -> Option<usize> {
    count(PatternId::MaxFieldsProperty, text)
}

/// Trimmed first capture of a property pattern
///
/// Returns `None` for patterns without captures or when the text does not match.
pub fn property_text(id: PatternId, text: &str) -> Option<String> {
    let m = id.captures(text)?;
    Some(m.group(1)?.trim().to_string())
}

/// Version identifier from an `!IDD_Version` line
pub fn dictionary_version(line: &str) -> Option<&str> {
    PatternId::Version.captures(line)?.group(1)
}
