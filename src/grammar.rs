//! Dictionary Line Grammar
//!
//! The lexical grammar of the Input Data Dictionary (IDD) format as a table of
//! named regular expressions. Each [`PatternId`] names one construct (version
//! marker, object declaration, field declaration, `\units`, `\minimum>`, ...)
//! and maps to a single compiled [`Pattern`].
//!
//! Matching is a pure function of `(PatternId, line)`: a line either does not
//! match (`None`) or yields the captured groups in the order documented by
//! [`PatternId::groups`]. The grammar keeps no cross-line state; assembling
//! objects out of consecutive lines is left to the caller.
//!
//! ```text
//! Material,                                   <- ObjectAndFields / Line
//!   \memo Regular materials described ...     <- MetaDataComment -> MemoProperty
//!   A1 , \field Name                          <- Field, Name
//!   N1 , \field Thickness                     <- Field, Name
//!        \units m                             <- MetaDataComment -> UnitsProperty
//!        \minimum> 0                          <- MetaDataComment -> MinExclusiveProperty
//! ```
//!
//! Patterns are compiled once per process on first use ([`grammar`]) and are
//! shared read-only afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GrammarError, Result};

/// Name of the comment only object automatically added to a dictionary
pub const COMMENT_ONLY_OBJECT_NAME: &str = "CommentOnly";

/// Text of the comment only object automatically added to a dictionary
pub const COMMENT_ONLY_OBJECT_TEXT: &str = "CommentOnly; ! Autogenerated comment only object.";

// =============================================================================
// Pattern Identifiers
// =============================================================================

/// One construct of the dictionary grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternId {
    Version,
    Header,
    CommentOnlyLine,
    ContentAndComment,
    Group,
    IncludeFile,
    RemoveObject,
    Line,
    MemoProperty,
    NoteProperty,
    ObjectNoFields,
    ObjectAndFields,
    UniqueProperty,
    RequiredObjectProperty,
    ObsoleteProperty,
    HasUrlProperty,
    ExtensibleProperty,
    FormatProperty,
    MinFieldsProperty,
    MaxFieldsProperty,
    Field,
    ClosingField,
    LastField,
    Name,
    NameProperty,
    RequiredFieldProperty,
    AutosizableProperty,
    AutocalculatableProperty,
    RetaincaseProperty,
    UnitsProperty,
    IpUnitsProperty,
    MinExclusiveProperty,
    MinInclusiveProperty,
    MaxExclusiveProperty,
    MaxInclusiveProperty,
    DeprecatedProperty,
    DefaultProperty,
    AutomaticDefault,
    TypeProperty,
    KeyProperty,
    ObjectListProperty,
    ExternalListProperty,
    ReferenceProperty,
    BeginExtensible,
    BeginExtensibleProperty,
    MetaDataComment,
    VersionObjectName,
}

impl PatternId {
    /// Every pattern, in declaration order
    pub const ALL: [PatternId; 47] = [
        PatternId::Version,
        PatternId::Header,
        PatternId::CommentOnlyLine,
        PatternId::ContentAndComment,
        PatternId::Group,
        PatternId::IncludeFile,
        PatternId::RemoveObject,
        PatternId::Line,
        PatternId::MemoProperty,
        PatternId::NoteProperty,
        PatternId::ObjectNoFields,
        PatternId::ObjectAndFields,
        PatternId::UniqueProperty,
        PatternId::RequiredObjectProperty,
        PatternId::ObsoleteProperty,
        PatternId::HasUrlProperty,
        PatternId::ExtensibleProperty,
        PatternId::FormatProperty,
        PatternId::MinFieldsProperty,
        PatternId::MaxFieldsProperty,
        PatternId::Field,
        PatternId::ClosingField,
        PatternId::LastField,
        PatternId::Name,
        PatternId::NameProperty,
        PatternId::RequiredFieldProperty,
        PatternId::AutosizableProperty,
        PatternId::AutocalculatableProperty,
        PatternId::RetaincaseProperty,
        PatternId::UnitsProperty,
        PatternId::IpUnitsProperty,
        PatternId::MinExclusiveProperty,
        PatternId::MinInclusiveProperty,
        PatternId::MaxExclusiveProperty,
        PatternId::MaxInclusiveProperty,
        PatternId::DeprecatedProperty,
        PatternId::DefaultProperty,
        PatternId::AutomaticDefault,
        PatternId::TypeProperty,
        PatternId::KeyProperty,
        PatternId::ObjectListProperty,
        PatternId::ExternalListProperty,
        PatternId::ReferenceProperty,
        PatternId::BeginExtensible,
        PatternId::BeginExtensibleProperty,
        PatternId::MetaDataComment,
        PatternId::VersionObjectName,
    ];

    fn definition(self) -> &'static PatternDef {
        let def = &DEFINITIONS[self as usize];
        debug_assert_eq!(def.id, self);
        def
    }

    /// PascalCase name, e.g. `MinExclusiveProperty`
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Kebab-case name, e.g. `min-exclusive-property`
    pub fn kebab_name(self) -> String {
        let mut out = String::with_capacity(self.name().len() + 4);
        for (i, c) in self.name().chars().enumerate() {
            if c.is_ascii_uppercase() {
                if i > 0 {
                    out.push('-');
                }
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Regular expression source
    pub fn source(self) -> &'static str {
        self.definition().source
    }

    /// Declared meaning of each capture group, in capture order
    pub fn groups(self) -> &'static [&'static str] {
        self.definition().groups
    }

    /// The compiled pattern from the process-wide grammar
    pub fn pattern(self) -> &'static Pattern {
        grammar().pattern(self)
    }

    /// Match a line against this pattern
    pub fn captures(self, line: &str) -> Option<MatchResult<'_>> {
        self.pattern().captures(line)
    }

    /// Check whether a line matches this pattern
    pub fn is_match(self, line: &str) -> bool {
        self.pattern().is_match(line)
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternId {
    type Err = GrammarError;

    /// Accepts `MinExclusiveProperty`, `min-exclusive-property` or
    /// `min_exclusive_property`, ignoring case
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        PatternId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| GrammarError::UnknownPattern(s.to_string()))
    }
}

// =============================================================================
// Pattern Table
// =============================================================================

struct PatternDef {
    id: PatternId,
    name: &'static str,
    source: &'static str,
    groups: &'static [&'static str],
}

const fn def(
    id: PatternId,
    name: &'static str,
    source: &'static str,
    groups: &'static [&'static str],
) -> PatternDef {
    PatternDef { id, name, source, groups }
}

use PatternId::*;

/// Indexed by `PatternId as usize`; must stay in declaration order.
static DEFINITIONS: [PatternDef; 47] = [
    def(Version, "Version", r"^!IDD_Version ([0-9\.]+)", &["version"]),
    // Multi-line: runs of '!' lines from the start of the text up to the
    // first line that does not begin with '!'.
    def(Header, "Header", r"(?ms)\A(!.*?)^[^!]", &["header"]),
    def(CommentOnlyLine, "CommentOnlyLine", r"^[\s\t]*[!](.*)", &["comment"]),
    def(
        ContentAndComment,
        "ContentAndComment",
        r"^([^!]*)[!]?(.*)",
        &["content", "comment"],
    ),
    def(Group, "Group", r"^[\\][gG]roup(.*)", &["group name"]),
    def(
        IncludeFile,
        "IncludeFile",
        r"^[\\][iI]nclude-[fF]ile(.*)",
        &["included file name"],
    ),
    def(
        RemoveObject,
        "RemoveObject",
        r"^[\\][rR]emove-[oO]bject(.*)",
        &["object to exclude from the included file"],
    ),
    def(
        Line,
        "Line",
        r"^([^!]*?)[,;](.*)",
        &["before separator", "after separator"],
    ),
    def(MemoProperty, "MemoProperty", r"^[mM]emo(.*)", &["memo text"]),
    def(NoteProperty, "NoteProperty", r"^[nN]ote(.*)", &["note text"]),
    def(
        ObjectNoFields,
        "ObjectNoFields",
        r"^([^!\^,]*?)[;](.*)",
        &["object text", "after separator"],
    ),
    def(
        ObjectAndFields,
        "ObjectAndFields",
        r"^(.*?[,].*?)([AN][0-9]+[\s\t]*[,;].*)",
        &["object text", "fields text"],
    ),
    def(UniqueProperty, "UniqueProperty", r"^[uU]nique-[oO]bject", &[]),
    def(
        RequiredObjectProperty,
        "RequiredObjectProperty",
        r"^[rR]equired-[oO]bject",
        &[],
    ),
    def(ObsoleteProperty, "ObsoleteProperty", r"^[oO]bsolete(.*)", &["reason"]),
    def(
        HasUrlProperty,
        "HasUrlProperty",
        r"^(?:URL-[Oo]bject|url-[Oo]bject)",
        &[],
    ),
    def(
        ExtensibleProperty,
        "ExtensibleProperty",
        r"^[eE]xtensible[\s\t]*:[\s\t]*([1-9][0-9]*)",
        &["number of trailing fields to extend"],
    ),
    def(FormatProperty, "FormatProperty", r"^[fF]ormat([^!]*)", &["format text"]),
    def(
        MinFieldsProperty,
        "MinFieldsProperty",
        r"^[mM]in-[fF]ields[\s\t]*([0-9]+)",
        &["minimum number of fields"],
    ),
    def(
        MaxFieldsProperty,
        "MaxFieldsProperty",
        r"^[mM]ax-[fF]ields[\s\t]*([0-9]+)",
        &["maximum number of fields"],
    ),
    def(
        Field,
        "Field",
        r"^[\s\t]*?([AN])([0-9]+)[\s\t]*[,;](.*)",
        &["alpha or numeric indicator", "field number", "after separator"],
    ),
    def(
        ClosingField,
        "ClosingField",
        r"(.*)([AN][0-9]+[\s\t]*[;].*?)$",
        &["previous text", "closing field"],
    ),
    def(
        LastField,
        "LastField",
        r"(.*)([AN][0-9]+[\s\t]*[,;].*)$",
        &["previous text", "last field"],
    ),
    def(Name, "Name", r"[\\][fF]ield([^\\\^!]*)", &["field name"]),
    def(NameProperty, "NameProperty", r"^[fF]ield([^!]*)", &["field name"]),
    def(
        RequiredFieldProperty,
        "RequiredFieldProperty",
        r"^[rR]equired-[fF]ield",
        &[],
    ),
    def(AutosizableProperty, "AutosizableProperty", r"^[aA]utosizable", &[]),
    def(
        AutocalculatableProperty,
        "AutocalculatableProperty",
        r"^[aA]utocalculatable",
        &[],
    ),
    def(RetaincaseProperty, "RetaincaseProperty", r"^[rR]etaincase", &[]),
    def(UnitsProperty, "UnitsProperty", r"^[uU]nits([^!]*)", &["units"]),
    def(IpUnitsProperty, "IpUnitsProperty", r"^[iI][pP]-[uU]nits([^!]*)", &["ip units"]),
    def(
        MinExclusiveProperty,
        "MinExclusiveProperty",
        r"^[mM]inimum[\s\t]*[>]([^!]*)",
        &["exclusive minimum"],
    ),
    // The capture must run to a comment or the end of the text, so a '>'
    // anywhere in the value rejects the line instead of truncating it.
    def(
        MinInclusiveProperty,
        "MinInclusiveProperty",
        r"^[mM]inimum([^>!]*)(?:!|$)",
        &["inclusive minimum"],
    ),
    def(
        MaxExclusiveProperty,
        "MaxExclusiveProperty",
        r"^[mM]aximum[\s\t]*[<]([^!]*)",
        &["exclusive maximum"],
    ),
    def(
        MaxInclusiveProperty,
        "MaxInclusiveProperty",
        r"^[mM]aximum([^<!]*)(?:!|$)",
        &["inclusive maximum"],
    ),
    def(DeprecatedProperty, "DeprecatedProperty", r"^[dD]eprecated(.*)", &["reason"]),
    def(DefaultProperty, "DefaultProperty", r"^[dD]efault([^!]*)", &["default value"]),
    def(
        AutomaticDefault,
        "AutomaticDefault",
        r"(?i).*(autocalculate|autosize).*",
        &["keyword"],
    ),
    def(
        TypeProperty,
        "TypeProperty",
        r"(?i)^type[\s\t]*(integer|real|alpha|choice|node|object-list|external-list|url|handle)",
        &["type"],
    ),
    def(KeyProperty, "KeyProperty", r"^[kK]ey(.*)", &["key value"]),
    def(
        ObjectListProperty,
        "ObjectListProperty",
        r"^[oO]bject-[lL]ist([^!]*)",
        &["object-list value"],
    ),
    def(
        ExternalListProperty,
        "ExternalListProperty",
        r"^[eE]xternal-[lL]ist([^!]*)",
        &["external-list value"],
    ),
    def(
        ReferenceProperty,
        "ReferenceProperty",
        r"^[rR]eference([^!]*)",
        &["reference value"],
    ),
    def(BeginExtensible, "BeginExtensible", r"[\\][bB]egin-[eE]xtensible", &[]),
    def(
        BeginExtensibleProperty,
        "BeginExtensibleProperty",
        r"^[bB]egin-[eE]xtensible",
        &[],
    ),
    def(
        MetaDataComment,
        "MetaDataComment",
        r"^[\s\t]*?[\\]([^\\]*)(.*)",
        &["text up to the next backslash", "remainder"],
    ),
    def(VersionObjectName, "VersionObjectName", r".*[vV]ersion.*", &[]),
];

// =============================================================================
// Compiled Patterns
// =============================================================================

/// A compiled grammar construct
#[derive(Debug)]
pub struct Pattern {
    id: PatternId,
    regex: Regex,
}

impl Pattern {
    fn compile(id: PatternId) -> Result<Self> {
        let regex = Regex::new(id.source())
            .map_err(|source| GrammarError::MalformedPattern { pattern: id, source })?;
        Ok(Self { id, regex })
    }

    pub fn id(&self) -> PatternId {
        self.id
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn groups(&self) -> &'static [&'static str] {
        self.id.groups()
    }

    /// Match a line, returning the captured groups
    ///
    /// Groups that did not take part in the match are reported as `""`.
    pub fn captures<'t>(&self, line: &'t str) -> Option<MatchResult<'t>> {
        let caps = self.regex.captures(line)?;
        let groups = (1..self.regex.captures_len())
            .map(|i| caps.get(i).map_or("", |m| m.as_str()))
            .collect();
        Some(MatchResult {
            pattern: self.id,
            groups,
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// The full registry of compiled patterns, indexed by [`PatternId`]
#[derive(Debug)]
pub struct Grammar {
    patterns: Vec<Pattern>,
}

impl Grammar {
    /// Compile every pattern of the grammar
    pub fn try_new() -> Result<Self> {
        let patterns = PatternId::ALL
            .into_iter()
            .map(Pattern::compile)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(patterns = patterns.len(), "compiled dictionary grammar");
        Ok(Self { patterns })
    }

    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id as usize]
    }

    /// Match a line against the named pattern
    pub fn captures<'t>(&self, id: PatternId, line: &'t str) -> Option<MatchResult<'t>> {
        self.pattern(id).captures(line)
    }

    pub fn is_match(&self, id: PatternId, line: &str) -> bool {
        self.pattern(id).is_match(line)
    }

    /// Every pattern that matches the line, in declaration order
    pub fn matching(&self, line: &str) -> Vec<PatternId> {
        self.patterns
            .iter()
            .filter(|p| p.is_match(line))
            .map(Pattern::id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    Grammar::try_new().unwrap_or_else(|e| panic!("dictionary grammar failed to compile: {e}"))
});

/// The process-wide grammar, compiled on first use
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

// =============================================================================
// Match Results
// =============================================================================

/// Captured groups of a successful match, borrowed from the input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult<'t> {
    pub pattern: PatternId,
    pub groups: Vec<&'t str>,
}

impl<'t> MatchResult<'t> {
    /// Capture group by 1-based index, as numbered in the grammar docs
    pub fn group(&self, n: usize) -> Option<&'t str> {
        n.checked_sub(1).and_then(|i| self.groups.get(i).copied())
    }

    pub fn groups(&self) -> &[&'t str] {
        &self.groups
    }

    pub fn into_owned(self) -> OwnedMatch {
        OwnedMatch {
            pattern: self.pattern,
            groups: self.groups.into_iter().map(str::to_string).collect(),
        }
    }
}

/// A [`MatchResult`] detached from its input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedMatch {
    pub pattern: PatternId,
    pub groups: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(id: PatternId, line: &str) -> Option<Vec<&str>> {
        id.captures(line).map(|m| m.groups)
    }

    #[test]
    fn test_table_order_matches_ids() {
        for (i, id) in PatternId::ALL.into_iter().enumerate() {
            assert_eq!(DEFINITIONS[i].id, id);
            assert_eq!(id as usize, i);
            assert_eq!(format!("{:?}", id), id.name());
        }
    }

    #[test]
    fn test_group_counts_match_declarations() {
        let grammar = Grammar::try_new().unwrap();
        for pattern in grammar.iter() {
            assert_eq!(
                pattern.as_regex().captures_len() - 1,
                pattern.groups().len(),
                "{}",
                pattern.id()
            );
        }
    }

    #[test]
    fn test_pattern_id_from_str() {
        assert_eq!(
            "MinExclusiveProperty".parse::<PatternId>().unwrap(),
            PatternId::MinExclusiveProperty
        );
        assert_eq!(
            "min-exclusive-property".parse::<PatternId>().unwrap(),
            PatternId::MinExclusiveProperty
        );
        assert_eq!("ip_units_property".parse::<PatternId>().unwrap(), PatternId::IpUnitsProperty);
        assert!(matches!(
            "NotAPattern".parse::<PatternId>(),
            Err(GrammarError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_kebab_name_round_trips() {
        for id in PatternId::ALL {
            assert_eq!(id.kebab_name().parse::<PatternId>().unwrap(), id);
        }
        assert_eq!(PatternId::IpUnitsProperty.kebab_name(), "ip-units-property");
    }

    #[test]
    fn test_version() {
        assert_eq!(caps(Version, "!IDD_Version 8.0.0.1"), Some(vec!["8.0.0.1"]));
        assert_eq!(caps(Version, " !IDD_Version 8.0"), None);
        assert_eq!(caps(Version, "!IDD_Version"), None);
    }

    #[test]
    fn test_header_stops_at_first_content_line() {
        let text = "!IDD_Version 8.0\n! comment\nLead Input;\n! later";
        assert_eq!(
            caps(Header, text),
            Some(vec!["!IDD_Version 8.0\n! comment\n"])
        );
        assert_eq!(caps(Header, "Lead Input;\n! later\nx"), None);
        assert_eq!(caps(Header, "! only a header"), None);
    }

    #[test]
    fn test_comment_only_line() {
        assert_eq!(caps(CommentOnlyLine, "   ! a comment"), Some(vec![" a comment"]));
        assert_eq!(caps(CommentOnlyLine, "\t!"), Some(vec![""]));
        assert_eq!(caps(CommentOnlyLine, "Version, A1;"), None);
        assert_eq!(caps(CommentOnlyLine, "A1; ! trailing"), None);
    }

    #[test]
    fn test_content_and_comment() {
        assert_eq!(
            caps(ContentAndComment, "A1, \\field Name ! the name"),
            Some(vec!["A1, \\field Name ", " the name"])
        );
        assert_eq!(caps(ContentAndComment, "Lead Input;"), Some(vec!["Lead Input;", ""]));
    }

    #[test]
    fn test_group_include_remove() {
        assert_eq!(
            caps(Group, "\\group Simulation Parameters"),
            Some(vec![" Simulation Parameters"])
        );
        assert_eq!(caps(Group, "\\Group Surfaces"), Some(vec![" Surfaces"]));
        assert_eq!(caps(Group, "\\GROUP Surfaces"), None);
        assert_eq!(caps(Group, "group Surfaces"), None);
        assert_eq!(
            caps(IncludeFile, "\\include-file Energy+.idd"),
            Some(vec![" Energy+.idd"])
        );
        assert_eq!(caps(IncludeFile, "\\Include-File x.idd"), Some(vec![" x.idd"]));
        assert_eq!(
            caps(RemoveObject, "\\remove-object Lead Input"),
            Some(vec![" Lead Input"])
        );
    }

    #[test]
    fn test_line_splits_at_first_separator() {
        assert_eq!(
            caps(Line, "Version, A1 ; \\field Version Identifier"),
            Some(vec!["Version", " A1 ; \\field Version Identifier"])
        );
        assert_eq!(caps(Line, "Lead Input;"), Some(vec!["Lead Input", ""]));
        assert_eq!(caps(Line, "! comment, with; separators"), None);
        assert_eq!(caps(Line, "no separator"), None);
    }

    #[test]
    fn test_object_no_fields() {
        assert_eq!(caps(ObjectNoFields, "SimpleObject;"), Some(vec!["SimpleObject", ""]));
        assert_eq!(
            caps(ObjectNoFields, "Lead Input; ! no fields"),
            Some(vec!["Lead Input", " ! no fields"])
        );
        assert_eq!(caps(ObjectNoFields, "Version, A1;"), None);
        assert_eq!(caps(ObjectNoFields, "! x; y"), None);
    }

    #[test]
    fn test_object_and_fields() {
        assert_eq!(
            caps(ObjectAndFields, "ComplexObject, A1 ,N2;"),
            Some(vec!["ComplexObject, ", "A1 ,N2;"])
        );
        assert_eq!(caps(ObjectAndFields, "SimpleObject;"), None);
        assert_eq!(caps(ObjectAndFields, "Material,"), None);
    }

    #[test]
    fn test_object_flags() {
        assert!(UniqueProperty.is_match("unique-object"));
        assert!(UniqueProperty.is_match("Unique-Object"));
        assert!(!UniqueProperty.is_match("UNIQUE-OBJECT"));
        assert!(RequiredObjectProperty.is_match("required-object"));
        assert!(HasUrlProperty.is_match("URL-Object"));
        assert!(HasUrlProperty.is_match("url-object"));
        assert!(!HasUrlProperty.is_match("Url-Object"));
        assert_eq!(caps(HasUrlProperty, "url-object"), Some(vec![]));
        assert_eq!(
            caps(ObsoleteProperty, "obsolete => Other:Object"),
            Some(vec![" => Other:Object"])
        );
    }

    #[test]
    fn test_counts() {
        assert_eq!(caps(ExtensibleProperty, "extensible:3"), Some(vec!["3"]));
        assert_eq!(
            caps(ExtensibleProperty, "extensible : 12 \\begin-extensible"),
            Some(vec!["12"])
        );
        assert_eq!(caps(ExtensibleProperty, "extensible:0"), None);
        assert_eq!(caps(MinFieldsProperty, "min-fields 5"), Some(vec!["5"]));
        assert_eq!(caps(MaxFieldsProperty, "Max-Fields\t10"), Some(vec!["10"]));
        assert_eq!(caps(MinFieldsProperty, "min-fields many"), None);
    }

    #[test]
    fn test_format_stops_at_comment() {
        assert_eq!(caps(FormatProperty, "format vertices ! x"), Some(vec![" vertices "]));
    }

    #[test]
    fn test_field() {
        assert_eq!(caps(Field, "  A3, some text"), Some(vec!["A", "3", " some text"]));
        assert_eq!(caps(Field, "N12; "), Some(vec!["N", "12", " "]));
        assert_eq!(caps(Field, "\tN1 , \\field Thickness"), Some(vec!["N", "1", " \\field Thickness"]));
        assert_eq!(caps(Field, "a1, lower case"), None);
        assert_eq!(caps(Field, "A, no number"), None);
    }

    #[test]
    fn test_closing_and_last_field() {
        assert_eq!(
            caps(ClosingField, "A1, A2; ! end"),
            Some(vec!["A1, ", "A2; ! end"])
        );
        assert_eq!(caps(ClosingField, "A1, A2,"), None);
        assert_eq!(caps(LastField, "A1, A2, A3,"), Some(vec!["A1, A2, ", "A3,"]));
        assert_eq!(caps(LastField, "N12;"), Some(vec!["", "N12;"]));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(caps(Name, "\\field Thickness"), Some(vec![" Thickness"]));
        assert_eq!(
            caps(Name, "A1 , \\field Name \\required-field"),
            Some(vec![" Name "])
        );
        assert_eq!(caps(Name, "field Thickness"), None);
        assert_eq!(caps(NameProperty, "field Thickness ! x"), Some(vec![" Thickness "]));
    }

    #[test]
    fn test_field_flags() {
        assert!(RequiredFieldProperty.is_match("required-field"));
        assert!(AutosizableProperty.is_match("autosizable"));
        assert!(AutocalculatableProperty.is_match("Autocalculatable"));
        assert!(RetaincaseProperty.is_match("retaincase"));
        assert!(BeginExtensibleProperty.is_match("begin-extensible"));
        assert!(BeginExtensible.is_match("A3, \\begin-extensible"));
        assert!(!BeginExtensibleProperty.is_match("\\begin-extensible"));
    }

    #[test]
    fn test_units() {
        assert_eq!(caps(UnitsProperty, "Units m"), Some(vec![" m"]));
        assert_eq!(caps(IpUnitsProperty, "ip-units in"), Some(vec![" in"]));
        assert_eq!(caps(IpUnitsProperty, "IP-Units in"), Some(vec![" in"]));
        assert_eq!(caps(UnitsProperty, "ip-units in"), None);
    }

    #[test]
    fn test_exclusive_and_inclusive_bounds_do_not_overlap() {
        assert_eq!(caps(MinExclusiveProperty, "minimum>0"), Some(vec!["0"]));
        assert_eq!(caps(MinInclusiveProperty, "minimum>0"), None);
        assert_eq!(caps(MinInclusiveProperty, "minimum 0"), Some(vec![" 0"]));
        assert_eq!(caps(MinExclusiveProperty, "minimum 0"), None);
        assert_eq!(caps(MinInclusiveProperty, "minimum 0 ! c"), Some(vec![" 0 "]));

        assert_eq!(caps(MaxExclusiveProperty, "maximum< 100"), Some(vec![" 100"]));
        assert_eq!(caps(MaxInclusiveProperty, "maximum< 100"), None);
        assert_eq!(caps(MaxInclusiveProperty, "Maximum 100"), Some(vec![" 100"]));
        assert_eq!(caps(MaxExclusiveProperty, "maximum 100"), None);
    }

    #[test]
    fn test_mixed_bound_markers() {
        assert_eq!(caps(MinExclusiveProperty, "minimum >< 5"), Some(vec!["< 5"]));
        assert_eq!(caps(MinInclusiveProperty, "minimum >< 5"), None);
        assert_eq!(caps(MaxExclusiveProperty, "maximum <> 5"), Some(vec!["> 5"]));
        assert_eq!(caps(MaxInclusiveProperty, "maximum <> 5"), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(caps(DefaultProperty, "default 10.0"), Some(vec![" 10.0"]));
        assert_eq!(caps(AutomaticDefault, "Default AutoSize"), Some(vec!["AutoSize"]));
        assert_eq!(
            caps(AutomaticDefault, "default autocalculate"),
            Some(vec!["autocalculate"])
        );
        assert_eq!(caps(AutomaticDefault, "Default 10.0"), None);
        assert_eq!(caps(DeprecatedProperty, "deprecated use X"), Some(vec![" use X"]));
    }

    #[test]
    fn test_type_property() {
        assert_eq!(caps(TypeProperty, "type real"), Some(vec!["real"]));
        assert_eq!(caps(TypeProperty, "Type Object-List"), Some(vec!["Object-List"]));
        assert_eq!(caps(TypeProperty, "TYPE\tchoice"), Some(vec!["choice"]));
        assert_eq!(caps(TypeProperty, "type string"), None);
    }

    #[test]
    fn test_list_properties() {
        assert_eq!(caps(KeyProperty, "key Smooth"), Some(vec![" Smooth"]));
        assert_eq!(
            caps(ObjectListProperty, "object-list ScheduleNames"),
            Some(vec![" ScheduleNames"])
        );
        assert_eq!(
            caps(ExternalListProperty, "External-List autoRDDvariable"),
            Some(vec![" autoRDDvariable"])
        );
        assert_eq!(
            caps(ReferenceProperty, "reference MaterialName ! x"),
            Some(vec![" MaterialName "])
        );
        assert_eq!(caps(MemoProperty, "memo Some text"), Some(vec![" Some text"]));
        assert_eq!(caps(NoteProperty, "Note fields as indicated"), Some(vec![" fields as indicated"]));
    }

    #[test]
    fn test_meta_data_comment() {
        assert_eq!(
            caps(MetaDataComment, "   \\units m"),
            Some(vec!["units m", ""])
        );
        assert_eq!(
            caps(MetaDataComment, "\\field Name \\required-field"),
            Some(vec!["field Name ", "\\required-field"])
        );
        assert_eq!(caps(MetaDataComment, "units m"), None);
    }

    #[test]
    fn test_keyword_case_variants() {
        // (pattern, accepted keyword spellings, rejected spelling, suffix, capture [1])
        let table: &[(PatternId, &[&str], &str, &str, Option<&str>)] = &[
            (Group, &["\\group", "\\Group"], "\\GROUP", " x", Some(" x")),
            (
                IncludeFile,
                &["\\include-file", "\\Include-file", "\\include-File", "\\Include-File"],
                "\\INCLUDE-FILE",
                " x",
                Some(" x"),
            ),
            (
                RemoveObject,
                &["\\remove-object", "\\Remove-object", "\\remove-Object", "\\Remove-Object"],
                "\\REMOVE-OBJECT",
                " x",
                Some(" x"),
            ),
            (MemoProperty, &["memo", "Memo"], "MEMO", " x", Some(" x")),
            (NoteProperty, &["note", "Note"], "NOTE", " x", Some(" x")),
            (
                UniqueProperty,
                &["unique-object", "Unique-object", "unique-Object", "Unique-Object"],
                "UNIQUE-OBJECT",
                "",
                None,
            ),
            (
                RequiredObjectProperty,
                &["required-object", "Required-object", "required-Object", "Required-Object"],
                "REQUIRED-OBJECT",
                "",
                None,
            ),
            (ObsoleteProperty, &["obsolete", "Obsolete"], "OBSOLETE", " x", Some(" x")),
            (
                HasUrlProperty,
                &["URL-object", "URL-Object", "url-object", "url-Object"],
                "URL-OBJECT",
                "",
                None,
            ),
            (ExtensibleProperty, &["extensible", "Extensible"], "EXTENSIBLE", ":3", Some("3")),
            (FormatProperty, &["format", "Format"], "FORMAT", " x", Some(" x")),
            (
                MinFieldsProperty,
                &["min-fields", "Min-fields", "min-Fields", "Min-Fields"],
                "MIN-FIELDS",
                " 4",
                Some("4"),
            ),
            (
                MaxFieldsProperty,
                &["max-fields", "Max-fields", "max-Fields", "Max-Fields"],
                "MAX-FIELDS",
                " 4",
                Some("4"),
            ),
            (Name, &["\\field", "\\Field"], "\\FIELD", " x", Some(" x")),
            (NameProperty, &["field", "Field"], "FIELD", " x", Some(" x")),
            (
                RequiredFieldProperty,
                &["required-field", "Required-field", "required-Field", "Required-Field"],
                "REQUIRED-FIELD",
                "",
                None,
            ),
            (AutosizableProperty, &["autosizable", "Autosizable"], "AUTOSIZABLE", "", None),
            (
                AutocalculatableProperty,
                &["autocalculatable", "Autocalculatable"],
                "AUTOCALCULATABLE",
                "",
                None,
            ),
            (RetaincaseProperty, &["retaincase", "Retaincase"], "RETAINCASE", "", None),
            (UnitsProperty, &["units", "Units"], "UNITS", " x", Some(" x")),
            (
                IpUnitsProperty,
                &[
                    "ip-units", "Ip-units", "iP-units", "IP-units",
                    "ip-Units", "Ip-Units", "iP-Units", "IP-Units",
                ],
                "IP-UNITS",
                " x",
                Some(" x"),
            ),
            (MinExclusiveProperty, &["minimum>", "Minimum>"], "MINIMUM>", " x", Some(" x")),
            (MinInclusiveProperty, &["minimum", "Minimum"], "MINIMUM", " x", Some(" x")),
            (MaxExclusiveProperty, &["maximum<", "Maximum<"], "MAXIMUM<", " x", Some(" x")),
            (MaxInclusiveProperty, &["maximum", "Maximum"], "MAXIMUM", " x", Some(" x")),
            (DeprecatedProperty, &["deprecated", "Deprecated"], "DEPRECATED", " x", Some(" x")),
            (DefaultProperty, &["default", "Default"], "DEFAULT", " x", Some(" x")),
            (
                AutomaticDefault,
                &["autosize", "Autosize", "AUTOSIZE", "autoCalculate"],
                "auto-size",
                "",
                None,
            ),
            (TypeProperty, &["type", "Type", "TYPE", "tYpE"], "types", " real", Some("real")),
            (KeyProperty, &["key", "Key"], "KEY", " x", Some(" x")),
            (
                ObjectListProperty,
                &["object-list", "Object-list", "object-List", "Object-List"],
                "OBJECT-LIST",
                " x",
                Some(" x"),
            ),
            (
                ExternalListProperty,
                &["external-list", "External-list", "external-List", "External-List"],
                "EXTERNAL-LIST",
                " x",
                Some(" x"),
            ),
            (ReferenceProperty, &["reference", "Reference"], "REFERENCE", " x", Some(" x")),
            (
                BeginExtensible,
                &["\\begin-extensible", "\\Begin-extensible", "\\begin-Extensible", "\\Begin-Extensible"],
                "\\BEGIN-EXTENSIBLE",
                "",
                None,
            ),
            (
                BeginExtensibleProperty,
                &["begin-extensible", "Begin-extensible", "begin-Extensible", "Begin-Extensible"],
                "BEGIN-EXTENSIBLE",
                "",
                None,
            ),
            (VersionObjectName, &["version", "Version"], "VERSION", "", None),
        ];

        for &(id, accepted, rejected, suffix, expected) in table {
            for keyword in accepted {
                let line = format!("{}{}", keyword, suffix);
                let m = id
                    .captures(&line)
                    .unwrap_or_else(|| panic!("{} rejected {:?}", id, line));
                match expected {
                    Some(text) => assert_eq!(m.group(1), Some(text), "{} on {:?}", id, line),
                    None if id == AutomaticDefault => {
                        assert_eq!(m.group(1), Some(*keyword), "{} on {:?}", id, line)
                    }
                    None => assert!(m.groups().is_empty(), "{} on {:?}", id, line),
                }
            }
            let line = format!("{}{}", rejected, suffix);
            assert!(!id.is_match(&line), "{} accepted {:?}", id, line);
        }
    }

    #[test]
    fn test_version_object_name() {
        assert!(VersionObjectName.is_match("Version"));
        assert!(VersionObjectName.is_match("OS:version"));
        assert!(!VersionObjectName.is_match("Material"));
    }

    #[test]
    fn test_empty_line_only_matches_content_and_comment() {
        assert_eq!(grammar().matching(""), vec![PatternId::ContentAndComment]);
        assert_eq!(caps(ContentAndComment, ""), Some(vec!["", ""]));
    }

    #[test]
    fn test_matching_is_idempotent() {
        let line = "  N1 , \\field Thickness";
        for id in PatternId::ALL {
            assert_eq!(id.captures(line), id.captures(line));
        }
    }

    #[test]
    fn test_group_is_one_based() {
        let m = Field.captures("A3, rest").unwrap();
        assert_eq!(m.group(0), None);
        assert_eq!(m.group(1), Some("A"));
        assert_eq!(m.group(3), Some(" rest"));
        assert_eq!(m.group(4), None);
        let owned = m.into_owned();
        assert_eq!(owned.groups, vec!["A", "3", " rest"]);
    }

    #[test]
    fn test_comment_only_object_text_is_an_object() {
        let m = ObjectNoFields.captures(COMMENT_ONLY_OBJECT_TEXT).unwrap();
        assert_eq!(m.group(1), Some(COMMENT_ONLY_OBJECT_NAME));
    }

    #[test]
    fn test_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    grammar()
                        .captures(PatternId::UnitsProperty, "units W/m-K")
                        .map(MatchResult::into_owned)
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap().groups, vec![" W/m-K"]);
        }
    }
}
