//! Dictionary Survey
//!
//! A read-only census of a dictionary file. Each physical line is run through
//! the grammar in a fixed order (comments, directives, field and object
//! boundaries, then backslash properties) and the results are tallied.
//!
//! This does not build a schema tree: it only records what the grammar saw,
//! which makes it useful for checking that a dictionary is fully recognized.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::checksum::Checksum;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::grammar::{grammar, PatternId};
use crate::property;

/// Object and field properties, in the order they are tried
///
/// Exclusive bounds come before their inclusive counterparts.
pub const PROPERTY_ORDER: [PatternId; 29] = [
    PatternId::MemoProperty,
    PatternId::NoteProperty,
    PatternId::UniqueProperty,
    PatternId::RequiredObjectProperty,
    PatternId::ObsoleteProperty,
    PatternId::HasUrlProperty,
    PatternId::ExtensibleProperty,
    PatternId::FormatProperty,
    PatternId::MinFieldsProperty,
    PatternId::MaxFieldsProperty,
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
    PatternId::TypeProperty,
    PatternId::KeyProperty,
    PatternId::ObjectListProperty,
    PatternId::ExternalListProperty,
    PatternId::ReferenceProperty,
    PatternId::BeginExtensibleProperty,
];

/// What a single physical line is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineClass {
    Blank,
    Comment,
    Group,
    IncludeFile,
    RemoveObject,
    ObjectDeclaration,
    FieldDeclaration,
    /// A backslash property line, tagged with its first property
    Property(PatternId),
    /// Text the grammar does not recognize as anything more specific
    Content,
}

/// Classify the text following a backslash
pub fn classify_property(text: &str) -> Option<PatternId> {
    let grammar = grammar();
    PROPERTY_ORDER
        .into_iter()
        .find(|&id| grammar.is_match(id, text))
}

/// Content of a line with any trailing `!` comment removed
pub fn strip_comment(line: &str) -> &str {
    grammar()
        .captures(PatternId::ContentAndComment, line)
        .and_then(|m| m.group(1))
        .unwrap_or(line)
}

/// Property segments (`\units m`, `\minimum> 0`, ...) in a stretch of content
pub fn property_segments(content: &str) -> Vec<&str> {
    let grammar = grammar();
    let mut segments = Vec::new();
    let mut rest = content;
    while let Some(m) = grammar.captures(PatternId::MetaDataComment, rest) {
        let (Some(segment), Some(remainder)) = (m.group(1), m.group(2)) else {
            break;
        };
        segments.push(segment);
        rest = remainder;
    }
    segments
}

/// Count consecutive field tokens, returning the count and the text after them
fn field_tokens(content: &str) -> (usize, &str) {
    let mut count = 0;
    let mut rest = content;
    while let Some((_, after)) = property::field_token(rest) {
        count += 1;
        rest = after;
    }
    (count, rest)
}

fn is_object_line(content: &str) -> bool {
    let starts_object = content
        .chars()
        .next()
        .map(|c| !c.is_whitespace() && c != '\\')
        .unwrap_or(false);
    starts_object && grammar().is_match(PatternId::Line, content)
}

/// Classify one physical line
pub fn classify_line(line: &str) -> LineClass {
    let grammar = grammar();

    if line.trim().is_empty() {
        return LineClass::Blank;
    }
    if grammar.is_match(PatternId::CommentOnlyLine, line) {
        return LineClass::Comment;
    }

    let content = strip_comment(line);
    let directive = content.trim_start();
    if grammar.is_match(PatternId::Group, directive) {
        return LineClass::Group;
    }
    if grammar.is_match(PatternId::IncludeFile, directive) {
        return LineClass::IncludeFile;
    }
    if grammar.is_match(PatternId::RemoveObject, directive) {
        return LineClass::RemoveObject;
    }

    // Field lines also contain separators, so they are tried before objects.
    if grammar.is_match(PatternId::Field, content) {
        return LineClass::FieldDeclaration;
    }
    if is_object_line(content) {
        return LineClass::ObjectDeclaration;
    }

    property_segments(content)
        .into_iter()
        .find_map(classify_property)
        .map(LineClass::Property)
        .unwrap_or(LineClass::Content)
}

/// Census of one dictionary
#[derive(Debug, Clone, Serialize)]
pub struct DictionarySurvey {
    pub version: Option<String>,
    pub header_lines: usize,
    pub groups: Vec<String>,
    pub includes: Vec<String>,
    pub removed_objects: Vec<String>,
    pub objects: Vec<String>,
    /// Object whose name marks it as the dictionary's version object
    pub version_object: Option<String>,
    pub fields: usize,
    pub properties: BTreeMap<PatternId, usize>,
    /// Defaults of `autosize` or `autocalculate`
    pub automatic_defaults: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    /// 1-based line numbers of lines classified as [`LineClass::Content`]
    pub unrecognized: Vec<usize>,
    /// 1-based line numbers of objects still open when the next one starts
    pub unterminated: Vec<usize>,
    pub checksum: Checksum,
}

impl DictionarySurvey {
    fn new(text: &str) -> Self {
        Self {
            version: None,
            header_lines: 0,
            groups: Vec::new(),
            includes: Vec::new(),
            removed_objects: Vec::new(),
            objects: Vec::new(),
            version_object: None,
            fields: 0,
            properties: BTreeMap::new(),
            automatic_defaults: 0,
            comment_lines: 0,
            blank_lines: 0,
            unrecognized: Vec::new(),
            unterminated: Vec::new(),
            checksum: Checksum::of_text(text),
        }
    }

    /// Whether every non-comment line was recognized and every object closed
    pub fn is_clean(&self) -> bool {
        self.unrecognized.is_empty() && self.unterminated.is_empty()
    }

    pub fn property_count(&self, id: PatternId) -> usize {
        self.properties.get(&id).copied().unwrap_or(0)
    }

    fn record_properties(&mut self, content: &str) {
        for segment in property_segments(content) {
            let Some(id) = classify_property(segment) else {
                continue;
            };
            *self.properties.entry(id).or_insert(0) += 1;
            if id == PatternId::DefaultProperty && property::automatic_default(segment).is_some() {
                self.automatic_defaults += 1;
            }
        }
    }
}

fn directive_text(id: PatternId, directive: &str) -> String {
    property::property_text(id, directive).unwrap_or_default()
}

/// Survey dictionary text
///
/// A leading byte order mark is skipped, both for matching and for the checksum.
pub fn survey(text: &str) -> DictionarySurvey {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let grammar = grammar();
    let mut result = DictionarySurvey::new(text);

    if let Some(header) = grammar
        .captures(PatternId::Header, text)
        .and_then(|m| m.group(1))
    {
        result.header_lines = header.lines().count();
    }

    // Line number of the object still waiting for its closing ';'
    let mut open_object: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let class = classify_line(line);
        tracing::trace!(line = line_no, ?class, "classified");

        let content = strip_comment(line);
        let directive = content.trim_start();

        match class {
            LineClass::Blank => result.blank_lines += 1,
            LineClass::Comment => {
                result.comment_lines += 1;
                if result.version.is_none() {
                    result.version = property::dictionary_version(line).map(str::to_string);
                }
            }
            LineClass::Group => result
                .groups
                .push(directive_text(PatternId::Group, directive)),
            LineClass::IncludeFile => result
                .includes
                .push(directive_text(PatternId::IncludeFile, directive)),
            LineClass::RemoveObject => result
                .removed_objects
                .push(directive_text(PatternId::RemoveObject, directive)),
            LineClass::ObjectDeclaration => {
                if let Some(open) = open_object.take() {
                    result.unterminated.push(open);
                }

                let name = grammar
                    .captures(PatternId::Line, content)
                    .and_then(|m| m.group(1))
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                if result.version_object.is_none()
                    && grammar.is_match(PatternId::VersionObjectName, &name)
                {
                    result.version_object = Some(name.clone());
                }
                result.objects.push(name);

                let closed = grammar.is_match(PatternId::ObjectNoFields, content)
                    || grammar.is_match(PatternId::ClosingField, content);
                if !closed {
                    open_object = Some(line_no);
                }

                // Fields declared on the object line itself
                let after_name = match grammar.captures(PatternId::ObjectAndFields, content) {
                    Some(m) => m.group(2).unwrap_or_default(),
                    None => grammar
                        .captures(PatternId::Line, content)
                        .and_then(|m| m.group(2))
                        .unwrap_or_default(),
                };
                let (count, rest) = field_tokens(after_name);
                result.fields += count;
                result.record_properties(rest);
            }
            LineClass::FieldDeclaration => {
                let (count, rest) = field_tokens(content);
                result.fields += count;
                if grammar.is_match(PatternId::ClosingField, content) {
                    open_object = None;
                }
                result.record_properties(rest);
            }
            LineClass::Property(_) => result.record_properties(content),
            LineClass::Content => result.unrecognized.push(line_no),
        }
    }

    if let Some(open) = open_object {
        result.unterminated.push(open);
    }

    tracing::debug!(
        objects = result.objects.len(),
        fields = result.fields,
        unrecognized = result.unrecognized.len(),
        "surveyed dictionary"
    );
    result
}

/// Survey a dictionary file
pub fn survey_file(path: &Path) -> Result<DictionarySurvey> {
    let text = fs::read_to_string(path)?;
    Ok(survey(&text))
}

/// Survey every dictionary under a directory
///
/// Files that cannot be read are logged and skipped.
pub fn survey_directory(root: &Path, config: &ScanConfig) -> Vec<(PathBuf, DictionarySurvey)> {
    let mut results = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !config.is_dictionary(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_skipped(relative) {
            continue;
        }

        match survey_file(path) {
            Ok(survey) => results.push((relative.to_path_buf(), survey)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable dictionary"),
        }
    }

    results
}
