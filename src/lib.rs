//! IDD Grammar
//!
//! The line grammar of Input Data Dictionary (IDD) files: the schema language
//! that describes every object and field a building energy simulation input
//! file may contain.
//!
//! ## Features
//!
//! - **Pattern Registry**: One compiled regular expression per construct,
//!   addressed by [`PatternId`] and compiled once per process
//! - **Pure Matching**: `(PatternId, line) -> Option<MatchResult>`; a failed
//!   match is a normal outcome, not an error
//! - **Typed Properties**: Bounds, field types, automatic defaults and counts
//!   decoded from captures
//! - **Survey**: A line-by-line census of whole dictionary files
//!
//! ## Dictionary Layout
//!
//! ```text
//! !IDD_Version 8.0.0                 <- Version / Header
//! \group Materials                   <- Group
//! Material,                          <- ObjectAndFields / Line
//!   \memo Regular materials          <- MetaDataComment -> MemoProperty
//!   A1 , \field Name                 <- Field / Name
//!   N1 ; \field Thickness            <- Field / ClosingField
//!        \units m                    <- UnitsProperty
//!        \minimum> 0                 <- MinExclusiveProperty
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod grammar;
pub mod property;
pub mod survey;

pub use checksum::Checksum;
pub use config::GrammarConfig;
pub use error::{GrammarError, Result};
pub use grammar::{grammar, Grammar, MatchResult, OwnedMatch, Pattern, PatternId};
pub use property::{AutoDefault, Bound, FieldKind, FieldToken, FieldType};
pub use survey::{classify_line, survey, DictionarySurvey, LineClass};
