//! Data models for Learn Narish content.
//!
//! This module contains the records mirrored from the content server and
//! the derived, denormalised shapes built from them:
//!
//! - `Lesson`, `Page`: site content
//! - `Word`, `Root`, `Pattern`, `Definition`, `Example`: dictionary collections
//! - `WordData`: a word joined with everything it references
//! - `Collection`, `Record`: the partition each record type lives in

pub mod content;
pub mod lexicon;
pub mod record;
pub mod word_data;

pub use content::{Lesson, Page};
pub use lexicon::{Definition, Example, Pattern, Root, Word};
pub use record::{Collection, IndexSpec, Record, RecordMeta, BY_DISPLAY_ORDER, BY_NUMBER};
pub use word_data::{WordData, WordDefinition, WordExample, WordPattern, WordRoot};
