//! Raw dictionary collections. Foreign keys are plain ids into sibling collections.

use serde::{Deserialize, Serialize};

use super::record::{Collection, Record, RecordMeta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Word {
    pub id: i64,
    /// `Root.id`
    #[serde(default)]
    pub root: Option<i64>,
    #[serde(default)]
    pub word: Option<String>,
    /// `Pattern.id`
    #[serde(default)]
    pub pattern: Option<i64>,
    #[serde(default)]
    pub pos: Option<String>,
    /// `Definition.id`s
    #[serde(default)]
    pub definitions: Vec<i64>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Root {
    pub id: i64,
    #[serde(default)]
    pub bone_one: Option<String>,
    #[serde(default)]
    pub bone_two: Option<String>,
    #[serde(default)]
    pub words: Vec<i64>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Pattern {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// `Example.id` illustrating the pattern.
    #[serde(default)]
    pub example: Option<i64>,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Definition {
    pub id: i64,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub word: Option<i64>,
    /// `Example.id`s
    #[serde(default)]
    pub examples: Vec<i64>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Example {
    pub id: i64,
    #[serde(default)]
    pub narish: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub definition: Option<i64>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> i64 {
                self.id
            }
        }
    };
}

impl_record!(Word, Collection::Words);
impl_record!(Root, Collection::Roots);
impl_record!(Pattern, Collection::Patterns);
impl_record!(Definition, Collection::Definitions);
impl_record!(Example, Collection::Examples);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word_with_null_relations() {
        let json = r#"{"id": 7, "root": null, "word": "kat", "pattern": null, "pos": "n", "definitions": [100, 101]}"#;
        let word: Word = serde_json::from_str(json).expect("word should parse");
        assert_eq!(word.root, None);
        assert_eq!(word.pattern, None);
        assert_eq!(word.definitions, vec![100, 101]);
    }

    #[test]
    fn test_parse_definition_without_examples() {
        let json = r#"{"id": 100, "definition": "stone"}"#;
        let definition: Definition = serde_json::from_str(json).expect("definition should parse");
        assert!(definition.examples.is_empty());
        assert_eq!(definition.word, None);
    }
}
