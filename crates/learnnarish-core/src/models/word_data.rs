use serde::{Deserialize, Serialize};

/// A word with its root, pattern, definitions and examples resolved.
///
/// Built by [`crate::views::join_word_data`]; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WordData {
    pub id: i64,
    pub word: String,
    pub pos: Option<String>,
    pub root: Option<WordRoot>,
    pub pattern: Option<WordPattern>,
    pub definitions: Vec<WordDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WordRoot {
    pub id: i64,
    pub bone_one: String,
    pub bone_two: String,
}

impl WordRoot {
    pub fn display(&self) -> String {
        format!("{}-{}", self.bone_one, self.bone_two)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WordPattern {
    pub name: Option<String>,
    pub number: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WordDefinition {
    pub definition: String,
    pub examples: Vec<WordExample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WordExample {
    pub narish: Option<String>,
    pub english: String,
}
