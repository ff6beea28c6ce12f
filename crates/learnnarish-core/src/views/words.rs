use std::collections::{HashMap, HashSet};

use crate::collation::narish_sort;
use crate::models::{
    Definition, Example, Pattern, Root, Word, WordData, WordDefinition, WordExample, WordPattern,
    WordRoot,
};

/// Join every word with its root, pattern, definitions and their examples.
///
/// References that do not resolve are left out; the word itself is always
/// produced. Definitions and examples keep the order of their collections.
pub fn join_word_data(
    words: &[Word],
    patterns: &[Pattern],
    roots: &[Root],
    definitions: &[Definition],
    examples: &[Example],
) -> Vec<WordData> {
    let roots: HashMap<i64, &Root> = roots.iter().map(|r| (r.id, r)).collect();
    let patterns: HashMap<i64, &Pattern> = patterns.iter().map(|p| (p.id, p)).collect();

    words
        .iter()
        .map(|word| {
            let root = word.root.and_then(|id| roots.get(&id)).map(|root| WordRoot {
                id: root.id,
                bone_one: root.bone_one.clone().unwrap_or_default(),
                bone_two: root.bone_two.clone().unwrap_or_default(),
            });
            let pattern = word
                .pattern
                .and_then(|id| patterns.get(&id))
                .map(|pattern| WordPattern {
                    name: pattern.name.clone(),
                    number: pattern.number,
                });

            let wanted: HashSet<i64> = word.definitions.iter().copied().collect();
            let definitions = definitions
                .iter()
                .filter(|definition| wanted.contains(&definition.id))
                .map(|definition| resolve_definition(definition, examples))
                .collect();

            WordData {
                id: word.id,
                word: word.word.clone().unwrap_or_default(),
                pos: word.pos.clone(),
                root,
                pattern,
                definitions,
            }
        })
        .collect()
}

fn resolve_definition(definition: &Definition, examples: &[Example]) -> WordDefinition {
    let wanted: HashSet<i64> = definition.examples.iter().copied().collect();
    WordDefinition {
        definition: definition.definition.clone().unwrap_or_default(),
        examples: examples
            .iter()
            .filter(|example| wanted.contains(&example.id))
            .map(|example| WordExample {
                narish: example.narish.clone(),
                english: example.english.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

/// Words in dictionary order.
pub fn sorted_words(words: &[WordData]) -> Vec<WordData> {
    let mut sorted = words.to_vec();
    sorted.sort_by(narish_sort);
    sorted
}

pub fn word_data_id_map(words: &[WordData]) -> HashMap<i64, WordData> {
    words.iter().map(|word| (word.id, word.clone())).collect()
}
