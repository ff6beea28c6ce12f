use crate::collation::narish_alpha_convert;
use crate::models::WordData;

/// Words shown per dictionary page.
pub const PAGE_LIMIT: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Match against definitions.
    #[default]
    English,
    /// Match against the word itself.
    Narish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryQuery {
    pub mode: SearchMode,
    pub search: Option<String>,
    /// 1-based.
    pub page: usize,
}

impl Default for DictionaryQuery {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            search: None,
            page: 1,
        }
    }
}

impl DictionaryQuery {
    pub fn matches(&self, word: &WordData) -> bool {
        let search = match self.search.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => return true,
        };
        match self.mode {
            SearchMode::English => {
                let needle = search.to_lowercase();
                word.definitions
                    .iter()
                    .any(|d| d.definition.to_lowercase().contains(&needle))
            }
            SearchMode::Narish => {
                // `7` is how the glottal stop is typed on a plain keyboard.
                let needle = narish_alpha_convert(&search.to_lowercase().replace('7', "ɂ"));
                narish_alpha_convert(&word.word.to_lowercase()).contains(&needle)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryPage {
    pub words: Vec<WordData>,
    pub page: usize,
    pub page_count: usize,
    pub total_matches: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Filter `words` (already in dictionary order) and cut out one page.
pub fn search_dictionary(words: &[WordData], query: &DictionaryQuery) -> DictionaryPage {
    let matching: Vec<&WordData> = words.iter().filter(|w| query.matches(w)).collect();
    let total_matches = matching.len();
    let page_count = total_matches.div_ceil(PAGE_LIMIT);
    let page = query.page.max(1);
    let from = (page - 1).saturating_mul(PAGE_LIMIT);

    DictionaryPage {
        words: matching
            .into_iter()
            .skip(from)
            .take(PAGE_LIMIT)
            .cloned()
            .collect(),
        page,
        page_count,
        total_matches,
        has_previous: page > 1 && page - 1 <= page_count,
        has_next: page < page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordDefinition;

    fn word(id: i64, text: &str, definition: &str) -> WordData {
        WordData {
            id,
            word: text.to_string(),
            pos: None,
            root: None,
            pattern: None,
            definitions: vec![WordDefinition {
                definition: definition.to_string(),
                examples: vec![],
            }],
        }
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let query = DictionaryQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(query.matches(&word(1, "kat", "stone")));
    }

    #[test]
    fn test_english_search_is_case_insensitive() {
        let query = DictionaryQuery {
            mode: SearchMode::English,
            search: Some("STONE".to_string()),
            page: 1,
        };
        assert!(query.matches(&word(1, "kat", "a small stone")));
        assert!(!query.matches(&word(2, "stone", "water")));
    }

    #[test]
    fn test_narish_search_accepts_seven_for_glottal_stop() {
        let query = DictionaryQuery {
            mode: SearchMode::Narish,
            search: Some("7a".to_string()),
            page: 1,
        };
        assert!(query.matches(&word(1, "Ɂat", "x")));
        assert!(query.matches(&word(2, "saɂa", "x")));
        assert!(!query.matches(&word(3, "kat", "x")));
    }

    #[test]
    fn test_paging() {
        let words: Vec<WordData> = (1..=60).map(|id| word(id, "kat", "stone")).collect();

        let first = search_dictionary(&words, &DictionaryQuery::default());
        assert_eq!(first.words.len(), PAGE_LIMIT);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.total_matches, 60);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last = search_dictionary(
            &words,
            &DictionaryQuery {
                page: 3,
                ..Default::default()
            },
        );
        assert_eq!(last.words.len(), 10);
        assert_eq!(last.words[0].id, 51);
        assert!(last.has_previous);
        assert!(!last.has_next);

        let beyond = search_dictionary(
            &words,
            &DictionaryQuery {
                page: 9,
                ..Default::default()
            },
        );
        assert!(beyond.words.is_empty());
        assert!(!beyond.has_previous);
    }
}
