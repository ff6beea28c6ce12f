//! Derived views over raw collections.
//!
//! Everything here is a pure function of collection snapshots. The cache
//! manager applies them to both halves of a `DbResult`, so a view is
//! computed once from local data and again from synced data.

pub mod dictionary;
pub mod pages;
pub mod words;

pub use dictionary::{search_dictionary, DictionaryPage, DictionaryQuery, SearchMode, PAGE_LIMIT};
pub use pages::{link_map, ordered_pages};
pub use words::{join_word_data, sorted_words, word_data_id_map};
