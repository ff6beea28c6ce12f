//! Dictionary ordering for Narish.
//!
//! Narish orders the glottal stop before `a` and `y` directly after `i`.
//! Substituting a handful of characters before a plain lexical comparison
//! reproduces that order. The substituted text is only ever compared,
//! never shown.

use std::cmp::Ordering;

use crate::models::WordData;

/// Remap `input` so that byte-wise comparison follows Narish collation.
pub fn narish_alpha_convert(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'Ɂ' => '@',
            'ɂ' => '`',
            'Y' => 'J',
            'y' => 'j',
            other => other,
        })
        .collect()
}

fn compare_narish(left: &str, right: &str) -> Ordering {
    narish_alpha_convert(left).cmp(&narish_alpha_convert(right))
}

/// `Some` before `None`.
fn present_first<T>(left: &Option<T>, right: &Option<T>) -> Ordering {
    match (left, right) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Dictionary order: by root (root-less words last), then pattern
/// (pattern-less words last), then the word itself.
pub fn narish_sort(left: &WordData, right: &WordData) -> Ordering {
    let by_root = match (&left.root, &right.root) {
        (Some(l), Some(r)) => compare_narish(&l.bone_one, &r.bone_one)
            .then_with(|| compare_narish(&l.bone_two, &r.bone_two)),
        _ => present_first(&left.root, &right.root),
    };

    by_root
        .then_with(|| present_first(&left.pattern, &right.pattern))
        .then_with(|| {
            let left = left.pattern.as_ref().and_then(|p| p.number);
            let right = right.pattern.as_ref().and_then(|p| p.number);
            match (left, right) {
                (Some(l), Some(r)) => l.cmp(&r),
                // An unnumbered pattern ties and falls through to the word.
                _ => Ordering::Equal,
            }
        })
        .then_with(|| compare_narish(&left.word, &right.word))
}

/// Stable ascending sort on an extracted key.
pub fn sort_by_ascending_key<T, K, F>(items: &mut [T], key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    items.sort_by_key(key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WordPattern, WordRoot};

    fn word(id: i64, text: &str, root: Option<(&str, &str)>, pattern: Option<i64>) -> WordData {
        WordData {
            id,
            word: text.to_string(),
            pos: None,
            root: root.map(|(one, two)| WordRoot {
                id,
                bone_one: one.to_string(),
                bone_two: two.to_string(),
            }),
            pattern: pattern.map(|number| WordPattern {
                name: None,
                number: Some(number),
            }),
            definitions: Vec::new(),
        }
    }

    #[test]
    fn test_alpha_convert_only_touches_four_characters() {
        assert_eq!(narish_alpha_convert("ɁaɂYy"), "@a`Jj");
        assert_eq!(narish_alpha_convert("kat"), "kat");
    }

    #[test]
    fn test_glottal_stop_sorts_before_a() {
        let glottal = word(1, "x", Some(("Ɂ", "t")), None);
        let a = word(2, "x", Some(("A", "t")), None);
        assert_eq!(narish_sort(&glottal, &a), Ordering::Less);

        let lower = word(3, "x", Some(("ɂ", "t")), None);
        let lower_a = word(4, "x", Some(("a", "t")), None);
        assert_eq!(narish_sort(&lower, &lower_a), Ordering::Less);
    }

    #[test]
    fn test_y_sorts_between_i_and_k() {
        let i = word(1, "x", Some(("i", "t")), None);
        let y = word(2, "x", Some(("y", "t")), None);
        let k = word(3, "x", Some(("k", "t")), None);
        assert_eq!(narish_sort(&i, &y), Ordering::Less);
        assert_eq!(narish_sort(&y, &k), Ordering::Less);
    }

    #[test]
    fn test_rootless_words_sort_last() {
        let rootless = word(1, "aaa", None, Some(1));
        let rooted = word(2, "zzz", Some(("z", "z")), None);
        assert_eq!(narish_sort(&rootless, &rooted), Ordering::Greater);
        assert_eq!(narish_sort(&rooted, &rootless), Ordering::Less);
    }

    #[test]
    fn test_pattern_then_word_tie_breaks() {
        let no_pattern = word(1, "a", Some(("k", "t")), None);
        let pattern_two = word(2, "a", Some(("k", "t")), Some(2));
        let pattern_one = word(3, "b", Some(("k", "t")), Some(1));
        assert_eq!(narish_sort(&pattern_two, &no_pattern), Ordering::Less);
        assert_eq!(narish_sort(&pattern_one, &pattern_two), Ordering::Less);

        let same_a = word(4, "kat", Some(("k", "t")), Some(1));
        let same_b = word(5, "kat", Some(("k", "t")), Some(1));
        assert_eq!(narish_sort(&same_a, &same_b), Ordering::Equal);
    }

    #[test]
    fn test_unnumbered_pattern_ties_on_number() {
        let mut unnumbered = word(1, "zal", Some(("k", "t")), Some(0));
        unnumbered.pattern = Some(WordPattern {
            name: Some("agent".to_string()),
            number: None,
        });
        let numbered = word(2, "kat", Some(("k", "t")), Some(3));
        assert_eq!(narish_sort(&numbered, &unnumbered), Ordering::Less);
        assert_eq!(narish_sort(&unnumbered, &numbered), Ordering::Greater);

        let earlier_word = word(3, "bat", Some(("k", "t")), Some(9));
        assert_eq!(narish_sort(&unnumbered, &earlier_word), Ordering::Greater);
        unnumbered.word = "aal".to_string();
        assert_eq!(narish_sort(&unnumbered, &earlier_word), Ordering::Less);
    }

    #[test]
    fn test_two_rootless_words_compare_by_pattern_and_word() {
        let a = word(1, "ba", None, None);
        let b = word(2, "ab", None, None);
        let c = word(3, "zz", None, Some(4));
        assert_eq!(narish_sort(&b, &a), Ordering::Less);
        assert_eq!(narish_sort(&c, &b), Ordering::Less);
    }

    #[test]
    fn test_sort_by_ascending_key_is_stable() {
        let mut items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        sort_by_ascending_key(&mut items, |(k, _)| *k);
        assert_eq!(items, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }
}
