use abbrev::{abbrev, Filter};
use proptest::prelude::*;

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{0,5}", 0..8)
}

fn filters() -> impl Strategy<Value = Option<Filter>> {
    prop_oneof![
        Just(None),
        "[a-c]{0,2}".prop_map(|p| Some(Filter::prefix(p))),
        "[a-c]".prop_map(|p| Some(Filter::pattern(&p).unwrap())),
    ]
}

fn accepts(filter: &Option<Filter>, text: &str) -> bool {
    filter.as_ref().map_or(true, |f| f.matches(text))
}

proptest! {
    #[test]
    fn every_word_maps_to_itself(words in words(), filter in filters()) {
        let table = abbrev(&words, filter.as_ref());
        for word in words.iter().filter(|w| accepts(&filter, w)) {
            prop_assert_eq!(table.get(word), Some(word));
        }
    }

    #[test]
    fn abbreviations_are_unique_prefixes(words in words(), filter in filters()) {
        let table = abbrev(&words, filter.as_ref());
        for (key, word) in &table {
            prop_assert!(accepts(&filter, key));
            if words.contains(key) {
                continue;
            }
            let owners = words.iter().filter(|w| w.starts_with(key.as_str())).count();
            prop_assert_eq!(owners, 1);
            prop_assert!(word.starts_with(key.as_str()));
        }
    }

    #[test]
    fn unique_prefixes_are_found(words in words(), filter in filters()) {
        let table = abbrev(&words, filter.as_ref());
        for word in &words {
            for len in 1..=word.len() {
                let prefix = &word[..len];
                let owners = words.iter().filter(|w| w.starts_with(prefix)).count();
                if owners == 1 && accepts(&filter, prefix) {
                    prop_assert_eq!(table.get(prefix), Some(word));
                }
            }
        }
    }

    #[test]
    fn idempotent(words in words(), filter in filters()) {
        prop_assert_eq!(abbrev(&words, filter.as_ref()), abbrev(&words, filter.as_ref()));
    }
}
