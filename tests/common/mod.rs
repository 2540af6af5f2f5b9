#![allow(dead_code)]

use danci_review::{FixedClock, MemoryStore, Vocabulary, WordDraft, WordEntry};

pub type TestVocabulary = Vocabulary<MemoryStore, FixedClock>;

/// 2026-10-18 09:00 UTC 的固定时钟 + 内存存储
pub fn fresh_vocabulary(seed: u64) -> (TestVocabulary, MemoryStore, FixedClock) {
    let store = MemoryStore::new();
    let clock = FixedClock::at_ymd(2026, 10, 18);
    let vocab = Vocabulary::open(store.clone(), clock.clone())
        .expect("memory store always loads")
        .with_seed(seed);
    (vocab, store, clock)
}

pub fn vocabulary_with(words: &[&str]) -> (TestVocabulary, MemoryStore, FixedClock) {
    let (mut vocab, store, clock) = fresh_vocabulary(42);
    for word in words {
        vocab
            .add_word(WordDraft::new(*word, format!("meaning of {word}"), ""))
            .expect("fixture word is valid");
    }
    (vocab, store, clock)
}

pub fn find<'a>(entries: &'a [WordEntry], term: &str) -> &'a WordEntry {
    entries
        .iter()
        .find(|entry| entry.term == term)
        .unwrap_or_else(|| panic!("{term} not found"))
}
