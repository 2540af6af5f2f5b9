//! 造句练习
//!
//! 从词库随机抽取一个单词，检查用户造的句子：必须完整包含该单词，
//! 句末要有标点，另附少量常见语法提示。

use std::fmt;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::WordEntry;

fn me_go_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\bme go\b").expect("static pattern"))
}

/// 造句问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentenceIssue {
    Empty,
    MissingWord { word: String },
    GrammarHint { corrected: String },
    MissingPunctuation,
}

impl fmt::Display for SentenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "句子不能为空"),
            Self::MissingWord { word } => write!(f, "句子必须包含单词 \"{}\"", word),
            Self::GrammarHint { corrected } => write!(f, "语法建议: \"{}\"", corrected),
            Self::MissingPunctuation => write!(f, "句末请加上句号、问号或感叹号"),
        }
    }
}

/// 造句检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceFeedback {
    pub passed: bool,
    pub issues: Vec<SentenceIssue>,
}

/// 随机抽取练习单词
pub fn pick_practice_word<'a, R: Rng + ?Sized>(
    entries: &'a [WordEntry],
    rng: &mut R,
) -> Option<&'a WordEntry> {
    entries.choose(rng)
}

fn contains_whole_word(sentence: &str, word: &str) -> bool {
    let pattern = format!(r"(?i)(?:^|\W){}(?:$|\W)", regex::escape(word));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(sentence),
        Err(_) => sentence.to_lowercase().contains(&word.to_lowercase()),
    }
}

/// 检查句子
pub fn check_sentence(sentence: &str, required_word: &str) -> SentenceFeedback {
    let sentence = sentence.trim();
    if sentence.is_empty() {
        return SentenceFeedback {
            passed: false,
            issues: vec![SentenceIssue::Empty],
        };
    }

    let mut issues = Vec::new();
    let word = required_word.trim();

    if !contains_whole_word(sentence, word) {
        issues.push(SentenceIssue::MissingWord {
            word: word.to_string(),
        });
    }

    if me_go_pattern().is_match(sentence) {
        issues.push(SentenceIssue::GrammarHint {
            corrected: me_go_pattern().replace_all(sentence, "I go").into_owned(),
        });
    }

    if !sentence.ends_with(['.', '!', '?']) {
        issues.push(SentenceIssue::MissingPunctuation);
    }

    SentenceFeedback {
        passed: issues.is_empty(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_good_sentence_passes() {
        let feedback = check_sentence("Fame is Ephemeral.", "ephemeral");
        assert!(feedback.passed);
        assert!(feedback.issues.is_empty());
    }

    #[test]
    fn test_word_must_match_whole_word() {
        let feedback = check_sentence("The ephemerality of it all.", "ephemeral");
        assert_eq!(
            feedback.issues,
            vec![SentenceIssue::MissingWord {
                word: "ephemeral".to_string()
            }]
        );
    }

    #[test]
    fn test_special_characters_in_word() {
        assert!(check_sentence("I like C++ a lot.", "c++").passed);
        assert!(check_sentence("A well-known fact.", "well-known").passed);
    }

    #[test]
    fn test_grammar_and_punctuation() {
        let feedback = check_sentence("Me go to school", "school");

        assert!(!feedback.passed);
        assert_eq!(
            feedback.issues,
            vec![
                SentenceIssue::GrammarHint {
                    corrected: "I go to school".to_string()
                },
                SentenceIssue::MissingPunctuation,
            ]
        );
    }

    #[test]
    fn test_empty_sentence() {
        let feedback = check_sentence("   ", "word");
        assert_eq!(feedback.issues, vec![SentenceIssue::Empty]);
    }

    #[test]
    fn test_pick_practice_word() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(pick_practice_word(&[], &mut rng).is_none());

        let entries = vec![WordEntry::new("only", "def", "", Utc::now())];
        assert_eq!(pick_practice_word(&entries, &mut rng).map(|e| e.term.as_str()), Some("only"));
    }
}
