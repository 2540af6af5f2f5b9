//! 词典查询边界与录入校验
//!
//! 查词服务本身不在引擎内；引擎只约定 [`DictionaryLookup`] 接口，
//! 并负责识别界面在查词过程中写入的占位文本，保证入库的释义可用。

use tracing::{debug, warn};

use crate::error::{ReviewError, ReviewResult};

/// 释义占位文本
pub const DEFINITION_PLACEHOLDERS: [&str; 3] = [
    "Definition not found.",
    "Error fetching definition.",
    "Fetching definition...",
];

/// 例句占位文本
pub const EXAMPLE_PLACEHOLDERS: [&str; 4] = [
    "(No example found for this definition.)",
    "(No example found for this word.)",
    "(Error fetching example.)",
    "Fetching examples...",
];

/// 释义为空或仍是占位文本
pub fn is_definition_placeholder(definition: &str) -> bool {
    let definition = definition.trim();
    definition.is_empty() || DEFINITION_PLACEHOLDERS.contains(&definition)
}

/// 例句为空或仍是占位文本
pub fn is_example_placeholder(example: &str, term: &str) -> bool {
    let example = example.trim();
    example.is_empty()
        || EXAMPLE_PLACEHOLDERS.contains(&example)
        || example == format!("(Example for \"{}\" not provided. Add manually.)", term.trim())
}

// ============================================================
// 查词接口
// ============================================================

/// 查词结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found {
        definition: String,
        example: Option<String>,
    },
    NotFound,
    Failed(String),
}

/// 词典查询服务
pub trait DictionaryLookup {
    fn lookup(&self, term: &str) -> LookupOutcome;
}

impl<F> DictionaryLookup for F
where
    F: Fn(&str) -> LookupOutcome,
{
    fn lookup(&self, term: &str) -> LookupOutcome {
        self(term)
    }
}

// ============================================================
// WordDraft - 录入/编辑表单
// ============================================================

/// 待入库的单词表单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDraft {
    pub term: String,
    pub definition: String,
    pub example: String,
}

impl WordDraft {
    pub fn new(
        term: impl Into<String>,
        definition: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            example: example.into(),
        }
    }

    /// 释义或例句缺失，需要查词补全
    pub fn needs_lookup(&self) -> bool {
        is_definition_placeholder(&self.definition) || is_example_placeholder(&self.example, &self.term)
    }

    /// 用查词结果补全空白或占位字段，用户已填写的内容不会被覆盖
    pub fn resolve_with(mut self, dictionary: &dyn DictionaryLookup) -> Self {
        let term = self.term.trim().to_string();
        if term.is_empty() || !self.needs_lookup() {
            return self;
        }

        match dictionary.lookup(&term) {
            LookupOutcome::Found { definition, example } => {
                if is_definition_placeholder(&self.definition) {
                    self.definition = definition;
                }
                if is_example_placeholder(&self.example, &term) {
                    if let Some(example) = example {
                        self.example = example;
                    }
                }
                debug!(term = %term, "draft resolved from dictionary");
            }
            LookupOutcome::NotFound => {
                debug!(term = %term, "dictionary has no entry");
            }
            LookupOutcome::Failed(reason) => {
                warn!(term = %term, reason = %reason, "dictionary lookup failed");
            }
        }
        self
    }

    /// 校验并规整表单：去除首尾空白，丢弃占位例句
    pub(crate) fn validate(self) -> ReviewResult<WordDraft> {
        let term = self.term.trim().to_string();
        if term.is_empty() {
            return Err(ReviewError::Validation("单词不能为空".to_string()));
        }

        let definition = self.definition.trim().to_string();
        if is_definition_placeholder(&definition) {
            return Err(ReviewError::Validation(format!("单词 \"{}\" 缺少可用的释义", term)));
        }

        let example = if is_example_placeholder(&self.example, &term) {
            String::new()
        } else {
            self.example.trim().to_string()
        };

        Ok(WordDraft {
            term,
            definition,
            example,
        })
    }
}
