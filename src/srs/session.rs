//! 复习会话
//!
//! 会话是一次性的：候选单词被均匀打乱后逐张展示，游标越过最后一张即进入
//! [`SessionState::Exhausted`]。结束后的会话不会重放，调用方需重新做到期筛选再开新会话。

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 卡片朝上的一面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    /// 单词面
    Prompt,
    /// 释义面，仅此时可以评判
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Exhausted,
}

/// 复习会话（不持久化）
#[derive(Debug, Clone)]
pub struct ReviewSession {
    cards: Vec<String>,
    cursor: usize,
    face: CardFace,
    judged: bool,
    full_review: bool,
}

impl ReviewSession {
    /// 以到期单词开启会话，Fisher-Yates 均匀打乱
    pub fn start<R: Rng + ?Sized>(candidates: Vec<String>, rng: &mut R) -> Self {
        Self::shuffled(candidates, rng, false)
    }

    /// 今日无到期单词时，用户选择复习整个词库
    pub fn start_full_review<R: Rng + ?Sized>(candidates: Vec<String>, rng: &mut R) -> Self {
        Self::shuffled(candidates, rng, true)
    }

    /// 按给定顺序开启会话（不打乱）
    pub fn from_ordered(cards: Vec<String>) -> Self {
        Self {
            cards,
            cursor: 0,
            face: CardFace::Prompt,
            judged: false,
            full_review: false,
        }
    }

    fn shuffled<R: Rng + ?Sized>(mut cards: Vec<String>, rng: &mut R, full_review: bool) -> Self {
        cards.shuffle(rng);
        Self {
            full_review,
            ..Self::from_ordered(cards)
        }
    }

    pub fn state(&self) -> SessionState {
        if self.cursor >= self.cards.len() {
            SessionState::Exhausted
        } else {
            SessionState::Active
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state() == SessionState::Exhausted
    }

    /// 当前卡片的单词；会话结束时为 `None`
    pub fn current_term(&self) -> Option<&str> {
        self.cards.get(self.cursor).map(String::as_str)
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    /// 翻面；会话结束后不再响应
    pub fn flip(&mut self) -> CardFace {
        if !self.is_exhausted() {
            self.face = match self.face {
                CardFace::Prompt => CardFace::Answer,
                CardFace::Answer => CardFace::Prompt,
            };
        }
        self.face
    }

    pub fn can_judge(&self) -> bool {
        !self.is_exhausted() && self.face == CardFace::Answer && !self.judged
    }

    pub fn is_judged(&self) -> bool {
        self.judged
    }

    pub(crate) fn mark_judged(&mut self) {
        self.judged = true;
    }

    /// 前进到下一张，新卡片总是单词面朝上
    pub fn advance(&mut self) -> SessionState {
        if !self.is_exhausted() {
            self.cursor += 1;
            self.face = CardFace::Prompt;
            self.judged = false;
        }
        self.state()
    }

    /// 当前游标（从 0 开始）
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.cursor)
    }

    pub fn is_full_review(&self) -> bool {
        self.full_review
    }

    pub fn cards(&self) -> &[String] {
        &self.cards
    }
}
