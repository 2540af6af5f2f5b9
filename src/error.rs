//! 复习引擎错误类型

use thiserror::Error;

use crate::storage::StorageError;

/// 复习引擎错误
///
/// 空词库、今日无到期单词都不是错误，由 [`crate::SessionStart`] 显式表达。
#[derive(Error, Debug)]
pub enum ReviewError {
    /// 录入/编辑时字段缺失或不可用，不产生任何修改
    #[error("校验失败: {0}")]
    Validation(String),

    /// 单词（忽略大小写）与已有条目重复
    #[error("单词已存在: {0}")]
    Duplicate(String),

    /// 引用的单词不在词库中，属于调用方状态错误
    #[error("单词未找到: {0}")]
    Lookup(String),

    /// 只有答案面朝上、会话未结束且本卡尚未评判时才能评判
    #[error("当前卡片不可评判")]
    JudgmentUnavailable,

    /// 持久化失败；内存中的修改已生效
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
}

pub type ReviewResult<T> = Result<T, ReviewError>;
