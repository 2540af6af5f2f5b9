use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use danci_review::{
    check_sentence, logging, storage, CardFace, Config, ReviewError, ReviewSession, SessionStart,
    SystemClock, Vocabulary, VocabularyStore, WordDraft,
};

type App = Vocabulary<Box<dyn VocabularyStore>, SystemClock>;

#[derive(Parser)]
#[command(name = "danci-review", version, about = "生词本间隔复习")]
struct Cli {
    /// 数据文件路径（.json 使用 JSON 文件存储，其余使用 SQLite）
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 录入新单词
    Add {
        term: String,
        definition: String,
        #[arg(long, default_value = "")]
        example: String,
    },
    /// 编辑已有单词
    Edit {
        original: String,
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        definition: Option<String>,
        #[arg(long)]
        example: Option<String>,
    },
    /// 删除单词
    Remove { term: String },
    /// 按字母顺序列出全部单词
    List,
    /// 词库统计
    Stats,
    /// 开始今日复习
    Review,
    /// 造句练习
    Practice,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.data {
        config = config.with_data_path(path);
    }

    let _log_guard = logging::init_tracing(&config);
    tracing::info!(
        path = %config.data_path.display(),
        store = ?config.store,
        offset = %config.day_offset,
        "starting danci-review"
    );

    let store = storage::open_store(config.store, &config.data_path)
        .with_context(|| format!("无法打开词库: {}", config.data_path.display()))?;
    let mut vocab = Vocabulary::open(store, SystemClock)?.with_day_offset(config.day_offset);
    if let Some(seed) = config.shuffle_seed {
        vocab = vocab.with_seed(seed);
    }

    match cli.command {
        Command::Add {
            term,
            definition,
            example,
        } => {
            let entry = vocab.add_word(WordDraft::new(term, definition, example))?;
            println!("已添加: {}", entry.term);
        }
        Command::Edit {
            original,
            term,
            definition,
            example,
        } => {
            let current = vocab
                .get(&original)
                .cloned()
                .ok_or_else(|| ReviewError::Lookup(original.clone()))?;
            let draft = WordDraft::new(
                term.unwrap_or(current.term),
                definition.unwrap_or(current.definition),
                example.unwrap_or(current.example),
            );
            let entry = vocab.edit_word(&original, draft)?;
            println!("已更新: {}", entry.term);
        }
        Command::Remove { term } => {
            let removed = vocab.remove_word(&term)?;
            println!("已删除: {}", removed.term);
        }
        Command::List => list(&vocab),
        Command::Stats => {
            let stats = vocab.stats();
            println!("单词总数: {}", stats.total_words);
            println!("今日待复习: {}", stats.due_today);
            println!("已掌握: {}", stats.mastered_words);
            println!(
                "正确率: {:.0}% ({}/{})",
                stats.accuracy_percent, stats.correct_attempts, stats.total_attempts
            );
        }
        Command::Review => review(&mut vocab)?,
        Command::Practice => practice(&mut vocab)?,
    }

    Ok(())
}

fn list(vocab: &App) {
    let entries = vocab.sorted_entries();
    if entries.is_empty() {
        println!("词库为空");
        return;
    }

    for entry in entries {
        let due = entry
            .next_due_at
            .map(|at| at.with_timezone(&vocab.day_offset()).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} Lv{} 下次 {} 正确率 {:.0}% ({}/{})  {}",
            entry.term,
            entry.repetition_level,
            due,
            entry.accuracy_percent(),
            entry.correct_attempts,
            entry.total_attempts,
            entry.definition
        );
    }
}

// ============================================================
// 交互
// ============================================================

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, message: &str) -> anyhow::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn confirm(lines: &mut impl Iterator<Item = io::Result<String>>, message: &str) -> anyhow::Result<bool> {
    Ok(prompt(lines, message)?
        .map(|answer| answer.eq_ignore_ascii_case("y"))
        .unwrap_or(false))
}

fn review(vocab: &mut App) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let mut session = match vocab.start_session()? {
            SessionStart::Ready(session) => session,
            SessionStart::EmptyVocabulary => {
                println!("词库为空，请先添加单词");
                return Ok(());
            }
            SessionStart::NothingDue { total_words } => {
                let question = format!("今天没有需要复习的单词。要复习全部 {total_words} 个单词吗? [y/N] ");
                if !confirm(&mut lines, &question)? {
                    return Ok(());
                }
                match vocab.start_full_review()? {
                    SessionStart::Ready(session) => session,
                    _ => return Ok(()),
                }
            }
        };

        if !run_session(vocab, &mut session, &mut lines)? {
            return Ok(());
        }

        println!("本轮复习完成");
        if !confirm(&mut lines, "再来一轮? [y/N] ")? {
            return Ok(());
        }
    }
}

/// 返回 false 表示用户中途退出
fn run_session(
    vocab: &mut App,
    session: &mut ReviewSession,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> anyhow::Result<bool> {
    while !session.is_exhausted() {
        let Some(entry) = vocab.current_card(session).cloned() else {
            session.advance();
            continue;
        };

        println!();
        println!("[{}/{}] {}", session.position() + 1, session.len(), entry.term);
        match prompt(lines, "回车查看释义，q 退出: ")?.as_deref() {
            None | Some("q") => return Ok(false),
            _ => {}
        }

        if session.flip() == CardFace::Answer {
            println!("释义: {}", entry.definition);
            if let Some(example) = entry.display_example() {
                println!("例句: {example}");
            }
        }

        loop {
            let answer = match prompt(lines, "记住了吗? [y/n/q] ")? {
                Some(answer) => answer,
                None => return Ok(false),
            };
            let passed = match answer.to_lowercase().as_str() {
                "y" => true,
                "n" => false,
                "q" => return Ok(false),
                _ => continue,
            };

            match vocab.judge(session, passed) {
                Ok(outcome) => {
                    println!("等级 {} -> {}", outcome.previous_level, outcome.new_level);
                }
                Err(ReviewError::Storage(err)) => {
                    eprintln!("保存失败，本次结果仅保留在内存中: {err}");
                }
                Err(err) => eprintln!("{err}"),
            }
            break;
        }

        session.advance();
    }

    Ok(true)
}

fn practice(vocab: &mut App) -> anyhow::Result<()> {
    let Some(word) = vocab.practice_word().map(|entry| entry.term.clone()) else {
        println!("词库为空，请先添加单词");
        return Ok(());
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let Some(sentence) = prompt(&mut lines, &format!("用 \"{word}\" 造一个句子: "))? else {
        return Ok(());
    };

    let feedback = check_sentence(&sentence, &word);
    if feedback.passed {
        println!("很好!");
    } else {
        for issue in &feedback.issues {
            println!("- {issue}");
        }
    }
    Ok(())
}
