//! 答题记录
//!
//! 每道题一条记录，顺序与考试题目顺序一致。记录里保存题干副本，
//! 即使考试对象被替换，答卷也能从记录重建。

use crate::error::SessionError;
use crate::models::exam::{AnswerOption, Question};

/// 单道题的答题记录
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub question_id: String,
    pub question_text: String,
    /// 当前选中的选项，`None` 表示未作答
    pub selected_answer: Option<AnswerOption>,
}

/// 答题记录表
#[derive(Debug, Default)]
pub struct AnswerLedger {
    entries: Vec<LedgerEntry>,
    initialized: bool,
}

impl AnswerLedger {
    /// 按题目顺序初始化，所有题目均为未作答
    ///
    /// 每个会话只能初始化一次，重复调用不做任何事并返回 `false`。
    pub fn initialize(&mut self, questions: &[Question]) -> bool {
        if self.initialized {
            return false;
        }

        self.entries = questions
            .iter()
            .map(|q| LedgerEntry {
                question_id: q.id.clone(),
                question_text: q.text.clone(),
                selected_answer: None,
            })
            .collect();
        self.initialized = true;
        true
    }

    /// 记录某题的选择，新选择直接替换旧选择
    ///
    /// 调用方负责保证 `answer` 属于该题自己的选项。
    pub fn select(&mut self, question_index: usize, answer: AnswerOption) -> Result<(), SessionError> {
        let total = self.entries.len();
        let entry = self
            .entries
            .get_mut(question_index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question_index,
                total,
            })?;
        entry.selected_answer = Some(answer);
        Ok(())
    }

    /// 某题是否已作答
    pub fn is_answered(&self, question_index: usize) -> bool {
        self.entries
            .get(question_index)
            .map(|e| e.selected_answer.is_some())
            .unwrap_or(false)
    }

    /// 已作答题数
    pub fn count_answered(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.selected_answer.is_some())
            .count()
    }

    /// 某题当前选中的选项
    pub fn selected(&self, question_index: usize) -> Option<&AnswerOption> {
        self.entries
            .get(question_index)
            .and_then(|e| e.selected_answer.as_ref())
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// 题目总数
    pub fn question_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str) -> AnswerOption {
        AnswerOption {
            id: id.to_string(),
            text: id.to_uppercase(),
            correct: false,
        }
    }

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: format!("q{}", i),
                text: format!("第 {} 题", i + 1),
                answers: vec![option("a"), option("b")],
            })
            .collect()
    }

    #[test]
    fn test_initialize_one_entry_per_question() {
        let mut ledger = AnswerLedger::default();
        assert!(ledger.initialize(&questions(4)));

        assert_eq!(ledger.question_count(), 4);
        assert_eq!(ledger.count_answered(), 0);
        for (i, entry) in ledger.entries().iter().enumerate() {
            assert_eq!(entry.question_id, format!("q{}", i));
            assert!(entry.selected_answer.is_none());
        }
    }

    #[test]
    fn test_second_initialize_is_noop() {
        let mut ledger = AnswerLedger::default();
        ledger.initialize(&questions(2));
        ledger.select(0, option("a")).unwrap();

        assert!(!ledger.initialize(&questions(5)));
        assert_eq!(ledger.question_count(), 2);
        assert!(ledger.is_answered(0));
    }

    #[test]
    fn test_select_replaces_previous_choice() {
        let mut ledger = AnswerLedger::default();
        ledger.initialize(&questions(1));

        ledger.select(0, option("a")).unwrap();
        ledger.select(0, option("b")).unwrap();

        assert_eq!(ledger.selected(0).map(|o| o.id.as_str()), Some("b"));
        assert_eq!(ledger.count_answered(), 1);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut ledger = AnswerLedger::default();
        ledger.initialize(&questions(2));

        let err = ledger.select(2, option("a")).unwrap_err();
        assert!(matches!(
            err,
            SessionError::QuestionOutOfRange { index: 2, total: 2 }
        ));
        assert!(!ledger.is_answered(2));
    }
}
