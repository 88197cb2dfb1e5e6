use serde::{Deserialize, Serialize};

use crate::models::exam::AnswerOption;

/// 提交给考试服务的答卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub email_id: String,
    pub exam_id: String,
    pub title: String,
    /// 考试时长（分钟）
    pub duration: u32,
    /// 实际用时（秒）
    pub duration_taken: u64,
    pub questions: Vec<SubmittedQuestion>,
}

/// 答卷中的单道题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedQuestion {
    pub id: String,
    pub text: String,
    pub answers: Vec<SubmittedAnswer>,
}

/// 答卷中的单个选项，带是否被选中标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub id: String,
    pub text: String,
    pub correct: bool,
    pub is_selected: bool,
}

impl SubmittedAnswer {
    /// 标记为已选中
    pub fn selected(option: &AnswerOption) -> Self {
        Self::with_flag(option, true)
    }

    /// 标记为未选中
    pub fn not_selected(option: &AnswerOption) -> Self {
        Self::with_flag(option, false)
    }

    fn with_flag(option: &AnswerOption, is_selected: bool) -> Self {
        Self {
            id: option.id.clone(),
            text: option.text.clone(),
            correct: option.correct,
            is_selected,
        }
    }
}

impl SubmissionPayload {
    /// 已作答题目数
    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.answers.iter().any(|a| a.is_selected))
            .count()
    }
}
