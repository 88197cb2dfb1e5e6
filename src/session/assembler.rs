//! 答卷组装
//!
//! 每道题的规则：
//! - 已作答：只放被选中的那一个选项，标记为选中
//! - 未作答：放该题全部原始选项，全部标记为未选中
//!
//! 两种形状都是接收方要求的，不能统一成其中一种。

use std::time::Duration;

use crate::error::SessionError;
use crate::models::exam::Exam;
use crate::models::submission::{SubmissionPayload, SubmittedAnswer, SubmittedQuestion};
use crate::session::ledger::AnswerLedger;
use crate::session::state::FinishTrigger;

/// 计算用时（秒）
///
/// 手动交卷按实际经过时间四舍五入；超时交卷固定记为考试总时长。
pub fn duration_taken(trigger: FinishTrigger, elapsed: Duration, exam_duration_minutes: u32) -> u64 {
    match trigger {
        FinishTrigger::Manual => (elapsed.as_millis() as f64 / 1000.0).round() as u64,
        FinishTrigger::Timeout => u64::from(exam_duration_minutes) * 60,
    }
}

/// 答卷组装器
pub struct SubmissionAssembler<'a> {
    exam: &'a Exam,
    exam_id: &'a str,
    candidate_email: &'a str,
}

impl<'a> SubmissionAssembler<'a> {
    /// # 参数
    /// - `exam`: 本次加载的考试
    /// - `exam_id`: 请求时使用的考试ID
    /// - `candidate_email`: 考生邮箱
    pub fn new(exam: &'a Exam, exam_id: &'a str, candidate_email: &'a str) -> Self {
        Self {
            exam,
            exam_id,
            candidate_email,
        }
    }

    /// 按题目原始顺序组装答卷
    pub fn assemble(&self, ledger: &AnswerLedger, duration_taken: u64) -> Result<SubmissionPayload, SessionError> {
        let questions = ledger
            .entries()
            .iter()
            .map(|entry| -> Result<SubmittedQuestion, SessionError> {
                let answers = match &entry.selected_answer {
                    Some(selected) => vec![SubmittedAnswer::selected(selected)],
                    None => self
                        .exam
                        .find_question(&entry.question_id)
                        .ok_or_else(|| SessionError::QuestionMissing {
                            question_id: entry.question_id.clone(),
                        })?
                        .answers
                        .iter()
                        .map(SubmittedAnswer::not_selected)
                        .collect(),
                };

                Ok(SubmittedQuestion {
                    id: entry.question_id.clone(),
                    text: entry.question_text.clone(),
                    answers,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SubmissionPayload {
            email_id: self.candidate_email.to_string(),
            exam_id: self.exam_id.to_string(),
            title: self.exam.title.clone(),
            duration: self.exam.duration,
            duration_taken,
            questions,
        })
    }
}
