//! 考试会话编排器
//!
//! ## 职责
//!
//! 持有一次作答的全部可变状态（考试、答题记录、翻题游标、倒计时），
//! 并对外暴露作答操作：选择答案、上一题/下一题/跳过、跳转、翻页、交卷。
//!
//! ## 阶段
//!
//! `Loading → Active → Finishing → Terminated`，阶段变化只经过 [`ExamSession::transition`]。
//!
//! ## 交卷入口
//!
//! 倒计时到点（[`SessionSignal::TimeExpired`]）和考生手动交卷都汇入 [`ExamSession::finish`]，
//! 先到者生效，后到者被忽略，网关最多收到一次交卷。

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::clients::ExamGateway;
use crate::error::{AppResult, SessionError};
use crate::models::{Exam, SubmissionPayload};
use crate::session::{
    duration_taken, AnswerLedger, FinishTrigger, Navigator, PageDirection, PageLayout,
    SessionClock, SessionEvent, SessionPhase, SubmissionAssembler,
};
use crate::utils::logging;

/// 考生身份信息，每次操作时只读使用
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub access_token: String,
    pub email: String,
}

/// 会话外部产生的信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// 倒计时结束
    TimeExpired,
}

/// 交卷结果
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// 网关已确认，会话结束
    Submitted(SubmissionPayload),
    /// 已经在交卷或已交卷，本次请求被忽略
    Ignored,
}

/// 当前题目的展示数据（不包含正确答案）
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub index: usize,
    pub number: usize,
    pub text: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionView {
    pub id: String,
    pub text: String,
    pub selected: bool,
}

/// 状态面板中的一格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCell {
    pub index: usize,
    pub number: usize,
    pub answered: bool,
    pub current: bool,
}

/// 考试会话
pub struct ExamSession<G: ExamGateway> {
    gateway: G,
    exam_id: String,
    layout: PageLayout,
    phase: SessionPhase,
    exam: Option<Exam>,
    ledger: AnswerLedger,
    navigator: Option<Navigator>,
    clock: Option<SessionClock>,
    started_at: Option<Instant>,
    submitted_at: Option<Instant>,
    pending: Option<SubmissionPayload>,
    signals: UnboundedSender<SessionSignal>,
}

impl<G: ExamGateway> ExamSession<G> {
    /// 创建会话
    ///
    /// # 参数
    /// - `gateway`: 考试数据网关
    /// - `exam_id`: 考试ID
    /// - `layout`: 状态面板布局
    /// - `signals`: 倒计时到点时向其发送 [`SessionSignal::TimeExpired`]
    ///
    /// # 返回
    /// 布局不合法（每页题数或列数为 0）时返回配置错误
    pub fn new(
        gateway: G,
        exam_id: impl Into<String>,
        layout: PageLayout,
        signals: UnboundedSender<SessionSignal>,
    ) -> AppResult<Self> {
        layout.validate()?;
        Ok(Self {
            gateway,
            exam_id: exam_id.into(),
            layout,
            phase: SessionPhase::Loading,
            exam: None,
            ledger: AnswerLedger::default(),
            navigator: None,
            clock: None,
            started_at: None,
            submitted_at: None,
            pending: None,
            signals,
        })
    }

    fn transition(&mut self, event: SessionEvent) -> Result<SessionPhase, SessionError> {
        let next = self.phase.transition(event)?;
        if next != self.phase {
            debug!("会话阶段: {:?} -> {:?} ({:?})", self.phase, next, event);
        }
        self.phase = next;
        Ok(next)
    }

    // ========== 加载 ==========

    /// 拉取考试并进入作答阶段
    ///
    /// 开始时间在此刻记录，倒计时从这里起算。失败时会话停留在 `Loading`。
    pub async fn load(&mut self, auth: &AuthContext) -> AppResult<()> {
        if self.phase != SessionPhase::Loading {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                event: SessionEvent::ExamLoaded,
            }
            .into());
        }

        info!("📥 正在加载考试 {} ...", self.exam_id);

        let exam = match self.gateway.fetch_exam(&self.exam_id, &auth.access_token).await {
            Ok(exam) => exam,
            Err(e) => {
                self.transition(SessionEvent::LoadFailed)?;
                error!("❌ 加载考试 {} 失败: {}", self.exam_id, e);
                return Err(e);
            }
        };

        if exam.questions.is_empty() {
            self.transition(SessionEvent::LoadFailed)?;
            error!("❌ 考试 {} 没有任何题目", self.exam_id);
            return Err(SessionError::UnusableExam {
                reason: "考试没有题目".to_string(),
            }
            .into());
        }

        self.ledger.initialize(&exam.questions);
        self.navigator = Some(Navigator::new(exam.question_count(), self.layout));

        let start = Instant::now();
        let deadline = SessionClock::deadline_for(start, exam.duration);
        let signals = self.signals.clone();
        self.clock = Some(SessionClock::start(deadline, move || {
            // 接收端已关闭说明会话已被丢弃
            let _ = signals.send(SessionSignal::TimeExpired);
        }));
        self.started_at = Some(start);

        logging::log_session_start(&exam.title, exam.question_count(), exam.duration);
        self.exam = Some(exam);
        self.transition(SessionEvent::ExamLoaded)?;
        Ok(())
    }

    // ========== 作答 ==========

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.phase.is_active() {
            Ok(())
        } else {
            Err(SessionError::NotActive { phase: self.phase })
        }
    }

    fn navigator_mut(&mut self) -> Result<&mut Navigator, SessionError> {
        self.ensure_active()?;
        self.navigator
            .as_mut()
            .ok_or(SessionError::NotActive { phase: self.phase })
    }

    /// 为某题选择答案，选项总是从该题自己的选项中解析
    ///
    /// # 参数
    /// - `question_index`: 题目索引（从 0 开始）
    /// - `option_index`: 选项索引（从 0 开始）
    pub fn select_answer(&mut self, question_index: usize, option_index: usize) -> AppResult<()> {
        self.ensure_active()?;
        let exam = self
            .exam
            .as_ref()
            .ok_or(SessionError::NotActive { phase: self.phase })?;

        let question = exam
            .questions
            .get(question_index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question_index,
                total: exam.question_count(),
            })?;
        let option = question
            .answers
            .get(option_index)
            .ok_or(SessionError::OptionOutOfRange {
                index: option_index,
                total: question.answers.len(),
            })?
            .clone();

        debug!("第 {} 题选择: {}", question_index + 1, option.id);
        self.ledger.select(question_index, option)?;
        Ok(())
    }

    /// 为当前显示的题目选择答案
    pub fn select_current(&mut self, option_index: usize) -> AppResult<()> {
        self.ensure_active()?;
        let current = self.current_index().unwrap_or_default();
        self.select_answer(current, option_index)
    }

    /// 下一题，当前题未作答时拒绝
    pub fn next(&mut self) -> AppResult<usize> {
        self.ensure_active()?;
        let current = self.current_index().unwrap_or_default();
        let answered = self.ledger.is_answered(current);
        Ok(self.navigator_mut()?.next(answered)?)
    }

    /// 上一题
    pub fn previous(&mut self) -> AppResult<usize> {
        Ok(self.navigator_mut()?.previous())
    }

    /// 跳过当前题
    pub fn skip(&mut self) -> AppResult<usize> {
        Ok(self.navigator_mut()?.skip())
    }

    /// 跳转到某题
    pub fn jump_to(&mut self, question_index: usize) -> AppResult<usize> {
        Ok(self.navigator_mut()?.jump_to(question_index)?)
    }

    /// 状态面板翻页
    pub fn change_page(&mut self, direction: PageDirection) -> AppResult<usize> {
        Ok(self.navigator_mut()?.change_page(direction))
    }

    // ========== 交卷 ==========

    /// 处理外部信号
    pub async fn on_signal(&mut self, signal: SessionSignal, auth: &AuthContext) -> AppResult<FinishOutcome> {
        match signal {
            SessionSignal::TimeExpired => {
                warn!("⏰ 时间到，自动交卷");
                self.finish(FinishTrigger::Timeout, auth).await
            }
        }
    }

    /// 交卷（手动或超时）
    ///
    /// 已在交卷或已结束时直接返回 [`FinishOutcome::Ignored`]。
    /// 网关拒绝时会话停留在 `Finishing`，答题记录保留，可调用 [`ExamSession::resubmit`]。
    pub async fn finish(&mut self, trigger: FinishTrigger, auth: &AuthContext) -> AppResult<FinishOutcome> {
        if self.phase.is_finishing_or_done() {
            debug!("已在交卷 ({:?})，忽略 {:?}", self.phase, trigger);
            return Ok(FinishOutcome::Ignored);
        }
        self.ensure_active()?;

        let now = Instant::now();
        let payload = self.assemble(trigger, now, &auth.email)?;

        self.transition(SessionEvent::FinishRequested(trigger))?;
        self.submitted_at = Some(now);
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }

        logging::log_finish(trigger, &payload);
        self.pending = Some(payload);
        self.deliver(auth).await
    }

    /// 提交失败后重新提交同一份答卷
    pub async fn resubmit(&mut self, auth: &AuthContext) -> AppResult<FinishOutcome> {
        self.transition(SessionEvent::ResubmitRequested)?;
        info!("🔁 重新提交答卷");
        self.deliver(auth).await
    }

    fn assemble(&self, trigger: FinishTrigger, now: Instant, email: &str) -> AppResult<SubmissionPayload> {
        let exam = self
            .exam
            .as_ref()
            .ok_or(SessionError::NotActive { phase: self.phase })?;
        let elapsed = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        let taken = duration_taken(trigger, elapsed, exam.duration);

        Ok(SubmissionAssembler::new(exam, &self.exam_id, email).assemble(&self.ledger, taken)?)
    }

    async fn deliver(&mut self, auth: &AuthContext) -> AppResult<FinishOutcome> {
        let payload = self.pending.clone().ok_or(SessionError::NothingToResubmit)?;

        let result = self
            .gateway
            .submit_attempt(&self.exam_id, &payload, &auth.access_token)
            .await;

        match result {
            Ok(()) => {
                self.transition(SessionEvent::SubmitAccepted)?;
                info!("✅ 答卷提交成功，返回考生主页");
                self.teardown();
                Ok(FinishOutcome::Submitted(payload))
            }
            Err(e) => {
                self.transition(SessionEvent::SubmitRejected)?;
                error!("❌ 答卷提交失败: {}", e);
                Err(e)
            }
        }
    }

    fn teardown(&mut self) {
        self.clock = None;
        self.navigator = None;
        self.exam = None;
        self.ledger = AnswerLedger::default();
        self.pending = None;
    }

    // ========== 展示 ==========

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn exam_title(&self) -> Option<&str> {
        self.exam.as_ref().map(|e| e.title.as_str())
    }

    pub fn question_count(&self) -> usize {
        self.ledger.question_count()
    }

    /// 已作答题数
    pub fn answered_count(&self) -> usize {
        self.ledger.count_answered()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.navigator.as_ref().map(Navigator::current_question)
    }

    pub fn current_page(&self) -> Option<usize> {
        self.navigator.as_ref().map(Navigator::current_page)
    }

    /// 剩余时间
    pub fn time_left(&self) -> Option<std::time::Duration> {
        self.clock.as_ref().map(SessionClock::remaining)
    }

    /// 交卷时刻
    pub fn submitted_at(&self) -> Option<Instant> {
        self.submitted_at
    }

    /// 提交失败后保留的答卷
    pub fn pending_submission(&self) -> Option<&SubmissionPayload> {
        self.pending.as_ref()
    }

    /// 当前题目的展示数据
    pub fn current_question(&self) -> Option<QuestionView> {
        let exam = self.exam.as_ref()?;
        let index = self.current_index()?;
        let question = exam.questions.get(index)?;
        let selected_id = self.ledger.selected(index).map(|o| o.id.as_str());

        Some(QuestionView {
            index,
            number: index + 1,
            text: question.text.clone(),
            options: question
                .answers
                .iter()
                .map(|a| OptionView {
                    id: a.id.clone(),
                    text: a.text.clone(),
                    selected: Some(a.id.as_str()) == selected_id,
                })
                .collect(),
        })
    }

    /// 当前页的题目状态面板，按列数分行
    pub fn status_grid(&self) -> Vec<Vec<StatusCell>> {
        let Some(navigator) = self.navigator.as_ref() else {
            return Vec::new();
        };
        let current = navigator.current_question();

        let cells: Vec<StatusCell> = navigator
            .page_range()
            .map(|index| StatusCell {
                index,
                number: index + 1,
                answered: self.ledger.is_answered(index),
                current: index == current,
            })
            .collect();

        cells
            .chunks(self.layout.grid_columns.max(1))
            .map(<[StatusCell]>::to_vec)
            .collect()
    }
}
