//! 会话阶段状态机
//!
//! `Loading → Active → Finishing → Terminated`，所有阶段变化都必须经过
//! [`SessionPhase::transition`]，编排层不得直接改写阶段。

use crate::error::SessionError;

/// 交卷触发方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishTrigger {
    /// 考生点击交卷
    Manual,
    /// 倒计时结束自动交卷
    Timeout,
}

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// 正在拉取考试
    Loading,
    /// 作答中，唯一接受选择答案和翻题的阶段
    Active,
    /// 已触发交卷，等待网关确认
    Finishing,
    /// 已交卷，会话结束
    Terminated,
}

/// 驱动阶段变化的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 考试加载成功、答题记录已初始化
    ExamLoaded,
    /// 考试加载失败
    LoadFailed,
    /// 触发交卷（手动或超时）
    FinishRequested(FinishTrigger),
    /// 网关确认收到答卷
    SubmitAccepted,
    /// 网关拒绝答卷
    SubmitRejected,
    /// 提交失败后考生手动重新提交
    ResubmitRequested,
}

impl SessionPhase {
    /// 唯一的状态迁移函数
    ///
    /// 非法组合返回 [`SessionError::InvalidTransition`]，调用方据此决定忽略还是上报。
    /// 对 `Finishing` 再次请求交卷同样是非法迁移，这保证了交卷最多发生一次。
    pub fn transition(self, event: SessionEvent) -> Result<SessionPhase, SessionError> {
        use SessionEvent::*;
        use SessionPhase::*;

        match (self, event) {
            (Loading, ExamLoaded) => Ok(Active),
            (Loading, LoadFailed) => Ok(Loading),
            (Active, FinishRequested(_)) => Ok(Finishing),
            (Finishing, SubmitAccepted) => Ok(Terminated),
            (Finishing, SubmitRejected) => Ok(Finishing),
            (Finishing, ResubmitRequested) => Ok(Finishing),
            (from, event) => Err(SessionError::InvalidTransition { from, event }),
        }
    }

    /// 是否处于作答阶段
    pub fn is_active(self) -> bool {
        self == SessionPhase::Active
    }

    /// 是否已经开始或完成交卷
    pub fn is_finishing_or_done(self) -> bool {
        matches!(self, SessionPhase::Finishing | SessionPhase::Terminated)
    }
}
