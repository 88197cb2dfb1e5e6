//! 考试会话核心组件
//!
//! - `clock` - 倒计时，到点只触发一次
//! - `ledger` - 每道题的当前选择
//! - `navigator` - 翻题游标与状态面板分页
//! - `assembler` - 交卷时组装答卷
//! - `state` - 会话阶段状态机
//!
//! 这些组件互不依赖，由 `orchestrator::ExamSession` 组合。

pub mod assembler;
pub mod clock;
pub mod ledger;
pub mod navigator;
pub mod state;

pub use assembler::{duration_taken, SubmissionAssembler};
pub use clock::{format_remaining, SessionClock};
pub use ledger::{AnswerLedger, LedgerEntry};
pub use navigator::{Navigator, PageDirection, PageLayout};
pub use state::{FinishTrigger, SessionEvent, SessionPhase};
