//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `exam_session` - 考试会话编排器
//! - 持有一次作答的全部状态（考试、答题记录、翻题游标、倒计时）
//! - 阶段机 `Loading → Active → Finishing → Terminated`
//! - 手动交卷与超时交卷汇入同一个入口，最多交卷一次
//!
//! ### `app` - 终端应用
//! - 初始化网关与考生身份
//! - 事件循环：终端输入 + 倒计时信号
//! - 展示题目、进度和状态面板
//!
//! ### `command` - 终端命令解析
//!
//! ## 层次关系
//!
//! ```text
//! app (终端事件循环)
//!     ↓
//! exam_session (会话状态与阶段机)
//!     ↓
//! session (clock / ledger / navigator / assembler)
//!     ↓
//! clients (ExamGateway: HTTP / 本地文件)
//! ```

pub mod app;
pub mod command;
pub mod exam_session;

// 重新导出主要类型
pub use app::App;
pub use command::Command;
pub use exam_session::{
    AuthContext, ExamSession, FinishOutcome, OptionView, QuestionView, SessionSignal, StatusCell,
};
