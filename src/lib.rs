//! # Exam Session
//!
//! 在线考试的限时作答会话：加载考试、逐题作答、倒计时到点自动交卷、组装并提交答卷。
//!
//! ## 架构设计
//!
//! ### ① 网关层（Clients）
//! - `clients/` - `ExamGateway` 抽象拉取考试与提交答卷
//! - `ExamClient` - 通过 HTTP 访问考试服务
//! - `FileGateway` - 离线模式，读写本地文件
//!
//! ### ② 数据层（Models）
//! - `models/` - 考试定义与答卷的数据结构，以及本地考试文件加载
//!
//! ### ③ 会话组件（Session）
//! - `SessionClock` - 倒计时，到点只触发一次
//! - `AnswerLedger` - 每道题的当前选择
//! - `Navigator` - 翻题游标与状态面板分页
//! - `SubmissionAssembler` - 交卷时组装答卷
//! - `SessionPhase` - 会话阶段状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/exam_session` - 组合以上组件的考试会话
//! - `orchestrator/app` - 终端考试应用
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod utils;

// 重新导出常用类型
pub use clients::{ExamClient, ExamGateway, FileGateway};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnswerOption, Exam, Question, SubmissionPayload};
pub use orchestrator::{App, AuthContext, ExamSession, FinishOutcome, SessionSignal};
pub use session::{FinishTrigger, PageDirection, PageLayout, SessionPhase};
