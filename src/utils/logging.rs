/// 日志工具模块
///
/// 提供日志初始化和会话关键节点的输出
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::SubmissionPayload;
use crate::session::FinishTrigger;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，开启详细日志时为 `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `exam_id`: 考试ID
/// - `email`: 考生邮箱
pub fn log_startup(exam_id: &str, email: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 在线考试");
    info!("📝 考试ID: {}", exam_id);
    info!("👤 考生: {}", email);
    info!("{}", "=".repeat(60));
}

/// 记录考试开始
///
/// # 参数
/// - `title`: 考试标题
/// - `question_count`: 题目数
/// - `duration_minutes`: 考试时长（分钟）
pub fn log_session_start(title: &str, question_count: usize, duration_minutes: u32) {
    info!("\n{}", "=".repeat(60));
    info!("📋 {}", truncate_text(title, 40));
    info!(
        "开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("共 {} 题，限时 {} 分钟", question_count, duration_minutes);
    info!("{}", "=".repeat(60));
}

/// 记录交卷
pub fn log_finish(trigger: FinishTrigger, payload: &SubmissionPayload) {
    let how = match trigger {
        FinishTrigger::Manual => "手动交卷",
        FinishTrigger::Timeout => "超时自动交卷",
    };
    info!("\n{}", "─".repeat(60));
    info!("📤 {}: {}", how, truncate_text(&payload.title, 40));
    info!(
        "已答 {}/{} 题，用时 {}",
        payload.answered_count(),
        payload.questions.len(),
        format_duration(payload.duration_taken)
    );
    info!("{}", "─".repeat(60));
}

/// 把秒数格式化为 `X 分 Y 秒`
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remaining = seconds % 60;
    if minutes > 0 {
        format!("{} 分 {} 秒", minutes, remaining)
    } else {
        format!("{} 秒", remaining)
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
