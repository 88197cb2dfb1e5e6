use thiserror::Error;

use crate::session::state::{SessionEvent, SessionPhase};

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 考试数据网关错误
    #[error("网关错误: {0}")]
    Gateway(#[from] GatewayError),
    /// 考试会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 终端输入输出错误
    #[error("输入输出错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 考试数据网关错误
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回非成功状态码
    #[error("服务端返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应或文件内容解析失败
    #[error("数据解析失败: {source}")]
    DecodeFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 考试定义文件不存在
    #[error("考试文件不存在: {path}")]
    ExamFileNotFound { path: String },
    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 考试会话错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 非法的阶段迁移
    #[error("非法的状态迁移: {from:?} 不接受 {event:?}")]
    InvalidTransition {
        from: SessionPhase,
        event: SessionEvent,
    },
    /// 会话不在作答阶段
    #[error("会话当前不可作答 (阶段: {phase:?})")]
    NotActive { phase: SessionPhase },
    /// 当前题目尚未作答，不能进入下一题
    #[error("请先选择第 {number} 题的答案再进入下一题")]
    AnswerRequired { number: usize },
    /// 题目索引超出范围
    #[error("题目索引 {index} 超出范围 (共 {total} 题)")]
    QuestionOutOfRange { index: usize, total: usize },
    /// 选项索引超出范围
    #[error("选项索引 {index} 超出范围 (共 {total} 个选项)")]
    OptionOutOfRange { index: usize, total: usize },
    /// 考试数据不可用
    #[error("考试数据不可用: {reason}")]
    UnusableExam { reason: String },
    /// 组装提交数据时找不到原题
    #[error("考试中找不到题目: {question_id}")]
    QuestionMissing { question_id: String },
    /// 没有待重新提交的数据
    #[error("没有可重新提交的答卷")]
    NothingToResubmit,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("解析配置文件失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 的值不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|url| url.to_string())
            .unwrap_or_default();
        if let Some(status) = err.status() {
            return AppError::Gateway(GatewayError::BadStatus {
                endpoint,
                status: status.as_u16(),
            });
        }
        if err.is_decode() {
            return AppError::Gateway(GatewayError::DecodeFailed {
                source: Box::new(err),
            });
        }
        AppError::Gateway(GatewayError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Gateway(GatewayError::DecodeFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读写错误
    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Gateway(GatewayError::FileIo {
            path: path.into(),
            source,
        })
    }

    /// 创建配置值不合法错误
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// 是否是"请先作答"这类可直接提示给考生的错误
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Session(
                SessionError::AnswerRequired { .. }
                    | SessionError::QuestionOutOfRange { .. }
                    | SessionError::OptionOutOfRange { .. }
                    | SessionError::NotActive { .. }
            )
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
