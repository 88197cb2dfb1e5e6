//! 考试数据网关
//!
//! 会话只通过 [`ExamGateway`] 拉取考试和提交答卷，传输细节留在实现里：
//! - `ExamClient` - 通过 HTTP 访问考试服务
//! - `FileGateway` - 离线模式，读写本地文件

pub mod exam_client;
pub mod file_gateway;

use async_trait::async_trait;

use crate::config::{Config, GatewayKind};
use crate::error::AppResult;
use crate::models::{Exam, SubmissionPayload};

pub use exam_client::ExamClient;
pub use file_gateway::FileGateway;

/// 考试数据网关
#[async_trait]
pub trait ExamGateway: Send + Sync {
    /// 按ID拉取考试定义
    async fn fetch_exam(&self, exam_id: &str, access_token: &str) -> AppResult<Exam>;

    /// 提交一次作答
    async fn submit_attempt(
        &self,
        exam_id: &str,
        payload: &SubmissionPayload,
        access_token: &str,
    ) -> AppResult<()>;
}

#[async_trait]
impl<G: ExamGateway + ?Sized> ExamGateway for Box<G> {
    async fn fetch_exam(&self, exam_id: &str, access_token: &str) -> AppResult<Exam> {
        (**self).fetch_exam(exam_id, access_token).await
    }

    async fn submit_attempt(
        &self,
        exam_id: &str,
        payload: &SubmissionPayload,
        access_token: &str,
    ) -> AppResult<()> {
        (**self).submit_attempt(exam_id, payload, access_token).await
    }
}

/// 按配置创建网关
pub fn build_gateway(config: &Config) -> AppResult<Box<dyn ExamGateway>> {
    let gateway: Box<dyn ExamGateway> = match config.gateway {
        GatewayKind::Http => Box::new(ExamClient::new(config)?),
        GatewayKind::File => Box::new(FileGateway::new(config)),
    };
    Ok(gateway)
}
