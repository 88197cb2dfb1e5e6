/// 考试服务 HTTP 客户端
///
/// 封装所有与考试服务 REST 接口相关的调用
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::clients::ExamGateway;
use crate::config::Config;
use crate::error::{AppResult, GatewayError};
use crate::models::{Exam, SubmissionPayload};

/// 考试服务客户端
pub struct ExamClient {
    http: Client,
    base_url: String,
}

impl ExamClient {
    /// 创建新的考试服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} -> {}", endpoint, status);

        if !status.is_success() {
            return Err(GatewayError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let response = self.send(endpoint, request).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ExamGateway for ExamClient {
    async fn fetch_exam(&self, exam_id: &str, access_token: &str) -> AppResult<Exam> {
        let endpoint = format!("get-exam-by-id/{}", exam_id);
        let request = self.http.get(self.url(&endpoint)).bearer_auth(access_token);
        self.send_json(&endpoint, request).await
    }

    async fn submit_attempt(
        &self,
        exam_id: &str,
        payload: &SubmissionPayload,
        access_token: &str,
    ) -> AppResult<()> {
        let endpoint = format!("submit-answer/{}", exam_id);

        debug!(
            "提交答卷 Payload: {}",
            serde_json::to_string(payload).unwrap_or_default()
        );

        let request = self
            .http
            .post(self.url(&endpoint))
            .bearer_auth(access_token)
            .json(payload);
        // 响应体只作为确认，不解析内容
        self.send(&endpoint, request).await?;
        Ok(())
    }
}
