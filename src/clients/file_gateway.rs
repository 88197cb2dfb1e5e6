//! 离线网关
//!
//! 从本地目录读取考试定义，把答卷以 JSON 写到输出目录，便于没有考试服务时演练。

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use crate::clients::ExamGateway;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{load_exam_file, resolve_exam_path, safe_file_stem, Exam, SubmissionPayload};

/// 离线网关
pub struct FileGateway {
    exam_folder: String,
    submission_folder: String,
}

impl FileGateway {
    pub fn new(config: &Config) -> Self {
        Self::with_folders(&config.exam_folder, &config.submission_folder)
    }

    /// 使用自定义目录创建
    pub fn with_folders(exam_folder: impl Into<String>, submission_folder: impl Into<String>) -> Self {
        Self {
            exam_folder: exam_folder.into(),
            submission_folder: submission_folder.into(),
        }
    }

    /// 答卷输出路径：`<submission_folder>/<exam_id>-<email>.json`
    pub fn submission_path(&self, exam_id: &str, email: &str) -> PathBuf {
        PathBuf::from(&self.submission_folder).join(format!(
            "{}-{}.json",
            safe_file_stem(exam_id),
            safe_file_stem(email)
        ))
    }
}

#[async_trait]
impl ExamGateway for FileGateway {
    async fn fetch_exam(&self, exam_id: &str, _access_token: &str) -> AppResult<Exam> {
        let path = resolve_exam_path(&self.exam_folder, exam_id).await?;
        load_exam_file(&path).await
    }

    async fn submit_attempt(
        &self,
        exam_id: &str,
        payload: &SubmissionPayload,
        _access_token: &str,
    ) -> AppResult<()> {
        fs::create_dir_all(&self.submission_folder)
            .await
            .map_err(|e| AppError::file_io(self.submission_folder.clone(), e))?;

        let path = self.submission_path(exam_id, &payload.email_id);
        let json = serde_json::to_string_pretty(payload)?;
        fs::write(&path, json)
            .await
            .map_err(|e| AppError::file_io(path.display().to_string(), e))?;

        info!("答卷已写入: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("file_gateway_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_fetch_then_submit_roundtrip_on_disk() {
        let dir = scratch_dir("roundtrip");
        let exams = dir.join("exams");
        let out = dir.join("out");
        std::fs::create_dir_all(&exams).unwrap();
        std::fs::write(
            exams.join("3.json"),
            r#"{"id": 3, "title": "离线", "duration": 1, "questions": [
                {"id": 1, "text": "?", "answers": [{"id": 1, "text": "A", "correct": true}]}
            ]}"#,
        )
        .unwrap();

        let gateway = FileGateway::with_folders(
            exams.to_string_lossy().to_string(),
            out.to_string_lossy().to_string(),
        );
        let exam = gateway.fetch_exam("3", "").await.unwrap();
        assert_eq!(exam.title, "离线");

        let payload = SubmissionPayload {
            email_id: "dana@example.com".to_string(),
            exam_id: "3".to_string(),
            title: exam.title.clone(),
            duration: exam.duration,
            duration_taken: 12,
            questions: Vec::new(),
        };
        gateway.submit_attempt("3", &payload, "").await.unwrap();

        let written = std::fs::read_to_string(gateway.submission_path("3", "dana@example.com")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["durationTaken"], 12);
    }

    #[test]
    fn test_submission_path_sanitizes_email() {
        let gateway = FileGateway::with_folders("e", "s");
        assert_eq!(
            gateway.submission_path("1", "a b/c@x.io"),
            PathBuf::from("s").join("1-a_b_c@x.io.json")
        );
    }

    #[test]
    fn test_submission_path_stays_in_folder() {
        let gateway = FileGateway::with_folders("e", "s");
        let path = gateway.submission_path("../../etc/x", "a@b.c");
        assert_eq!(path.parent(), Some(PathBuf::from("s").as_path()));
        assert_eq!(path, PathBuf::from("s").join(".._.._etc_x-a@b.c.json"));
    }
}
