use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{AppError, AppResult, GatewayError};
use crate::models::exam::Exam;

/// 支持的考试定义文件扩展名，按优先级排列
const EXAM_FILE_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// 把考试ID、邮箱等外部输入转成单层文件名
///
/// 只保留字母数字和 `.`、`-`、`_`、`@`，其余字符（包括路径分隔符）替换为 `_`。
pub fn safe_file_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '@') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 在目录中查找考试定义文件：`<folder>/<exam_id>.toml` 或 `<folder>/<exam_id>.json`
pub async fn resolve_exam_path(folder_path: &str, exam_id: &str) -> AppResult<PathBuf> {
    let folder = PathBuf::from(folder_path);
    let exam_id = safe_file_stem(exam_id);

    for ext in EXAM_FILE_EXTENSIONS {
        let candidate = folder.join(format!("{}.{}", exam_id, ext));
        if fs::try_exists(&candidate).await.unwrap_or(false) {
            return Ok(candidate);
        }
    }

    Err(GatewayError::ExamFileNotFound {
        path: folder.join(format!("{}.{{toml,json}}", exam_id)).display().to_string(),
    }
    .into())
}

/// 从 TOML 或 JSON 文件加载考试定义
pub async fn load_exam_file(path: &Path) -> AppResult<Exam> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_io(path.display().to_string(), e))?;

    let exam: Exam = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| GatewayError::DecodeFailed {
            source: Box::new(e),
        })?,
        _ => serde_json::from_str(&content)?,
    };

    tracing::debug!(
        "已加载考试文件 {}: {} 道题",
        path.file_name().unwrap_or_default().to_string_lossy(),
        exam.question_count()
    );

    Ok(exam)
}
