use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};
use crate::session::PageLayout;

/// 网关类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// 通过 HTTP 访问考试服务
    Http,
    /// 从本地文件夹读取考试、把答卷写入本地文件夹
    File,
}

impl GatewayKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "http" => Some(GatewayKind::Http),
            "file" => Some(GatewayKind::File),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 考试服务地址（以 `/` 结尾）
    pub api_base_url: String,
    /// 登录后获得的访问令牌
    pub access_token: String,
    /// 考生邮箱
    pub candidate_email: String,
    /// 要参加的考试ID
    pub exam_id: String,
    /// 网关类型
    pub gateway: GatewayKind,
    /// 离线模式下考试定义所在目录
    pub exam_folder: String,
    /// 离线模式下答卷输出目录
    pub submission_folder: String,
    /// 题目状态面板每页题数
    pub questions_per_page: usize,
    /// 题目状态面板每行列数
    pub grid_columns: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/exam-service/".to_string(),
            access_token: String::new(),
            candidate_email: String::new(),
            exam_id: String::new(),
            gateway: GatewayKind::Http,
            exam_folder: "exams".to_string(),
            submission_folder: "submissions".to_string(),
            questions_per_page: 30,
            grid_columns: 6,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，缺省值取 `Default`
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，文件中缺失的字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn from_toml_str(content: &str, origin: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: origin.to_string(),
            source,
        })?;
        Ok(config)
    }

    /// 加载配置：若设置了 `EXAM_CONFIG` 则先读文件，再用环境变量覆盖，最后校验
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("EXAM_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("EXAM_API_BASE_URL").unwrap_or(self.api_base_url),
            access_token: std::env::var("EXAM_ACCESS_TOKEN").unwrap_or(self.access_token),
            candidate_email: std::env::var("CANDIDATE_EMAIL").unwrap_or(self.candidate_email),
            exam_id: std::env::var("EXAM_ID").unwrap_or(self.exam_id),
            gateway: std::env::var("EXAM_GATEWAY").ok().and_then(|v| GatewayKind::parse(&v)).unwrap_or(self.gateway),
            exam_folder: std::env::var("EXAM_FOLDER").unwrap_or(self.exam_folder),
            submission_folder: std::env::var("SUBMISSION_FOLDER").unwrap_or(self.submission_folder),
            questions_per_page: std::env::var("QUESTIONS_PER_PAGE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.questions_per_page),
            grid_columns: std::env::var("GRID_COLUMNS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.grid_columns),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 状态面板布局
    pub fn page_layout(&self) -> PageLayout {
        PageLayout {
            questions_per_page: self.questions_per_page,
            grid_columns: self.grid_columns,
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        self.page_layout().validate()?;
        if self.gateway == GatewayKind::Http && !self.api_base_url.ends_with('/') {
            return Err(AppError::invalid_config("api_base_url", "必须以 / 结尾"));
        }
        Ok(())
    }
}
