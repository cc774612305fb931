use crate::upload::auth::{create_token, AuthStrategy, ErrorBody};
use crate::upload::error::{ConfigError, ExecuteError};
use crate::upload::report::{BatchReport, UploadError};
use crate::upload::scan::collect;
use crate::upload::transport::{PostBody, Transport};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// 命令行传入的原始参数
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub path: PathBuf,
    pub upload_url: String,
    pub environment: Option<String>,
    pub key: Option<String>,
    pub token_url: Option<String>,
    pub output: Option<PathBuf>,
    pub max_size: Option<u64>,
    pub show_progress: bool,
}

/// 校验过的上传请求，构造后不可变
#[derive(Debug, Clone)]
pub struct UploadRequest {
    path: PathBuf,
    upload_url: String,
    auth: AuthStrategy,
    output: Option<PathBuf>,
    max_size: Option<u64>,
    show_progress: bool,
}

impl UploadRequest {
    /// 在任何网络请求之前完成全部配置校验
    pub fn new(options: UploadOptions) -> Result<Self, ConfigError> {
        if !options.path.exists() {
            return Err(ConfigError::PathNotFound(options.path));
        }

        validate_url("upload", &options.upload_url)?;

        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let environment = non_empty(options.environment);
        let key = non_empty(options.key);
        let token_url = non_empty(options.token_url);

        let auth = match (key, environment, token_url) {
            (Some(access_key), Some(environment_id), _) => AuthStrategy::BySecret {
                environment_id,
                access_key,
            },
            (_, _, Some(token_url)) => {
                validate_url("token", &token_url)?;
                AuthStrategy::ByTokenUrl { token_url }
            }
            (Some(_), None, None) => return Err(ConfigError::MissingEnvironment),
            (None, _, None) => return Err(ConfigError::MissingAuth),
        };

        Ok(Self {
            path: options.path,
            upload_url: options.upload_url,
            auth,
            output: options.output,
            max_size: options.max_size,
            show_progress: options.show_progress,
        })
    }

    #[cfg(test)]
    pub fn auth(&self) -> &AuthStrategy {
        &self.auth
    }
}

fn validate_url(name: &'static str, url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        url: url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme \"{other}\""))),
    }
}

/// 执行完整流程：认证 -> 扫描 -> 逐个上传 -> 汇总（可选写入 output）
pub async fn execute<T: Transport>(
    request: &UploadRequest,
    transport: &T,
) -> Result<BatchReport, ExecuteError> {
    let token = create_token(&request.auth, transport).await?;
    tracing::info!("token acquired");

    let scan = collect(&request.path, request.max_size);

    let pb = if request.show_progress {
        ProgressBar::new(scan.candidates.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.green/white}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }

    let outcomes = upload_all(transport, &request.upload_url, &token, &scan.candidates, &pb).await;
    pb.finish_and_clear();

    let mut report = BatchReport {
        errors: scan.rejected,
        ..BatchReport::default()
    };
    for (path, outcome) in outcomes {
        match outcome {
            Ok(body) => {
                report.result.insert(path.display().to_string(), body);
            }
            Err(message) => report.errors.push(UploadError::new(path, message)),
        }
    }

    if let Some(output) = &request.output {
        report
            .save_result(output)
            .map_err(|source| ExecuteError::WriteOutput {
                path: output.clone(),
                source,
            })?;
        tracing::info!(path = %output.display(), "result saved");
    }

    Ok(report)
}

/// 依次上传，每个文件得到独立的结果；单个失败不影响后续文件
pub async fn upload_all<T: Transport>(
    transport: &T,
    upload_url: &str,
    token: &str,
    files: &[PathBuf],
    pb: &ProgressBar,
) -> Vec<(PathBuf, Result<Value, String>)> {
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        pb.set_message(file.display().to_string());

        let outcome = upload_one(transport, upload_url, token, file).await;
        if let Err(message) = &outcome {
            tracing::warn!(path = %file.display(), error = %message, "upload failed");
        }
        outcomes.push((file.clone(), outcome));

        pb.inc(1);
    }

    outcomes
}

async fn upload_one<T: Transport>(
    transport: &T,
    upload_url: &str,
    token: &str,
    file: &Path,
) -> Result<Value, String> {
    let response = transport
        .post(upload_url, PostBody::File(file), Some(token))
        .await
        .map_err(|e| e.to_string())?;

    if response.status >= 400 {
        let message = serde_json::from_slice::<ErrorBody>(&response.body)
            .map(|e| e.message)
            .map_err(|e| format!("upload failed with status {}: {}", response.status, e))?;
        return Err(message);
    }

    serde_json::from_slice(&response.body).map_err(|e| format!("invalid response: {e}"))
}
