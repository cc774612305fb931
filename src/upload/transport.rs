use crate::upload::error::TransportError;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::path::Path;
use tokio_util::io::ReaderStream;

/// 原始响应：状态码 + 完整响应体（不解析状态码，由调用方判断）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// POST 请求体：文件（multipart 字段 `file`）或 JSON，二者互斥
#[derive(Debug, Clone, Copy)]
pub enum PostBody<'a> {
    File(&'a Path),
    // 上传流程只用 multipart，JSON 模式目前只有测试在用
    #[cfg_attr(not(test), allow(dead_code))]
    Json(&'a serde_json::Value),
}

pub trait Transport {
    async fn get(&self, url: &str, authorization: Option<&str>)
        -> Result<RawResponse, TransportError>;

    async fn post(
        &self,
        url: &str,
        body: PostBody<'_>,
        authorization: Option<&str>,
    ) -> Result<RawResponse, TransportError>;
}

/// 基于 reqwest 的 HTTP 传输
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `insecure` 为 true 时关闭证书校验，只应在自签名测试环境中使用
    pub fn new(insecure: bool) -> Result<Self, TransportError> {
        if insecure {
            tracing::warn!("certificate validation is disabled");
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self { client })
    }

    async fn file_form(path: &Path) -> Result<Form, TransportError> {
        let io_err = |source| TransportError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = tokio::fs::File::open(path).await.map_err(io_err)?;
        let len = file.metadata().await.map_err(io_err)?.len();

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), len)
            .file_name(file_name)
            .mime_str(mime_for(path))?;

        Ok(Form::new().part("file", part))
    }

    async fn read(response: reqwest::Response) -> Result<RawResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}

impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let mut request = self.client.get(url);
        if let Some(token) = authorization {
            request = request.header(AUTHORIZATION, token);
        }

        tracing::debug!(url, "GET");
        Self::read(request.send().await?).await
    }

    async fn post(
        &self,
        url: &str,
        body: PostBody<'_>,
        authorization: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let mut request = self.client.post(url);
        if let Some(token) = authorization {
            request = request.header(AUTHORIZATION, token);
        }

        request = match body {
            PostBody::File(path) => request.multipart(Self::file_form(path).await?),
            PostBody::Json(value) => request.json(value),
        };

        tracing::debug!(url, "POST");
        Self::read(request.send().await?).await
    }
}

/// 按扩展名推断 MIME 类型
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("tiff") => "image/tiff",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
