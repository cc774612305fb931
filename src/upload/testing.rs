//! 测试用的内存 Transport，记录所有请求

use crate::upload::error::TransportError;
use crate::upload::transport::{PostBody, RawResponse, Transport};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Reply {
    Respond(u16, String),
    Fail,
}

impl Reply {
    fn produce(&self) -> Result<RawResponse, TransportError> {
        match self {
            Reply::Respond(status, body) => Ok(RawResponse {
                status: *status,
                body: body.clone().into_bytes(),
            }),
            Reply::Fail => Err(TransportError::Io {
                path: PathBuf::from("<network>"),
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub url: String,
    pub authorization: Option<String>,
    pub file: Option<PathBuf>,
}

/// 未配置的上传默认返回 200 和 `{"url": "https://cdn.example.com/<文件名>"}`
#[derive(Default)]
pub struct FakeTransport {
    get_reply: Option<Reply>,
    post_replies: HashMap<String, Reply>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn with_get(mut self, status: u16, body: &str) -> Self {
        self.get_reply = Some(Reply::Respond(status, body.to_string()));
        self
    }

    pub fn with_get_failure(mut self) -> Self {
        self.get_reply = Some(Reply::Fail);
        self
    }

    /// 按文件名配置上传响应
    pub fn with_upload(mut self, file_name: &str, status: u16, body: &str) -> Self {
        self.post_replies
            .insert(file_name.to_string(), Reply::Respond(status, body.to_string()));
        self
    }

    pub fn with_upload_failure(mut self, file_name: &str) -> Self {
        self.post_replies.insert(file_name.to_string(), Reply::Fail);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploaded_files(&self) -> Vec<PathBuf> {
        self.calls().into_iter().filter_map(|c| c.file).collect()
    }
}

impl Transport for FakeTransport {
    async fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(Call {
            method: "GET",
            url: url.to_string(),
            authorization: authorization.map(str::to_string),
            file: None,
        });

        self.get_reply
            .clone()
            .unwrap_or(Reply::Respond(404, r#"{"message":"not found"}"#.to_string()))
            .produce()
    }

    async fn post(
        &self,
        url: &str,
        body: PostBody<'_>,
        authorization: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let file = match body {
            PostBody::File(path) => Some(path.to_path_buf()),
            _ => None,
        };

        self.calls.lock().unwrap().push(Call {
            method: "POST",
            url: url.to_string(),
            authorization: authorization.map(str::to_string),
            file: file.clone(),
        });

        let name = file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.post_replies.get(&name) {
            Some(reply) => reply.produce(),
            None => Reply::Respond(200, format!(r#"{{"url":"https://cdn.example.com/{name}"}}"#))
                .produce(),
        }
    }
}
