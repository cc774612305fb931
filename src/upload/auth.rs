use crate::upload::error::AuthError;
use crate::upload::transport::Transport;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// 认证方式，构造 `UploadRequest` 时确定一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// 使用 access key 在本地签发 token
    BySecret {
        environment_id: String,
        access_key: String,
    },
    /// 从远端 token 接口获取
    ByTokenUrl { token_url: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    iat: i64,
}

/// 服务端返回的错误体
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// 生成本次执行使用的 token
pub async fn create_token<T: Transport>(
    strategy: &AuthStrategy,
    transport: &T,
) -> Result<String, AuthError> {
    match strategy {
        AuthStrategy::BySecret {
            environment_id,
            access_key,
        } => sign_token(environment_id, access_key),
        AuthStrategy::ByTokenUrl { token_url } => fetch_token(token_url, transport).await,
    }
}

/// HS256 签名，issuer 为 environment id
pub fn sign_token(environment_id: &str, access_key: &str) -> Result<String, AuthError> {
    let claims = Claims {
        iss: environment_id.to_string(),
        iat: chrono::Utc::now().timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(access_key.as_bytes()),
    )?;

    tracing::debug!(environment_id, "signed token locally");
    Ok(token)
}

async fn fetch_token<T: Transport>(token_url: &str, transport: &T) -> Result<String, AuthError> {
    let response = transport
        .get(token_url, None)
        .await
        .map_err(AuthError::Unreachable)?;

    match response.status {
        status @ 400..=499 => {
            let message = serde_json::from_slice::<ErrorBody>(&response.body)
                .map(|e| e.message)
                .unwrap_or_else(|_| response.text());
            Err(AuthError::Rejected { status, message })
        }
        status if status >= 500 => Err(AuthError::Unavailable { status }),
        _ => {
            let token = response.text().trim().to_string();
            if token.is_empty() {
                return Err(AuthError::EmptyToken);
            }
            tracing::debug!(token_url, "fetched token from url");
            Ok(token)
        }
    }
}
