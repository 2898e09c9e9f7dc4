use thiserror::Error;

/// 在发出网络请求之前就能判定失败的前置条件
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("cannot resolve the current user id")]
    MissingCurrentUser,
    #[error("a user cannot follow themself")]
    SelfFollow,
    #[error("endpoint {path} expects {expected} path parameter(s), got {actual}")]
    PathParams {
        path: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// 客户端统一错误类型
///
/// HTTP 层不解释状态码：非 2xx 响应原样放进 `Status` 交给调用方。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 网络层失败（连接失败、CORS、请求构建失败等）
    #[error("transport error: {0}")]
    Transport(String),
    /// 服务端返回了非 2xx 状态码
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// 响应体无法解析为期望的类型
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// 请求体无法序列化
    #[error("failed to encode request: {0}")]
    Encode(String),
    /// 调用需要认证的接口，但会话中没有令牌
    #[error("no access token in session")]
    NotAuthenticated,
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401/403：令牌过期或被吊销，与其它 HTTP 错误走同一条路径
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
