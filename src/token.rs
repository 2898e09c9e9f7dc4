//! 访问令牌载荷解析
//!
//! 只解码 JWT 的 payload 段，不校验签名：签名由服务端负责，
//! 客户端只需要从中读出用户 id、角色和过期时间。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// 过期时间（Unix 秒）
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// 解码令牌；非 JWT 格式（不透明令牌）返回 `None`
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// 当前用户 id：依次尝试 `id`、`user_id`
    pub fn user_id(&self) -> Option<i64> {
        [&self.id, &self.user_id]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
    }

    /// 没有 `exp` 的令牌视为永不过期
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now_secs)
    }
}

/// 测试辅助：构造一个未签名的 JWT
#[cfg(test)]
pub(crate) fn unsigned_jwt(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
