use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化存储中保存访问令牌的键
pub const STORAGE_TOKEN_KEY: &str = "access_token";
/// 持久化存储中保存角色的键
pub const STORAGE_ROLE_KEY: &str = "role";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// 用户没有头像（或加载失败）时使用的默认图片
pub const DEFAULT_PROFILE_IMAGE: &str = "/user.png";

// =========================================================
// 认证 (Auth)
// =========================================================

/// 登录接口的响应（OAuth2 password grant）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
}

/// 注册接口的响应
///
/// 服务端返回什么就保留什么（对象、字符串或空）；客户端只关心其中的
/// `token_confirmation_email`。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterResponse(pub serde_json::Value);

impl RegisterResponse {
    /// 从原始响应体构造；非 JSON 文本按字符串保留，空响应体为 `null`
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self(serde_json::Value::Null);
        }
        Self(
            serde_json::from_str(body)
                .unwrap_or_else(|_| serde_json::Value::String(body.to_string())),
        )
    }

    /// 邮箱确认令牌；缺失或为空串时返回 `None`
    pub fn confirmation_token(&self) -> Option<&str> {
        self.0
            .get("token_confirmation_email")
            .and_then(serde_json::Value::as_str)
            .filter(|t| !t.is_empty())
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date_evenement: Option<String>,
    #[serde(default)]
    pub lieu: Option<String>,
    #[serde(default)]
    pub categorie_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    #[serde(default)]
    pub contenu: String,
    #[serde(default)]
    pub id_utilisateur: Option<i64>,
    #[serde(default)]
    pub date_creation: Option<String>,
    /// base64 编码的图片（可能为空）
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub contenu: String,
    #[serde(default)]
    pub id_utilisateur: Option<i64>,
    #[serde(default)]
    pub date_creation: Option<String>,
}

/// 评论的目标对象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Publication(i64),
    Event(i64),
    Product(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub contenu: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_publication: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_evenement: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_produit: Option<i64>,
}

impl NewComment {
    pub fn new(target: CommentTarget, contenu: impl Into<String>) -> Self {
        let mut comment = NewComment {
            contenu: contenu.into(),
            id_publication: None,
            id_evenement: None,
            id_produit: None,
        };
        match target {
            CommentTarget::Publication(id) => comment.id_publication = Some(id),
            CommentTarget::Event(id) => comment.id_evenement = Some(id),
            CommentTarget::Product(id) => comment.id_produit = Some(id),
        }
        comment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

/// 表态的目标对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Publication(i64),
    Event(i64),
    Product(i64),
    Comment(i64),
    Reply(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReaction {
    pub type_reaction: ReactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_publication: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_evenement: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_produit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_commentaire: Option<i64>,
}

impl NewReaction {
    pub fn new(target: ReactionTarget, type_reaction: ReactionKind) -> Self {
        let mut reaction = NewReaction {
            type_reaction,
            id_publication: None,
            id_evenement: None,
            id_produit: None,
            id_commentaire: None,
        };
        match target {
            ReactionTarget::Publication(id) => reaction.id_publication = Some(id),
            ReactionTarget::Event(id) => reaction.id_evenement = Some(id),
            ReactionTarget::Product(id) => reaction.id_produit = Some(id),
            // 回复本身也是一条评论
            ReactionTarget::Comment(id) | ReactionTarget::Reply(id) => {
                reaction.id_commentaire = Some(id)
            }
        }
        reaction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowRequest {
    pub id_suivi: i64,
}

/// 计数类接口的响应
///
/// 后端有的直接返回数字，有的包一层 `{"count": n}` 或 `{"total": n}`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountPayload {
    Bare(u64),
    Wrapped {
        #[serde(alias = "total")]
        count: u64,
    },
}

impl CountPayload {
    pub fn value(&self) -> u64 {
        match self {
            CountPayload::Bare(n) => *n,
            CountPayload::Wrapped { count } => *count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_payload_shapes() {
        let bare: CountPayload = serde_json::from_str("12").unwrap();
        let wrapped: CountPayload = serde_json::from_str(r#"{"count": 3}"#).unwrap();
        let total: CountPayload = serde_json::from_str(r#"{"total": 7}"#).unwrap();
        assert_eq!(bare.value(), 12);
        assert_eq!(wrapped.value(), 3);
        assert_eq!(total.value(), 7);
    }

    #[test]
    fn test_register_response_keeps_whole_body() {
        let resp = RegisterResponse::from_body(r#"{"token_confirmation_email":"X","id":4}"#);
        assert_eq!(resp.confirmation_token(), Some("X"));
        assert_eq!(resp.0["id"], serde_json::json!(4));
    }

    #[test]
    fn test_register_response_non_object_bodies() {
        let quoted = RegisterResponse::from_body(r#""Utilisateur créé""#);
        assert_eq!(quoted.0, serde_json::json!("Utilisateur créé"));
        assert_eq!(quoted.confirmation_token(), None);

        let plain = RegisterResponse::from_body("Utilisateur créé");
        assert_eq!(plain.0, serde_json::json!("Utilisateur créé"));

        assert_eq!(RegisterResponse::from_body("").0, serde_json::Value::Null);
    }

    #[test]
    fn test_register_response_empty_token_is_absent() {
        let resp = RegisterResponse::from_body(r#"{"token_confirmation_email":""}"#);
        assert_eq!(resp.confirmation_token(), None);
    }

    #[test]
    fn test_new_comment_targets_one_object() {
        let c = NewComment::new(CommentTarget::Event(9), "Super soirée");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, serde_json::json!({"contenu": "Super soirée", "id_evenement": 9}));
    }
}
