//! 远端 API 客户端
//!
//! 每个后端操作一个方法。需要认证的操作在**调用时**从会话读取令牌并附加
//! `Authorization: Bearer <token>`，因此客户端构建之后的登录/注销立即生效。
//! 失败原样返回给调用方：不重试、不退避、不解释状态码。

use std::collections::HashMap;
use std::rc::Rc;

use rencontre_shared::protocol::{Endpoint, endpoints};
use rencontre_shared::{
    Comment, CommentTarget, CountPayload, CurrentUser, Event, FollowRequest, HEADER_AUTHORIZATION,
    NewComment, NewReaction, Publication, ReactionKind, ReactionTarget, RegisterRequest,
    RegisterResponse, TokenResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult, PreconditionError};
use crate::request::{FormPart, HttpClient, HttpRequest, HttpResponse};
use crate::session::{Role, Session};
use crate::storage::KeyValueStore;
use crate::token::TokenClaims;

#[cfg(test)]
mod tests;

/// OAuth2 password grant 要求的占位客户端凭据
const PLACEHOLDER_CLIENT_ID: &str = "string";
const PLACEHOLDER_CLIENT_SECRET: &str = "string";

/// 请求体
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(String, FormPart)>),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(body: &T) -> ApiResult<Self> {
        serde_json::to_value(body)
            .map(Payload::Json)
            .map_err(|e| ApiError::Encode(e.to_string()))
    }
}

/// 按标识符选择登录接口：包含 `@` 视为邮箱
pub fn login_endpoint(identifier: &str) -> Endpoint {
    if identifier.contains('@') {
        endpoints::LOGIN_WITH_EMAIL
    } else {
        endpoints::LOGIN_WITH_USERNAME
    }
}

fn text(value: &str) -> FormPart {
    FormPart::Text(value.to_string())
}

/// 头像类接口可能返回 JSON 字符串、`null` 或纯文本
fn image_from_body(body: &str) -> Option<String> {
    let image = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Null) => return None,
        Ok(other) => other
            .get("photo_profil")
            .or_else(|| other.get("image"))
            .and_then(Value::as_str)
            .map(str::to_string)?,
        Err(_) => body.trim().to_string(),
    };
    (!image.is_empty()).then_some(image)
}

pub struct ApiClient<C, S> {
    http: C,
    session: Rc<Session<S>>,
    config: ApiConfig,
}

impl<C: HttpClient, S: KeyValueStore> ApiClient<C, S> {
    pub fn new(http: C, session: Rc<Session<S>>, config: ApiConfig) -> Self {
        Self {
            http,
            session,
            config,
        }
    }

    pub fn session(&self) -> &Rc<Session<S>> {
        &self.session
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // =========================================================
    // 请求构建与发送
    // =========================================================

    fn url(&self, endpoint: &Endpoint, params: &[&str], query: &[(&str, &str)]) -> ApiResult<String> {
        let expected = endpoint.param_count();
        if expected != params.len() {
            return Err(PreconditionError::PathParams {
                path: endpoint.path,
                expected,
                actual: params.len(),
            }
            .into());
        }

        let mut path = String::with_capacity(endpoint.path.len());
        let mut pieces = endpoint.path.split("{}");
        if let Some(first) = pieces.next() {
            path.push_str(first);
        }
        for (piece, param) in pieces.zip(params) {
            path.push_str(&urlencoding::encode(param));
            path.push_str(piece);
        }

        let mut url = format!("{}{}", self.config.base_url(endpoint.area), path);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        Ok(url)
    }

    fn build(
        &self,
        endpoint: &Endpoint,
        params: &[&str],
        query: &[(&str, &str)],
        payload: Payload,
    ) -> ApiResult<HttpRequest> {
        let url = self.url(endpoint, params, query)?;
        let mut req = HttpRequest::new(&url, endpoint.method);

        if endpoint.auth {
            // 每次调用现场读取，不缓存
            let token = self.session.token().ok_or_else(|| {
                warn!(path = endpoint.path, "authenticated call without a session");
                ApiError::NotAuthenticated
            })?;
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        match payload {
            Payload::Empty => Ok(req),
            Payload::Json(body) => req.with_json(&body),
            Payload::Form(parts) => Ok(req.with_form(parts)),
        }
    }

    /// 发送请求；非 2xx 响应转换为 `ApiError::Status`
    pub async fn execute(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        debug!(method = req.method.as_str(), url = %req.url, "sending request");
        let resp = self.http.send(req).await?;
        if resp.is_success() {
            Ok(resp)
        } else {
            debug!(status = resp.status, "request rejected");
            Err(ApiError::Status {
                status: resp.status,
                body: resp.body,
            })
        }
    }

    async fn request(
        &self,
        endpoint: &Endpoint,
        params: &[&str],
        query: &[(&str, &str)],
        payload: Payload,
    ) -> ApiResult<HttpResponse> {
        let req = self.build(endpoint, params, query, payload)?;
        self.execute(req).await
    }

    /// 调用目录中的任意操作，返回原始响应
    pub async fn call(
        &self,
        endpoint: &Endpoint,
        params: &[&str],
        payload: Payload,
    ) -> ApiResult<HttpResponse> {
        self.request(endpoint, params, &[], payload).await
    }

    /// 调用并把响应体解析为 `T`
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &[&str],
        payload: Payload,
    ) -> ApiResult<T> {
        self.call(endpoint, params, payload).await?.json()
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint, params: &[&str]) -> ApiResult<T> {
        self.call_json(endpoint, params, Payload::Empty).await
    }

    async fn count(&self, endpoint: &Endpoint, params: &[&str]) -> ApiResult<u64> {
        let payload: CountPayload = self.get(endpoint, params).await?;
        Ok(payload.value())
    }

    // =========================================================
    // 认证
    // =========================================================

    /// 登录
    ///
    /// 成功时在返回之前把令牌（以及可得的角色）写入会话。
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<TokenResponse> {
        let endpoint = login_endpoint(identifier);
        let form = vec![
            ("grant_type".to_string(), text("password")),
            ("username".to_string(), text(identifier)),
            ("password".to_string(), text(password)),
            ("scope".to_string(), text("")),
            ("client_id".to_string(), text(PLACEHOLDER_CLIENT_ID)),
            ("client_secret".to_string(), text(PLACEHOLDER_CLIENT_SECRET)),
        ];

        let result = match self.call(&endpoint, &[], Payload::Form(form)).await {
            Ok(resp) => resp.json::<TokenResponse>(),
            Err(e) => Err(e),
        };

        match result {
            Ok(tokens) => {
                let role = resolve_role(&tokens);
                self.session.set_session(&tokens.access_token, role);
                info!(endpoint = endpoint.path, role = role.map(|r| r.as_str()), "login succeeded");
                Ok(tokens)
            }
            Err(e) => {
                error!(error = %e, "login failed");
                Err(e)
            }
        }
    }

    /// 注册
    ///
    /// 响应中带有非空的 `token_confirmation_email` 时立即验证账户，再返回；
    /// 响应体原样交给调用方。
    pub async fn register(&self, payload: &RegisterRequest) -> ApiResult<RegisterResponse> {
        let result = self.register_and_verify(payload).await;
        if let Err(e) = &result {
            error!(error = %e, "registration failed");
        }
        result
    }

    async fn register_and_verify(&self, payload: &RegisterRequest) -> ApiResult<RegisterResponse> {
        let resp = self
            .call(&endpoints::REGISTER, &[], Payload::json(payload)?)
            .await?;
        let resp = RegisterResponse::from_body(&resp.body);

        match resp.confirmation_token() {
            Some(token) => {
                info!("confirmation token received, verifying account");
                self.verify_account(token).await?;
                info!("account verified after registration");
            }
            None => warn!("no confirmation token in registration response"),
        }
        Ok(resp)
    }

    pub async fn verify_account(&self, token: &str) -> ApiResult<HttpResponse> {
        self.request(&endpoints::VERIFY_ACCOUNT, &[], &[("token", token)], Payload::Empty)
            .await
    }

    pub fn logout(&self) {
        self.session.clear_session();
        info!("logged out");
    }

    // =========================================================
    // 用户
    // =========================================================

    pub async fn current_user(&self) -> ApiResult<CurrentUser> {
        self.get(&endpoints::CURRENT_USER, &[]).await
    }

    pub async fn change_password<T: Serialize + ?Sized>(&self, body: &T) -> ApiResult<HttpResponse> {
        self.call(&endpoints::CHANGE_PASSWORD, &[], Payload::json(body)?)
            .await
    }

    pub async fn reset_password<T: Serialize + ?Sized>(&self, body: &T) -> ApiResult<HttpResponse> {
        self.call(&endpoints::RESET_PASSWORD, &[], Payload::json(body)?)
            .await
    }

    /// 当前用户头像；没有头像时返回 `None`
    pub async fn profile_photo(&self) -> ApiResult<Option<String>> {
        let resp = self.call(&endpoints::PROFILE_PHOTO, &[], Payload::Empty).await?;
        Ok(image_from_body(&resp.body))
    }

    pub async fn profile_photo_of(&self, user_id: i64) -> ApiResult<Option<String>> {
        let id = user_id.to_string();
        let resp = self
            .call(&endpoints::PROFILE_PHOTO_BY_ID, &[&id], Payload::Empty)
            .await?;
        Ok(image_from_body(&resp.body))
    }

    pub async fn update_profile_photo(&self, file: FormPart) -> ApiResult<HttpResponse> {
        let form = vec![("file".to_string(), file)];
        self.call(&endpoints::UPDATE_PROFILE_PHOTO, &[], Payload::Form(form))
            .await
    }

    pub async fn delete_profile_photo(&self) -> ApiResult<HttpResponse> {
        self.call(&endpoints::DELETE_PROFILE_PHOTO, &[], Payload::Empty)
            .await
    }

    pub async fn about(&self) -> ApiResult<Value> {
        self.get(&endpoints::ABOUT_ACTIVE, &[]).await
    }

    pub async fn charter(&self) -> ApiResult<Value> {
        self.get(&endpoints::CHARTER, &[]).await
    }

    // =========================================================
    // 活动
    // =========================================================

    /// 公开活动列表（无需登录）
    pub async fn allowed_events(&self) -> ApiResult<Vec<Event>> {
        self.get(&endpoints::ALLOWED_EVENTS, &[]).await
    }

    pub async fn recent_events(&self) -> ApiResult<Vec<Event>> {
        self.get(&endpoints::RECENT_EVENTS, &[]).await
    }

    pub async fn event(&self, event_id: i64) -> ApiResult<Event> {
        self.get(&endpoints::EVENT_BY_ID, &[&event_id.to_string()])
            .await
    }

    pub async fn events_by_category(&self, category_id: i64) -> ApiResult<Vec<Event>> {
        self.get(&endpoints::EVENTS_BY_CATEGORY, &[&category_id.to_string()])
            .await
    }

    pub async fn event_image(&self, event_id: i64) -> ApiResult<Option<String>> {
        let id = event_id.to_string();
        let resp = self.call(&endpoints::EVENT_IMAGE, &[&id], Payload::Empty).await?;
        Ok(image_from_body(&resp.body))
    }

    // =========================================================
    // 用户动态
    // =========================================================

    pub async fn publications(&self) -> ApiResult<Vec<Publication>> {
        self.get(&endpoints::PUBLICATIONS, &[]).await
    }

    pub async fn my_publications(&self) -> ApiResult<Vec<Publication>> {
        self.get(&endpoints::MY_PUBLICATIONS, &[]).await
    }

    pub async fn publication(&self, publication_id: i64) -> ApiResult<Publication> {
        self.get(&endpoints::PUBLICATION_BY_ID, &[&publication_id.to_string()])
            .await
    }

    /// 发布动态；带图片时使用 multipart，否则使用 JSON
    pub async fn create_publication(
        &self,
        contenu: &str,
        image: Option<FormPart>,
    ) -> ApiResult<Publication> {
        let payload = match image {
            Some(file) => Payload::Form(vec![
                ("contenu".to_string(), text(contenu)),
                ("image".to_string(), file),
            ]),
            None => Payload::json(&serde_json::json!({ "contenu": contenu }))?,
        };
        self.call_json(&endpoints::CREATE_PUBLICATION, &[], payload)
            .await
    }

    pub async fn update_publication(&self, publication_id: i64, contenu: &str) -> ApiResult<HttpResponse> {
        let payload = Payload::json(&serde_json::json!({ "contenu": contenu }))?;
        self.call(
            &endpoints::UPDATE_PUBLICATION,
            &[&publication_id.to_string()],
            payload,
        )
        .await
    }

    pub async fn delete_publication(&self, publication_id: i64) -> ApiResult<HttpResponse> {
        self.call(
            &endpoints::DELETE_PUBLICATION,
            &[&publication_id.to_string()],
            Payload::Empty,
        )
        .await
    }

    // =========================================================
    // 评论
    // =========================================================

    pub async fn comment(&self, target: CommentTarget, contenu: &str) -> ApiResult<Value> {
        let endpoint = match target {
            CommentTarget::Publication(_) => endpoints::COMMENT_PUBLICATION,
            CommentTarget::Event(_) => endpoints::COMMENT_EVENT,
            CommentTarget::Product(_) => endpoints::COMMENT_PRODUCT,
        };
        let payload = Payload::json(&NewComment::new(target, contenu))?;
        self.call_json(&endpoint, &[], payload).await
    }

    pub async fn comments_for(&self, target: CommentTarget) -> ApiResult<Vec<Comment>> {
        let (endpoint, id) = match target {
            CommentTarget::Publication(id) => (endpoints::COMMENTS_BY_PUBLICATION, id),
            CommentTarget::Event(id) => (endpoints::COMMENTS_BY_EVENT, id),
            CommentTarget::Product(id) => (endpoints::COMMENTS_BY_PRODUCT, id),
        };
        self.get(&endpoint, &[&id.to_string()]).await
    }

    pub async fn comment_count(&self, target: CommentTarget) -> ApiResult<u64> {
        let (endpoint, id) = match target {
            CommentTarget::Publication(id) => (endpoints::COMMENT_COUNT_BY_PUBLICATION, id),
            CommentTarget::Event(id) => (endpoints::COMMENT_COUNT_BY_EVENT, id),
            CommentTarget::Product(id) => (endpoints::COMMENT_COUNT_BY_PRODUCT, id),
        };
        self.count(&endpoint, &[&id.to_string()]).await
    }

    pub async fn my_comment_count(&self) -> ApiResult<u64> {
        self.count(&endpoints::MY_COMMENT_COUNT, &[]).await
    }

    pub async fn update_comment(&self, comment_id: i64, contenu: &str) -> ApiResult<HttpResponse> {
        let payload = Payload::json(&serde_json::json!({ "contenu": contenu }))?;
        self.call(&endpoints::UPDATE_COMMENT, &[&comment_id.to_string()], payload)
            .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> ApiResult<HttpResponse> {
        self.call(
            &endpoints::DELETE_COMMENT,
            &[&comment_id.to_string()],
            Payload::Empty,
        )
        .await
    }

    // =========================================================
    // 表态
    // =========================================================

    pub async fn react(&self, target: ReactionTarget, kind: ReactionKind) -> ApiResult<Value> {
        let endpoint = match target {
            ReactionTarget::Publication(_) => endpoints::REACT_PUBLICATION,
            ReactionTarget::Event(_) => endpoints::REACT_EVENT,
            ReactionTarget::Product(_) => endpoints::REACT_PRODUCT,
            ReactionTarget::Comment(_) | ReactionTarget::Reply(_) => endpoints::REACT_COMMENT,
        };
        let payload = Payload::json(&NewReaction::new(target, kind))?;
        self.call_json(&endpoint, &[], payload).await
    }

    pub async fn update_reaction(&self, reaction_id: i64, kind: ReactionKind) -> ApiResult<HttpResponse> {
        let payload = Payload::json(&serde_json::json!({ "type_reaction": kind }))?;
        self.call(&endpoints::UPDATE_REACTION, &[&reaction_id.to_string()], payload)
            .await
    }

    pub async fn delete_reaction(&self, reaction_id: i64) -> ApiResult<HttpResponse> {
        self.call(
            &endpoints::DELETE_REACTION,
            &[&reaction_id.to_string()],
            Payload::Empty,
        )
        .await
    }

    pub async fn reaction_total(&self, target: ReactionTarget) -> ApiResult<u64> {
        let (endpoint, id) = match target {
            ReactionTarget::Publication(id) => (endpoints::REACTIONS_TOTAL_PUBLICATION, id),
            ReactionTarget::Event(id) => (endpoints::REACTIONS_TOTAL_EVENT, id),
            ReactionTarget::Product(id) => (endpoints::REACTIONS_TOTAL_PRODUCT, id),
            ReactionTarget::Comment(id) => (endpoints::REACTIONS_TOTAL_COMMENT, id),
            ReactionTarget::Reply(id) => (endpoints::REACTIONS_TOTAL_REPLY, id),
        };
        self.count(&endpoint, &[&id.to_string()]).await
    }

    /// 按表态类型统计，例如 `{"like": 3, "love": 1}`
    pub async fn reactions_by_type(&self, target: ReactionTarget) -> ApiResult<HashMap<String, u64>> {
        let (endpoint, id) = match target {
            ReactionTarget::Publication(id) => (endpoints::REACTIONS_BY_TYPE_PUBLICATION, id),
            ReactionTarget::Event(id) => (endpoints::REACTIONS_BY_TYPE_EVENT, id),
            ReactionTarget::Product(id) => (endpoints::REACTIONS_BY_TYPE_PRODUCT, id),
            ReactionTarget::Comment(id) => (endpoints::REACTIONS_BY_TYPE_COMMENT, id),
            ReactionTarget::Reply(id) => (endpoints::REACTIONS_BY_TYPE_REPLY, id),
        };
        self.get(&endpoint, &[&id.to_string()]).await
    }

    pub async fn my_reaction_count(&self) -> ApiResult<u64> {
        self.count(&endpoints::MY_REACTION_COUNT, &[]).await
    }

    // =========================================================
    // 关注
    // =========================================================

    /// 关注用户（前置条件由调用方检查，见 `stores::FollowStore`）
    pub async fn follow(&self, id_suivi: i64) -> ApiResult<HttpResponse> {
        let payload = Payload::json(&FollowRequest { id_suivi })?;
        self.call(&endpoints::FOLLOW, &[], payload).await
    }

    pub async fn unfollow(&self, id_suivi: i64) -> ApiResult<HttpResponse> {
        self.call(&endpoints::UNFOLLOW, &[&id_suivi.to_string()], Payload::Empty)
            .await
    }

    pub async fn followers(&self, user_id: i64) -> ApiResult<Vec<Value>> {
        self.get(&endpoints::FOLLOWERS, &[&user_id.to_string()]).await
    }

    pub async fn following(&self, user_id: i64) -> ApiResult<Vec<Value>> {
        self.get(&endpoints::FOLLOWING, &[&user_id.to_string()]).await
    }

    pub async fn follower_count(&self, user_id: i64) -> ApiResult<u64> {
        self.count(&endpoints::FOLLOWER_COUNT, &[&user_id.to_string()])
            .await
    }

    pub async fn following_count(&self, user_id: i64) -> ApiResult<u64> {
        self.count(&endpoints::FOLLOWING_COUNT, &[&user_id.to_string()])
            .await
    }

    // =========================================================
    // 管理
    // =========================================================

    pub async fn all_comments(&self) -> ApiResult<Vec<Comment>> {
        self.get(&endpoints::ADMIN_ALL_COMMENTS, &[]).await
    }

    pub async fn validate_comment(&self, comment_id: i64) -> ApiResult<HttpResponse> {
        self.call(
            &endpoints::ADMIN_VALIDATE_COMMENT,
            &[&comment_id.to_string()],
            Payload::Empty,
        )
        .await
    }

    pub async fn comment_statistics(&self) -> ApiResult<Value> {
        self.get(&endpoints::ADMIN_COMMENT_STATISTICS, &[]).await
    }
}

/// 登录响应中的角色优先，其次是令牌载荷中的角色
fn resolve_role(tokens: &TokenResponse) -> Option<Role> {
    tokens
        .role
        .clone()
        .or_else(|| TokenClaims::decode(&tokens.access_token)?.role)
        .and_then(|raw| raw.parse().ok())
}
