use super::*;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::request::{HttpMethod, MockHttpClient};
use crate::session::{Role, Session};
use crate::storage::MemoryStore;
use crate::token::unsigned_jwt;
use serde_json::json;

const BASE: &str = "http://api.test";

type TestApi = ApiClient<Rc<MockHttpClient>, MemoryStore>;

fn setup() -> (Rc<MockHttpClient>, Rc<Session<MemoryStore>>, Rc<TestApi>) {
    let http = Rc::new(MockHttpClient::new());
    let session = Rc::new(Session::new(MemoryStore::new()));
    let api = Rc::new(ApiClient::new(
        http.clone(),
        session.clone(),
        ApiConfig::new(BASE),
    ));
    (http, session, api)
}

fn login_as(session: &Session<MemoryStore>, user_id: i64) {
    let token = unsigned_jwt(json!({"id": user_id, "role": "user"}));
    session.set_session(&token, Some(Role::User));
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

// =========================================================
// ProfilePhotoStore
// =========================================================

#[tokio::test]
async fn test_failed_photo_fetch_falls_back_and_marks_loaded() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_text(&url("/user_infos/photo_profil"), 500, "boom");
    let store = ProfilePhotoStore::new(api);

    let outcome = store.fetch_photo().await;

    assert_eq!(store.photo(), "/user.png");
    assert!(store.is_loaded());
    assert_eq!(outcome.error().and_then(ApiError::status), Some(500));
}

#[tokio::test]
async fn test_photo_is_fetched_only_once() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_response(&url("/user_infos/photo_profil"), 200, json!("abc123"));
    let store = ProfilePhotoStore::new(api);

    store.fetch_photo().await;
    let second = store.fetch_photo().await;

    assert_eq!(http.request_count(), 1);
    assert_eq!(second, FetchOutcome::Cached("abc123".to_string()));
}

#[tokio::test]
async fn test_empty_photo_uses_default() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_response(&url("/user_infos/photo_profil"), 200, json!(null));
    let store = ProfilePhotoStore::new(api);

    let outcome = store.fetch_photo().await;

    assert!(outcome.is_fresh());
    assert_eq!(store.photo(), "/user.png");
}

#[tokio::test]
async fn test_photo_without_session_does_not_hit_network() {
    let (http, _, api) = setup();
    let store = ProfilePhotoStore::new(api);

    let outcome = store.fetch_photo().await;

    assert_eq!(outcome.error(), Some(&ApiError::NotAuthenticated));
    assert_eq!(store.photo(), "/user.png");
    assert_eq!(http.request_count(), 0);
}

// =========================================================
// CurrentUserStore
// =========================================================

#[tokio::test]
async fn test_current_user_fetch_and_failure() {
    let (http, session, api) = setup();
    login_as(&session, 5);
    http.mock_response(
        &url("/user/current_user"),
        200,
        json!({"id": 5, "username": "alice", "email": "a@b.com", "role": "user"}),
    );
    let store = CurrentUserStore::new(api);

    store.fetch().await;
    assert_eq!(store.user_id(), Some(5));
    assert_eq!(store.user().map(|u| u.username), Some("alice".to_string()));

    http.mock_text(&url("/user/current_user"), 401, "expired");
    let outcome = store.fetch().await;

    assert!(outcome.error().is_some_and(ApiError::is_unauthorized));
    assert_eq!(store.user(), None);
    // 失败不会清除会话
    assert!(session.is_logged_in());
}

// =========================================================
// ReactionCountStore / CommentCountStore
// =========================================================

#[tokio::test]
async fn test_reaction_counts_and_react_refreshes() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_response(&url("/reaction/count_total_reactions/8"), 200, json!({"count": 4}));
    http.mock_response(
        &url("/reaction/count_reactions_by_type/8"),
        200,
        json!({"like": 3, "love": 1}),
    );
    http.mock_response(&url("/reaction/react_for_pub"), 201, json!({"id": 99}));
    let store = ReactionCountStore::new(api, ReactionTarget::Publication(8));

    store.fetch().await;
    assert_eq!(store.total(), 4);
    assert_eq!(store.count_for("like"), 3);
    assert_eq!(store.count_for("wow"), 0);

    store.react(ReactionKind::Love).await.unwrap();

    let requests = http.requests.borrow();
    let post = requests
        .iter()
        .find(|r| r.method == HttpMethod::Post)
        .unwrap();
    assert_eq!(post.url, url("/reaction/react_for_pub"));
    // 两次读取各两个请求，加一次表态
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_failed_reaction_count_yields_zero() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_unreachable(&url("/reaction/count_total_reactions_event/3"));
    let store = ReactionCountStore::new(api, ReactionTarget::Event(3));

    store.fetch().await;

    assert_eq!(store.total(), 0);
    assert!(store.by_type().is_empty());
}

#[tokio::test]
async fn test_failed_comment_is_returned_to_caller() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_response(&url("/commentaire/commens_count_by_publication/2"), 200, json!(6));
    http.mock_text(&url("/commentaire/create_comment_for_pub"), 422, "contenu vide");
    let store = CommentCountStore::new(api, CommentTarget::Publication(2));

    store.fetch().await;
    let err = store.comment("").await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(store.count(), 6);
}

// =========================================================
// FollowStore
// =========================================================

#[tokio::test]
async fn test_self_follow_is_rejected_without_network_call() {
    let (http, session, api) = setup();
    login_as(&session, 12);
    let store = FollowStore::new(api, 12);

    let err = store.follow(12).await.unwrap_err();

    assert_eq!(err, ApiError::Precondition(PreconditionError::SelfFollow));
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_follow_without_user_id_is_rejected() {
    let (http, session, api) = setup();
    // 不透明令牌：无法解码出用户 id
    session.set_session("opaque-token", Some(Role::User));
    let store = FollowStore::new(api, 30);

    let err = store.follow(30).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Precondition(PreconditionError::MissingCurrentUser)
    );
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_follow_posts_and_refreshes_counts() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_response(&url("/follow/follow_user"), 200, json!({"ok": true}));
    http.mock_response(&url("/follow/count_followers/30"), 200, json!({"total": 11}));
    http.mock_response(&url("/follow/count_following/30"), 200, json!(2));
    let store = FollowStore::new(api, 30);

    store.follow(30).await.unwrap();

    assert_eq!(store.follower_count(), 11);
    assert_eq!(store.following_count(), 2);
    let requests = http.requests.borrow();
    assert_eq!(requests[0].url, url("/follow/follow_user"));
    assert_eq!(
        requests[0].body,
        Some(crate::request::RequestBody::Json(r#"{"id_suivi":30}"#.to_string()))
    );
}

#[tokio::test]
async fn test_follow_counts_keep_previous_on_failure() {
    let (http, session, api) = setup();
    login_as(&session, 1);
    http.mock_response(&url("/follow/count_followers/30"), 200, json!(11));
    http.mock_response(&url("/follow/count_following/30"), 200, json!(2));
    let store = FollowStore::new(api, 30);

    store.fetch_counts().await;
    http.mock_text(&url("/follow/count_followers/30"), 502, "bad gateway");
    store.fetch_counts().await;

    assert_eq!(store.follower_count(), 11);
    assert!(store.followers_remote().last_error().is_some());
}
