use super::*;
use crate::request::{HttpMethod, MockHttpClient, RequestBody};
use crate::storage::MemoryStore;
use crate::token::unsigned_jwt;
use rencontre_shared::protocol::ServiceArea;
use serde_json::json;

const BASE: &str = "http://auth.test";
const EVENTS: &str = "http://events.test";

type TestClient = ApiClient<Rc<MockHttpClient>, MemoryStore>;

fn setup() -> (Rc<MockHttpClient>, Rc<Session<MemoryStore>>, TestClient) {
    let http = Rc::new(MockHttpClient::new());
    let session = Rc::new(Session::new(MemoryStore::new()));
    let config = ApiConfig::new(BASE).with_area(ServiceArea::Events, EVENTS);
    let client = ApiClient::new(http.clone(), session.clone(), config);
    (http, session, client)
}

fn form_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    match &req.body {
        Some(RequestBody::Multipart(parts)) => parts.iter().find_map(|(k, v)| match v {
            FormPart::Text(t) if k == name => Some(t.as_str()),
            _ => None,
        }),
        _ => None,
    }
}

// =========================================================
// Login
// =========================================================

#[tokio::test]
async fn test_login_with_email_uses_email_endpoint() {
    let (http, _, client) = setup();
    http.mock_response(
        &format!("{}/auth/login_with_email", BASE),
        200,
        json!({"access_token": "tok", "token_type": "bearer"}),
    );

    client.login("a@b.com", "secret").await.unwrap();

    assert_eq!(http.urls(), vec![format!("{}/auth/login_with_email", BASE)]);
}

#[tokio::test]
async fn test_login_with_username_uses_username_endpoint() {
    let (http, _, client) = setup();
    http.mock_response(
        &format!("{}/auth/login_with_username", BASE),
        200,
        json!({"access_token": "tok"}),
    );

    client.login("alice", "secret").await.unwrap();

    assert_eq!(http.urls(), vec![format!("{}/auth/login_with_username", BASE)]);
}

#[tokio::test]
async fn test_login_sends_password_grant_form() {
    let (http, _, client) = setup();
    http.mock_response(
        &format!("{}/auth/login_with_username", BASE),
        200,
        json!({"access_token": "tok"}),
    );

    client.login("alice", "s3cret").await.unwrap();

    let requests = http.requests.borrow();
    let req = &requests[0];
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.header("Authorization"), None);
    assert_eq!(form_value(req, "grant_type"), Some("password"));
    assert_eq!(form_value(req, "username"), Some("alice"));
    assert_eq!(form_value(req, "password"), Some("s3cret"));
    assert_eq!(form_value(req, "scope"), Some(""));
    assert_eq!(form_value(req, "client_id"), Some("string"));
    assert_eq!(form_value(req, "client_secret"), Some("string"));
}

#[tokio::test]
async fn test_login_stores_token_before_returning() {
    let (http, session, client) = setup();
    http.mock_response(
        &format!("{}/auth/login_with_username", BASE),
        200,
        json!({"access_token": "fresh", "role": "admin"}),
    );

    let tokens = client.login("alice", "pw").await.unwrap();

    assert_eq!(tokens.access_token, "fresh");
    assert!(session.is_logged_in());
    assert_eq!(session.token().as_deref(), Some("fresh"));
    assert!(session.is_admin());
}

#[tokio::test]
async fn test_login_reads_role_from_token_claims() {
    let (http, session, client) = setup();
    let jwt = unsigned_jwt(json!({"id": 3, "role": "suspended_user"}));
    http.mock_response(
        &format!("{}/auth/login_with_email", BASE),
        200,
        json!({ "access_token": jwt }),
    );

    client.login("c@d.fr", "pw").await.unwrap();

    assert!(session.is_suspended_user());
    assert_eq!(session.current_user_id(), Some(3));
}

#[tokio::test]
async fn test_login_failure_is_returned_and_session_untouched() {
    let (http, session, client) = setup();
    http.mock_response(
        &format!("{}/auth/login_with_username", BASE),
        401,
        json!({"detail": "Incorrect username or password"}),
    );

    let err = client.login("alice", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.is_unauthorized());
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_login_with_malformed_body_is_decode_error() {
    let (http, session, client) = setup();
    http.mock_text(&format!("{}/auth/login_with_username", BASE), 200, "<html>");

    let err = client.login("alice", "pw").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    assert!(!session.is_logged_in());
}

// =========================================================
// Registration
// =========================================================

fn registration() -> RegisterRequest {
    RegisterRequest {
        username: "alice".into(),
        email: "alice@example.org".into(),
        password: "pw".into(),
        nom: None,
        prenom: Some("Alice".into()),
    }
}

#[tokio::test]
async fn test_register_verifies_account_with_confirmation_token() {
    let (http, _, client) = setup();
    http.mock_response(
        &format!("{}/auth/register", BASE),
        201,
        json!({"id": 1, "token_confirmation_email": "X"}),
    );
    http.mock_response(&format!("{}/auth/verify?token=X", BASE), 200, json!({"ok": true}));

    let resp = client.register(&registration()).await.unwrap();

    assert_eq!(resp.confirmation_token(), Some("X"));
    assert_eq!(
        http.urls(),
        vec![
            format!("{}/auth/register", BASE),
            format!("{}/auth/verify?token=X", BASE),
        ]
    );
    let requests = http.requests.borrow();
    assert_eq!(requests[1].method, HttpMethod::Post);
    assert_eq!(requests[1].body, None);
}

#[tokio::test]
async fn test_register_without_confirmation_token_skips_verification() {
    let (http, _, client) = setup();
    http.mock_response(&format!("{}/auth/register", BASE), 200, json!({"id": 1}));

    let resp = client.register(&registration()).await.unwrap();

    assert_eq!(resp.confirmation_token(), None);
    assert_eq!(resp.0["id"], 1);
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_register_with_empty_confirmation_token_skips_verification() {
    let (http, _, client) = setup();
    http.mock_response(
        &format!("{}/auth/register", BASE),
        201,
        json!({"id": 1, "token_confirmation_email": ""}),
    );

    let resp = client.register(&registration()).await.unwrap();

    assert_eq!(resp.confirmation_token(), None);
    assert_eq!(http.urls(), vec![format!("{}/auth/register", BASE)]);
}

#[tokio::test]
async fn test_register_returns_non_object_body_as_is() {
    let (http, _, client) = setup();
    http.mock_response(&format!("{}/auth/register", BASE), 201, json!("Utilisateur créé"));

    let resp = client.register(&registration()).await.unwrap();

    assert_eq!(resp.into_value(), json!("Utilisateur créé"));
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_register_sends_json_payload() {
    let (http, _, client) = setup();
    http.mock_response(&format!("{}/auth/register", BASE), 200, json!({}));

    client.register(&registration()).await.unwrap();

    let requests = http.requests.borrow();
    match &requests[0].body {
        Some(RequestBody::Json(text)) => {
            let body: Value = serde_json::from_str(text).unwrap();
            assert_eq!(body["email"], "alice@example.org");
            assert_eq!(body["prenom"], "Alice");
            assert!(body.get("nom").is_none());
        }
        other => panic!("expected JSON body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_propagates_verification_failure() {
    let (http, _, client) = setup();
    http.mock_response(
        &format!("{}/auth/register", BASE),
        200,
        json!({"token_confirmation_email": "a b"}),
    );
    http.mock_response(&format!("{}/auth/verify?token=a%20b", BASE), 400, json!({}));

    let err = client.register(&registration()).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(http.request_count(), 2);
}

#[tokio::test]
async fn test_register_conflict_is_returned() {
    let (http, _, client) = setup();
    http.mock_response(
        &format!("{}/auth/register", BASE),
        409,
        json!({"detail": "email already used"}),
    );

    let err = client.register(&registration()).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(http.request_count(), 1);
}

// =========================================================
// Authorization header
// =========================================================

#[tokio::test]
async fn test_token_is_read_at_call_time() {
    let (http, session, client) = setup();
    let url = format!("{}/user/current_user", BASE);
    http.mock_response(&url, 200, json!({"id": 5, "username": "bob"}));

    // 客户端在登录之前构建
    session.set_session("first", None);
    client.current_user().await.unwrap();
    session.set_session("second", None);
    let user = client.current_user().await.unwrap();

    assert_eq!(user.id, 5);
    let requests = http.requests.borrow();
    assert_eq!(requests[0].header("Authorization"), Some("Bearer first"));
    assert_eq!(requests[1].header("Authorization"), Some("Bearer second"));
}

#[tokio::test]
async fn test_authenticated_call_without_token_is_not_sent() {
    let (http, _, client) = setup();

    let err = client.current_user().await.unwrap_err();

    assert_eq!(err, ApiError::NotAuthenticated);
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (http, session, client) = setup();
    session.set_session("tok", Some(Role::User));

    client.logout();

    assert!(!session.is_logged_in());
    assert_eq!(session.role(), None);
    assert_eq!(
        client.current_user().await.unwrap_err(),
        ApiError::NotAuthenticated
    );
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_public_endpoint_has_no_authorization_header() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_response(
        &format!("{}/Event_public/get_all_allawed_event", EVENTS),
        200,
        json!([{"id": 1, "titre": "Pique-nique"}]),
    );

    let events = client.allowed_events().await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].titre, "Pique-nique");
    assert_eq!(http.requests.borrow()[0].header("Authorization"), None);
}

// =========================================================
// Failures
// =========================================================

#[tokio::test]
async fn test_http_error_propagated_without_retry() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    let url = format!("{}/Event_public/get_event_by_id/9", EVENTS);
    http.mock_text(&url, 503, "maintenance");

    let err = client.event(9).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 503,
            body: "maintenance".to_string()
        }
    );
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_transport_error_propagated() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_unreachable(&format!("{}/user/current_user", BASE));

    let err = client.current_user().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_expired_token_surfaces_as_http_error() {
    let (http, session, client) = setup();
    session.set_session("stale", Some(Role::User));
    http.mock_response(&format!("{}/user/current_user", BASE), 401, json!({}));

    let err = client.current_user().await.unwrap_err();

    assert!(err.is_unauthorized());
    // 不自动注销
    assert!(session.is_logged_in());
}

// =========================================================
// URL building
// =========================================================

#[tokio::test]
async fn test_path_params_are_encoded() {
    let (http, session, client) = setup();
    session.set_session("tok", None);

    let _ = client
        .call(&endpoints::PROFILE_PHOTO_BY_ID, &["a/b c"], Payload::Empty)
        .await;

    assert_eq!(
        http.urls(),
        vec![format!("{}/user_infos/photo_profil/a%2Fb%20c", BASE)]
    );
}

#[tokio::test]
async fn test_wrong_param_count_is_rejected_locally() {
    let (http, session, client) = setup();
    session.set_session("tok", None);

    let err = client
        .call(&endpoints::EVENT_BY_ID, &[], Payload::Empty)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Precondition(PreconditionError::PathParams { expected: 1, actual: 0, .. })
    ));
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_counts_accept_bare_and_wrapped_numbers() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_response(
        &format!("{}/reaction/count_total_reactions/4", BASE),
        200,
        json!(11),
    );
    http.mock_response(
        &format!("{}/commentaire/commens_count_by_event/4", BASE),
        200,
        json!({"count": 2}),
    );

    assert_eq!(client.reaction_total(ReactionTarget::Publication(4)).await, Ok(11));
    assert_eq!(client.comment_count(CommentTarget::Event(4)).await, Ok(2));
}

#[tokio::test]
async fn test_comment_payload_targets_event() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_response(
        &format!("{}/commentaire/create_comment_for_event", BASE),
        201,
        json!({"id": 8}),
    );

    let created = client.comment(CommentTarget::Event(3), "Bravo").await.unwrap();

    assert_eq!(created["id"], 8);
    let requests = http.requests.borrow();
    assert_eq!(
        requests[0].body,
        Some(RequestBody::Json(r#"{"contenu":"Bravo","id_evenement":3}"#.to_string()))
    );
}

#[tokio::test]
async fn test_publication_with_image_uses_multipart() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_response(
        &format!("{}/publication_utilisateur/publications/", BASE),
        201,
        json!({"id": 2, "contenu": "Photo"}),
    );

    let image = FormPart::File {
        file_name: "a.jpg".into(),
        mime: "image/jpeg".into(),
        bytes: vec![1, 2, 3],
    };
    let publication = client.create_publication("Photo", Some(image)).await.unwrap();

    assert_eq!(publication.id, 2);
    let requests = http.requests.borrow();
    assert_eq!(form_value(&requests[0], "contenu"), Some("Photo"));
    assert_eq!(requests[0].header("Content-Type"), None);
}

#[tokio::test]
async fn test_profile_photo_body_shapes() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    let url = format!("{}/user_infos/photo_profil", BASE);

    http.mock_response(&url, 200, json!("/media/u1.png"));
    assert_eq!(client.profile_photo().await, Ok(Some("/media/u1.png".to_string())));

    http.mock_response(&url, 200, json!(null));
    assert_eq!(client.profile_photo().await, Ok(None));

    http.mock_response(&url, 200, json!({"photo_profil": "abc"}));
    assert_eq!(client.profile_photo().await, Ok(Some("abc".to_string())));

    http.mock_text(&url, 200, "");
    assert_eq!(client.profile_photo().await, Ok(None));
}

// =========================================================
// Remaining wrappers
// =========================================================

#[tokio::test]
async fn test_profile_photo_of_other_user() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_response(&format!("{}/user_infos/photo_profil/12", BASE), 200, json!("xyz"));

    assert_eq!(client.profile_photo_of(12).await, Ok(Some("xyz".to_string())));
    assert_eq!(http.requests.borrow()[0].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_change_password_puts_json_body() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    let url = format!("{}/user/reset_password_in_app", BASE);
    http.mock_response(&url, 200, json!({}));

    client
        .change_password(&json!({"old_password": "a", "new_password": "b"}))
        .await
        .unwrap();

    let requests = http.requests.borrow();
    assert_eq!(requests[0].url, url);
    assert_eq!(requests[0].method, HttpMethod::Put);
    match &requests[0].body {
        Some(RequestBody::Json(text)) => {
            let body: Value = serde_json::from_str(text).unwrap();
            assert_eq!(body["new_password"], "b");
        }
        other => panic!("expected JSON body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_my_publications() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_response(
        &format!("{}/publication_utilisateur/publications/mes/", BASE),
        200,
        json!([{"id": 3, "contenu": "Bonjour"}]),
    );

    let list = client.my_publications().await.unwrap();

    assert_eq!(list.len(), 1);
    assert_eq!(list[0].contenu, "Bonjour");
    assert_eq!(http.requests.borrow()[0].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_validate_comment_puts_to_admin_endpoint() {
    let (http, session, client) = setup();
    session.set_session("tok", Some(Role::Admin));
    let url = format!("{}/commentaire/admin/valide_comment/8", BASE);
    http.mock_response(&url, 200, json!({}));

    client.validate_comment(8).await.unwrap();

    let requests = http.requests.borrow();
    assert_eq!(requests[0].url, url);
    assert_eq!(requests[0].method, HttpMethod::Put);
}

#[tokio::test]
async fn test_comment_statistics_uses_get() {
    let (http, session, client) = setup();
    session.set_session("tok", Some(Role::Admin));
    http.mock_response(
        &format!("{}/commentaire/admin/statistiques", BASE),
        200,
        json!({"total": 4, "valides": 3}),
    );

    let stats = client.comment_statistics().await.unwrap();

    assert_eq!(stats["valides"], 3);
    assert_eq!(http.requests.borrow()[0].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_follower_and_following_lists() {
    let (http, session, client) = setup();
    session.set_session("tok", None);
    http.mock_response(
        &format!("{}/follow/followers/5", BASE),
        200,
        json!([{"id": 1}, {"id": 2}]),
    );
    http.mock_response(&format!("{}/follow/following/5", BASE), 200, json!([]));

    assert_eq!(client.followers(5).await.unwrap().len(), 2);
    assert!(client.following(5).await.unwrap().is_empty());
    assert_eq!(
        http.urls(),
        vec![
            format!("{}/follow/followers/5", BASE),
            format!("{}/follow/following/5", BASE),
        ]
    );
}
