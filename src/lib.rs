//! Rencontre 客户端核心
//!
//! 与平台无关的客户端逻辑：会话存储、导航守卫、远端 API 客户端和视图层
//! 状态容器。浏览器相关的部分（localStorage、fetch、History API）由前端通过
//! [`KeyValueStore`] 与 [`HttpClient`] 两个 trait 注入，因此这里的一切都可以在
//! 原生环境下测试。

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod guard;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;
pub mod stores;
pub mod token;

#[cfg(feature = "native")]
pub mod native;

pub use api::{ApiClient, Payload};
pub use cache::{FetchOutcome, OnError, Remote};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, PreconditionError};
pub use guard::{GuardPolicy, Navigation, NavigationDecision, NavigationGuard};
pub use request::{FormPart, HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use route::{
    LOGIN_PATH, NOT_FOUND, Resolution, RouteDescriptor, RouteEntry, RouteParams, RouteTable, View,
};
pub use session::{Role, Session};
pub use storage::{KeyValueStore, MemoryStore};
pub use stores::{
    CommentCountStore, CurrentUserStore, FollowStore, ProfilePhotoStore, ReactionCountStore,
};
pub use token::TokenClaims;

#[cfg(feature = "native")]
pub use native::ReqwestHttpClient;
