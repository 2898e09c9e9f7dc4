//! 认证模块
//!
//! 持有会话、API 客户端与导航守卫，通过 Context 在组件间共享。
//! 会话本身保存在 localStorage 中；这里的信号只是它的响应式镜像，
//! 每次登录/注销后调用 `sync` 刷新。

use std::rc::Rc;

use leptos::prelude::*;
use rencontre::{
    ApiClient, ApiConfig, ApiResult, Navigation, NavigationGuard, ProfilePhotoStore, Role,
    RouteTable, Session, View,
};
use rencontre_shared::date::format_base64_image;
use rencontre_shared::{DEFAULT_PROFILE_IMAGE, RegisterRequest, RegisterResponse};

use crate::web::{BrowserStorage, FetchHttpClient};

pub type Api = ApiClient<FetchHttpClient, BrowserStorage>;

/// 编译期注入的 API 地址（未设置时由 `ApiConfig` 回退到默认值）
fn build_var(key: &str) -> Option<String> {
    let value = match key {
        "RENCONTRE_API_URL" => option_env!("RENCONTRE_API_URL"),
        "RENCONTRE_API_URL_ABOUT" => option_env!("RENCONTRE_API_URL_ABOUT"),
        "RENCONTRE_API_URL_PUBLICATIONS" => option_env!("RENCONTRE_API_URL_PUBLICATIONS"),
        "RENCONTRE_API_URL_CHARTER" => option_env!("RENCONTRE_API_URL_CHARTER"),
        "RENCONTRE_API_URL_EVENTS" => option_env!("RENCONTRE_API_URL_EVENTS"),
        "RENCONTRE_API_URL_COMMENTS" => option_env!("RENCONTRE_API_URL_COMMENTS"),
        "RENCONTRE_API_URL_REACTIONS" => option_env!("RENCONTRE_API_URL_REACTIONS"),
        "RENCONTRE_API_URL_FOLLOWS" => option_env!("RENCONTRE_API_URL_FOLLOWS"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 非 Send 的服务对象，保存在本地 arena 中
struct Services {
    session: Rc<Session<BrowserStorage>>,
    api: Rc<Api>,
    guard: NavigationGuard<BrowserStorage>,
    routes: RouteTable,
    profile_photo: Rc<ProfilePhotoStore>,
}

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    services: StoredValue<Services, LocalStorage>,
    is_logged_in: RwSignal<bool>,
    role: RwSignal<Option<Role>>,
    photo: RwSignal<String>,
}

impl AuthContext {
    pub fn new() -> Self {
        let session = Rc::new(Session::new(BrowserStorage));
        let api = Rc::new(ApiClient::new(
            FetchHttpClient,
            session.clone(),
            ApiConfig::from_lookup(build_var),
        ));
        let guard = NavigationGuard::new(session.clone());
        let profile_photo = Rc::new(ProfilePhotoStore::new(api.clone()));

        let photo = RwSignal::new(DEFAULT_PROFILE_IMAGE.to_string());
        profile_photo
            .remote()
            .subscribe(move |value| photo.set(photo_src(value)));

        Self {
            is_logged_in: RwSignal::new(session.is_logged_in()),
            role: RwSignal::new(session.role()),
            photo,
            services: StoredValue::new_local(Services {
                session,
                api,
                guard,
                routes: RouteTable::default(),
                profile_photo,
            }),
        }
    }

    pub fn api(&self) -> Rc<Api> {
        self.services.with_value(|s| s.api.clone())
    }

    pub fn session(&self) -> Rc<Session<BrowserStorage>> {
        self.services.with_value(|s| s.session.clone())
    }

    /// 解析路径并应用守卫
    pub fn navigate(&self, path: &str) -> Navigation {
        self.services
            .with_value(|s| s.guard.navigate(&s.routes, path))
    }

    /// 指向某个视图的链接，参数缺失时退回首页
    pub fn link(&self, view: View, params: &[&str]) -> String {
        self.services
            .with_value(|s| s.routes.link(view, params))
            .unwrap_or_else(|| "/".to_string())
    }

    pub fn is_logged_in(&self) -> Signal<bool> {
        self.is_logged_in.into()
    }

    pub fn role(&self) -> Signal<Option<Role>> {
        self.role.into()
    }

    pub fn photo(&self) -> Signal<String> {
        self.photo.into()
    }

    /// 从存储重新读取会话
    pub fn sync(&self) {
        let session = self.session();
        self.is_logged_in.set(session.is_logged_in());
        self.role.set(session.role());
    }

    /// 登录；成功后刷新会话信号并加载头像
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<()> {
        self.api().login(identifier, password).await?;
        self.sync();
        self.load_profile_photo().await;
        Ok(())
    }

    pub async fn register(&self, payload: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.api().register(payload).await
    }

    /// 头像只加载一次；失败时显示默认头像
    pub async fn load_profile_photo(&self) {
        if !self.is_logged_in.get_untracked() {
            return;
        }
        let store = self.services.with_value(|s| s.profile_photo.clone());
        store.fetch_photo().await;
    }

    /// 上传新头像后强制重新加载
    pub async fn reload_profile_photo(&self) {
        self.services.with_value(|s| s.profile_photo.reset());
        self.load_profile_photo().await;
    }

    /// 注销
    ///
    /// 导航由路由服务监听认证状态自动处理。
    pub fn logout(&self) {
        self.services.with_value(|s| {
            s.api.logout();
            s.profile_photo.reset();
        });
        self.sync();
    }
}

/// 头像值可能是路径、data URL 或裸 base64
fn photo_src(value: &str) -> String {
    if value.starts_with('/') || value.starts_with("http") || value.starts_with("data:") {
        value.to_string()
    } else {
        format_base64_image(value)
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
