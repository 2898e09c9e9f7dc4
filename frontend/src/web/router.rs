//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 路由解析与守卫判断交给核心库的 `NavigationGuard`，这里只负责
//! "监听 -> 验证 -> 处理 -> 加载" 流程中与浏览器打交道的部分。

use leptos::prelude::*;
use rencontre::{LOGIN_PATH, NOT_FOUND, Navigation, RouteDescriptor, RouteParams, View};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use crate::auth::{AuthContext, use_auth};

/// 重定向链的最大长度（旧路径 -> 锚点 -> 登录页）
const MAX_REDIRECTS: u8 = 3;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
}

fn write_history(path: &str, mode: HistoryMode) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = match mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(path)),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(path)),
    };
    if let Err(e) = result {
        warn!(path, error = ?e, "history update failed");
    }
}

/// 跳到落地页上的锚点（`/#apropos` 等）
fn scroll_to_anchor(path: &str) {
    let Some((_, anchor)) = path.split_once('#') else {
        return;
    };
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(anchor));
    if let Some(element) = element {
        element.scroll_into_view();
    }
}

/// 当前渲染的路由
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRoute {
    pub route: RouteDescriptor,
    pub params: RouteParams,
}

impl CurrentRoute {
    pub fn param(&self, name: &str) -> Option<String> {
        self.params.get(name).map(str::to_string)
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    current: RwSignal<CurrentRoute>,
    auth: AuthContext,
}

impl RouterService {
    fn new(auth: AuthContext) -> Self {
        let router = Self {
            current: RwSignal::new(CurrentRoute {
                route: NOT_FOUND,
                params: RouteParams::default(),
            }),
            auth,
        };
        // 初始路由同样经过守卫
        router.load(&current_path(), HistoryMode::Replace, MAX_REDIRECTS);
        router
    }

    /// 获取当前路由信号
    pub fn current(&self) -> Signal<CurrentRoute> {
        self.current.into()
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.load(path, HistoryMode::Push, MAX_REDIRECTS);
    }

    fn load(&self, path: &str, mode: HistoryMode, hops: u8) {
        match self.auth.navigate(path) {
            Navigation::Render { route, params } => {
                debug!(path, route = route.name, "render");
                write_history(path, mode);
                self.current.set(CurrentRoute { route, params });
                scroll_to_anchor(path);
            }
            Navigation::Redirect(to) if hops > 0 => {
                info!(from = path, to = %to, "redirect");
                // 被拒绝的路径不留在历史记录中
                self.load(&to, mode, hops - 1);
            }
            Navigation::Redirect(to) => {
                warn!(from = path, to = %to, "redirect loop, giving up");
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            router.load(&current_path(), HistoryMode::Replace, MAX_REDIRECTS);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;
        let is_logged_in = self.auth.is_logged_in();

        Effect::new(move |_| {
            let logged_in = is_logged_in.get();
            let current = router.current.get_untracked().route;

            if logged_in && matches!(current.view, View::Login | View::Register) {
                info!("logged in, leaving the login page");
                router.navigate("/");
            } else if !logged_in && !current.is_public {
                info!(path = current.path, "logged out on a protected page");
                router.navigate(LOGIN_PATH);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router() -> RouterService {
    let router = RouterService::new(use_auth());

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 `AuthContext` 之后使用。
#[component]
pub fn Router(children: Children) -> impl IntoView {
    provide_router();

    children()
}

/// 路由出口组件
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(CurrentRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.current().get())
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
