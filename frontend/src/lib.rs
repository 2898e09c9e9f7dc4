//! Rencontre 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `auth`: 会话、API 客户端与守卫（来自核心库）的响应式包装
//! - `web::router`: 路由服务（History API）
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod event_detail;
    pub mod events;
    pub mod feedback;
    pub mod landing;
    pub mod login;
    pub mod nav;
    pub mod profile;
    pub mod publications;
    pub mod register;
}
mod messages;

use crate::auth::AuthContext;
use crate::components::event_detail::EventDetailPage;
use crate::components::events::EventsPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::nav::NavBar;
use crate::components::profile::ProfilePage;
use crate::components::publications::PublicationsPage;
use crate::components::register::RegisterPage;

use leptos::prelude::*;
use rencontre::View;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod console;
    mod http;
    pub mod router;
    mod storage;

    pub use console::init_logging;
    pub use http::FetchHttpClient;
    pub use storage::BrowserStorage;
}

pub use web::init_logging;

use web::router::{CurrentRoute, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据当前路由的视图标识返回对应的组件。
fn route_matcher(current: CurrentRoute) -> AnyView {
    match current.route.view {
        View::Landing => view! { <LandingPage /> }.into_any(),
        View::Login => view! { <LoginPage /> }.into_any(),
        View::Register => view! { <RegisterPage /> }.into_any(),
        View::Events => view! { <EventsPage /> }.into_any(),
        View::EventDetail => match current.param("id").and_then(|id| id.parse::<i64>().ok()) {
            Some(id) => view! { <EventDetailPage id=id /> }.into_any(),
            None => not_found(),
        },
        View::Publications => view! { <PublicationsPage /> }.into_any(),
        View::Profile => view! { <ProfilePage /> }.into_any(),
        View::Shop => view! {
            <div class="hero min-h-[60vh]">
                <div class="hero-content text-center">
                    <div>
                        <h1 class="text-4xl font-bold">"Boutique"</h1>
                        <p class="py-4 text-base-content/70">"Bientôt disponible."</p>
                    </div>
                </div>
            </div>
        }
        .into_any(),
        View::NotFound => not_found(),
    }
}

fn not_found() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page introuvable"</p>
            </div>
        </div>
    }
    .into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（会话从 localStorage 恢复）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 已登录时预先加载头像
    leptos::task::spawn_local(async move { auth_ctx.load_profile_photo().await });

    view! {
        // 3. 路由器组件：守卫通过 AuthContext 获取会话
        <Router>
            <NavBar />
            <main class="container mx-auto px-4 py-6">
                <RouterOutlet matcher=route_matcher />
            </main>
        </Router>
    }
}
