//! 导航守卫
//!
//! 每次路由切换都经过这里：公开路由放行，受保护路由要求已登录，
//! 否则重定向到 `/login`（登录页本身是公开的，不会形成循环）。

use std::rc::Rc;

use tracing::{debug, info};

use crate::route::{LOGIN_PATH, Resolution, RouteDescriptor, RouteParams, RouteTable};
use crate::session::Session;
use crate::storage::KeyValueStore;

/// 守卫的严格程度
///
/// 默认只检查令牌是否存在：过期或已被服务端吊销的令牌依然能通过，
/// 之后的 API 调用会以普通 HTTP 错误的形式失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardPolicy {
    #[default]
    TokenPresence,
    /// 额外解码令牌的 `exp`，已过期则拒绝；无法解码的不透明令牌照常放行
    UnexpiredToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(String),
}

/// 一次导航的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render {
        route: RouteDescriptor,
        params: RouteParams,
    },
    Redirect(String),
}

pub struct NavigationGuard<S> {
    session: Rc<Session<S>>,
    policy: GuardPolicy,
    clock: Box<dyn Fn() -> i64>,
}

impl<S: KeyValueStore> NavigationGuard<S> {
    pub fn new(session: Rc<Session<S>>) -> Self {
        Self::with_policy(session, GuardPolicy::default())
    }

    pub fn with_policy(session: Rc<Session<S>>, policy: GuardPolicy) -> Self {
        Self {
            session,
            policy,
            clock: Box::new(|| chrono::Utc::now().timestamp()),
        }
    }

    /// 替换时钟（Unix 秒），用于测试过期策略
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    fn session_valid(&self) -> bool {
        if !self.session.is_logged_in() {
            return false;
        }
        match self.policy {
            GuardPolicy::TokenPresence => true,
            GuardPolicy::UnexpiredToken => self
                .session
                .claims()
                .is_none_or(|claims| !claims.is_expired((self.clock)())),
        }
    }

    /// 对单个路由做出放行/重定向决定
    pub fn decide(&self, target: &RouteDescriptor) -> NavigationDecision {
        if target.is_public || self.session_valid() {
            NavigationDecision::Allow
        } else {
            info!(path = target.path, "access denied, redirecting to login");
            NavigationDecision::Redirect(LOGIN_PATH.to_string())
        }
    }

    /// 解析路径并应用守卫
    pub fn navigate(&self, table: &RouteTable, path: &str) -> Navigation {
        match table.resolve(path) {
            Resolution::Redirect(to) => {
                debug!(from = path, to, "route redirect");
                Navigation::Redirect(to.to_string())
            }
            Resolution::Page { route, params } => match self.decide(&route) {
                NavigationDecision::Allow => Navigation::Render { route, params },
                NavigationDecision::Redirect(to) => Navigation::Redirect(to),
            },
        }
    }
}
