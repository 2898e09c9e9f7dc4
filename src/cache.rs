//! 远端数据缓存字段
//!
//! 视图层状态容器的通用实现：保存最近一次获取的值，失败时记录日志并退回到
//! 安全默认值，错误从不抛给视图，但通过 [`FetchOutcome`] 可以检查。
//!
//! 单线程模型：两次重叠的刷新按完成顺序写入，后完成者覆盖先完成者；
//! 没有取消，被取代的请求完成后依然会写入结果。

use std::cell::{Cell, RefCell};
use std::future::Future;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::{debug, error};

use crate::error::{ApiError, ApiResult};

type Fetcher<T> = Box<dyn Fn() -> LocalBoxFuture<'static, ApiResult<T>>>;
type Subscriber<T> = Box<dyn Fn(&T)>;

/// 获取失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// 写入默认值
    #[default]
    UseFallback,
    /// 保留上一次的值
    KeepPrevious,
}

/// 一次刷新的结果
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// 成功获取到新值
    Fresh(T),
    /// 获取失败，字段中现在是默认值（或保留的旧值）
    Fallback { value: T, error: ApiError },
    /// 已加载过，未发起请求
    Cached(T),
}

impl<T> FetchOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            FetchOutcome::Fresh(v) | FetchOutcome::Cached(v) => v,
            FetchOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            FetchOutcome::Fresh(v) | FetchOutcome::Cached(v) => v,
            FetchOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            FetchOutcome::Fallback { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, FetchOutcome::Fresh(_))
    }
}

/// 由远端数据支撑的可观察字段
pub struct Remote<T> {
    name: &'static str,
    value: RefCell<T>,
    fallback: T,
    on_error: OnError,
    fetcher: Fetcher<T>,
    /// 一旦置位不会自动失效，只能 `reset` 或刷新页面
    loaded: Cell<bool>,
    last_error: RefCell<Option<ApiError>>,
    subscribers: RefCell<Vec<Subscriber<T>>>,
}

impl<T: Clone + 'static> Remote<T> {
    pub fn new<F, Fut>(name: &'static str, fallback: T, fetch: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ApiResult<T>> + 'static,
    {
        Self {
            name,
            value: RefCell::new(fallback.clone()),
            fallback,
            on_error: OnError::default(),
            fetcher: Box::new(move || fetch().boxed_local()),
            loaded: Cell::new(false),
            last_error: RefCell::new(None),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    pub fn on_error(mut self, policy: OnError) -> Self {
        self.on_error = policy;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.last_error.borrow().clone()
    }

    /// 注册变更回调（例如桥接到前端的响应式信号）
    ///
    /// 回调中不能再调用本字段的 `subscribe`。
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(f));
    }

    /// 本地写入（例如乐观更新），并通知订阅者
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    fn notify(&self) {
        // 先复制一份，回调里可以再调用 `set`
        let value = self.get();
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(&value);
        }
    }

    /// 无条件重新获取
    pub async fn refresh(&self) -> FetchOutcome<T> {
        let result = (self.fetcher)().await;

        let outcome = match result {
            Ok(value) => {
                self.last_error.replace(None);
                FetchOutcome::Fresh(value)
            }
            Err(error) => {
                error!(store = self.name, error = %error, "fetch failed, using fallback");
                self.last_error.replace(Some(error.clone()));
                let value = match self.on_error {
                    OnError::UseFallback => self.fallback.clone(),
                    OnError::KeepPrevious => self.get(),
                };
                FetchOutcome::Fallback { value, error }
            }
        };

        // 失败也算加载过，避免下一次访问时无限重试
        self.loaded.set(true);
        self.set(outcome.value().clone());
        outcome
    }

    /// 仅在尚未加载时获取
    pub async fn load_once(&self) -> FetchOutcome<T> {
        if self.loaded.get() {
            debug!(store = self.name, "already loaded, skipping fetch");
            return FetchOutcome::Cached(self.get());
        }
        self.refresh().await
    }

    /// 清除已加载标记并恢复默认值
    pub fn reset(&self) {
        self.loaded.set(false);
        self.last_error.replace(None);
        self.set(self.fallback.clone());
    }
}
