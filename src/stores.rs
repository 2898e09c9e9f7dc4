//! 视图层的状态容器
//!
//! 每个容器包装一个或多个 [`Remote`] 字段。读取失败在这里被吸收（记录日志、
//! 写入默认值），写操作（表态、评论、关注）的错误则返回给调用方。

use std::collections::HashMap;
use std::rc::Rc;

use rencontre_shared::{
    CommentTarget, CurrentUser, DEFAULT_PROFILE_IMAGE, ReactionKind, ReactionTarget,
};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cache::{FetchOutcome, OnError, Remote};
use crate::error::{ApiResult, PreconditionError};
use crate::request::HttpClient;
use crate::storage::KeyValueStore;

#[cfg(test)]
mod tests;

// =========================================================
// 头像
// =========================================================

/// 当前用户头像，整个会话期间只加载一次
pub struct ProfilePhotoStore {
    photo: Remote<String>,
}

impl ProfilePhotoStore {
    pub fn new<C, S>(api: Rc<ApiClient<C, S>>) -> Self
    where
        C: HttpClient + 'static,
        S: KeyValueStore + 'static,
    {
        let photo = Remote::new("profile_photo", DEFAULT_PROFILE_IMAGE.to_string(), move || {
            let api = api.clone();
            async move {
                let photo = api.profile_photo().await?;
                Ok(photo
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string()))
            }
        });
        Self { photo }
    }

    /// 已加载时直接返回缓存，不发请求
    pub async fn fetch_photo(&self) -> FetchOutcome<String> {
        self.photo.load_once().await
    }

    pub fn photo(&self) -> String {
        self.photo.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.photo.is_loaded()
    }

    /// 上传新头像或注销后调用
    pub fn reset(&self) {
        self.photo.reset();
    }

    pub fn remote(&self) -> &Remote<String> {
        &self.photo
    }
}

// =========================================================
// 当前用户
// =========================================================

pub struct CurrentUserStore {
    user: Remote<Option<CurrentUser>>,
}

impl CurrentUserStore {
    pub fn new<C, S>(api: Rc<ApiClient<C, S>>) -> Self
    where
        C: HttpClient + 'static,
        S: KeyValueStore + 'static,
    {
        let user = Remote::new("current_user", None, move || {
            let api = api.clone();
            async move { api.current_user().await.map(Some) }
        });
        Self { user }
    }

    pub async fn fetch(&self) -> FetchOutcome<Option<CurrentUser>> {
        self.user.refresh().await
    }

    pub fn user(&self) -> Option<CurrentUser> {
        self.user.get()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.with(|u| u.as_ref().map(|u| u.id))
    }

    pub fn clear(&self) {
        self.user.reset();
    }

    pub fn remote(&self) -> &Remote<Option<CurrentUser>> {
        &self.user
    }
}

// =========================================================
// 表态计数
// =========================================================

/// 一个对象的表态总数与按类型统计
pub struct ReactionCountStore<C, S> {
    api: Rc<ApiClient<C, S>>,
    target: ReactionTarget,
    total: Remote<u64>,
    by_type: Remote<HashMap<String, u64>>,
}

impl<C, S> ReactionCountStore<C, S>
where
    C: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(api: Rc<ApiClient<C, S>>, target: ReactionTarget) -> Self {
        let total = {
            let api = api.clone();
            Remote::new("reaction_total", 0, move || {
                let api = api.clone();
                async move { api.reaction_total(target).await }
            })
        };
        let by_type = {
            let api = api.clone();
            Remote::new("reactions_by_type", HashMap::new(), move || {
                let api = api.clone();
                async move { api.reactions_by_type(target).await }
            })
        };
        Self {
            api,
            target,
            total,
            by_type,
        }
    }

    pub fn target(&self) -> ReactionTarget {
        self.target
    }

    pub async fn fetch(&self) {
        futures::join!(self.total.refresh(), self.by_type.refresh());
    }

    pub fn total(&self) -> u64 {
        self.total.get()
    }

    pub fn count_for(&self, kind: &str) -> u64 {
        self.by_type.with(|m| m.get(kind).copied().unwrap_or(0))
    }

    pub fn by_type(&self) -> HashMap<String, u64> {
        self.by_type.get()
    }

    /// 表态后重新获取计数
    pub async fn react(&self, kind: ReactionKind) -> ApiResult<()> {
        self.api.react(self.target, kind).await?;
        self.fetch().await;
        Ok(())
    }

    pub fn total_remote(&self) -> &Remote<u64> {
        &self.total
    }

    pub fn by_type_remote(&self) -> &Remote<HashMap<String, u64>> {
        &self.by_type
    }
}

// =========================================================
// 评论计数
// =========================================================

pub struct CommentCountStore<C, S> {
    api: Rc<ApiClient<C, S>>,
    target: CommentTarget,
    count: Remote<u64>,
}

impl<C, S> CommentCountStore<C, S>
where
    C: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(api: Rc<ApiClient<C, S>>, target: CommentTarget) -> Self {
        let count = {
            let api = api.clone();
            Remote::new("comment_count", 0, move || {
                let api = api.clone();
                async move { api.comment_count(target).await }
            })
        };
        Self { api, target, count }
    }

    pub async fn fetch(&self) -> FetchOutcome<u64> {
        self.count.refresh().await
    }

    pub fn count(&self) -> u64 {
        self.count.get()
    }

    /// 发表评论后重新获取计数
    pub async fn comment(&self, contenu: &str) -> ApiResult<()> {
        self.api.comment(self.target, contenu).await?;
        self.count.refresh().await;
        Ok(())
    }

    pub fn remote(&self) -> &Remote<u64> {
        &self.count
    }
}

// =========================================================
// 关注
// =========================================================

/// 某个用户主页的关注数据
pub struct FollowStore<C, S> {
    api: Rc<ApiClient<C, S>>,
    user_id: i64,
    followers: Remote<u64>,
    following: Remote<u64>,
}

impl<C, S> FollowStore<C, S>
where
    C: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(api: Rc<ApiClient<C, S>>, user_id: i64) -> Self {
        let followers = {
            let api = api.clone();
            Remote::new("follower_count", 0, move || {
                let api = api.clone();
                async move { api.follower_count(user_id).await }
            })
            .on_error(OnError::KeepPrevious)
        };
        let following = {
            let api = api.clone();
            Remote::new("following_count", 0, move || {
                let api = api.clone();
                async move { api.following_count(user_id).await }
            })
            .on_error(OnError::KeepPrevious)
        };
        Self {
            api,
            user_id,
            followers,
            following,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub async fn fetch_counts(&self) {
        futures::join!(self.followers.refresh(), self.following.refresh());
    }

    pub fn follower_count(&self) -> u64 {
        self.followers.get()
    }

    pub fn following_count(&self) -> u64 {
        self.following.get()
    }

    /// 关注 `id_suivi`
    ///
    /// 无法确定当前用户，或目标就是当前用户时，不发请求直接返回
    /// [`PreconditionError`]。
    pub async fn follow(&self, id_suivi: i64) -> ApiResult<()> {
        let current = self.current_user_id()?;
        if current == id_suivi {
            warn!(user_id = current, "refusing self-follow");
            return Err(PreconditionError::SelfFollow.into());
        }

        self.api.follow(id_suivi).await?;
        info!(follower = current, followed = id_suivi, "followed user");
        self.fetch_counts().await;
        Ok(())
    }

    pub async fn unfollow(&self, id_suivi: i64) -> ApiResult<()> {
        self.current_user_id()?;
        self.api.unfollow(id_suivi).await?;
        info!(followed = id_suivi, "unfollowed user");
        self.fetch_counts().await;
        Ok(())
    }

    fn current_user_id(&self) -> ApiResult<i64> {
        self.api.session().current_user_id().ok_or_else(|| {
            warn!("no current user id in session");
            PreconditionError::MissingCurrentUser.into()
        })
    }

    pub fn followers_remote(&self) -> &Remote<u64> {
        &self.followers
    }

    pub fn following_remote(&self) -> &Remote<u64> {
        &self.following
    }
}
