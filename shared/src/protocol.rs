//! 远端 API 协议描述
//!
//! 每个后端操作都是一个固定的 `{动词, 路径模板, 是否需要认证}` 三元组，
//! 外加它所属的服务域（每个服务域有独立的 base URL）。
//! 路径模板中的 `{}` 按位置依次替换为路径参数。

use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 服务域：远端 API 按功能拆分到多个独立部署的地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceArea {
    /// 认证、用户与用户资料
    Auth,
    About,
    Publications,
    Charter,
    Events,
    Comments,
    Reactions,
    Follows,
}

impl ServiceArea {
    pub const ALL: [ServiceArea; 8] = [
        ServiceArea::Auth,
        ServiceArea::About,
        ServiceArea::Publications,
        ServiceArea::Charter,
        ServiceArea::Events,
        ServiceArea::Comments,
        ServiceArea::Reactions,
        ServiceArea::Follows,
    ];
}

/// 单个后端操作的静态描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub area: ServiceArea,
    pub method: HttpMethod,
    pub path: &'static str,
    pub auth: bool,
}

impl Endpoint {
    const fn new(area: ServiceArea, method: HttpMethod, path: &'static str, auth: bool) -> Self {
        Self {
            area,
            method,
            path,
            auth,
        }
    }

    /// 路径模板中的占位符数量
    pub fn param_count(&self) -> usize {
        self.path.matches("{}").count()
    }
}

// =========================================================
// 操作目录 (Endpoint Catalog)
// =========================================================

pub mod endpoints {
    use super::Endpoint;
    use super::HttpMethod::{Delete, Get, Patch, Post, Put};
    use super::ServiceArea::*;

    // --- 认证 ---
    pub const REGISTER: Endpoint = Endpoint::new(Auth, Post, "/auth/register", false);
    pub const VERIFY_ACCOUNT: Endpoint = Endpoint::new(Auth, Post, "/auth/verify", false);
    pub const LOGIN_WITH_EMAIL: Endpoint =
        Endpoint::new(Auth, Post, "/auth/login_with_email", false);
    pub const LOGIN_WITH_USERNAME: Endpoint =
        Endpoint::new(Auth, Post, "/auth/login_with_username", false);

    // --- 用户 ---
    pub const CURRENT_USER: Endpoint = Endpoint::new(Auth, Get, "/user/current_user", true);
    pub const CHANGE_PASSWORD: Endpoint =
        Endpoint::new(Auth, Put, "/user/reset_password_in_app", true);
    pub const RESET_PASSWORD: Endpoint = Endpoint::new(Auth, Put, "/user/reset_password", true);

    // --- 用户资料 ---
    pub const UPDATE_USER_INFOS: Endpoint =
        Endpoint::new(Auth, Patch, "/user_infos/photo_profil", true);
    pub const UPDATE_PROFILE_PHOTO: Endpoint =
        Endpoint::new(Auth, Put, "/user_infos/update_photo_profil", true);
    pub const DELETE_PROFILE_PHOTO: Endpoint =
        Endpoint::new(Auth, Delete, "/user_infos/delete_photo_profil", true);
    pub const PROFILE_PHOTO: Endpoint = Endpoint::new(Auth, Get, "/user_infos/photo_profil", true);
    pub const PROFILE_PHOTO_BY_ID: Endpoint =
        Endpoint::new(Auth, Get, "/user_infos/photo_profil/{}", true);
    pub const SEARCH_USERS: Endpoint =
        Endpoint::new(Auth, Post, "/user_infos/recherche_par_email_ou_id", true);
    pub const LIST_USERS_BY_ID_AND_MAIL: Endpoint =
        Endpoint::new(Auth, Post, "/user_infos/list-by-id-and-mail", true);
    pub const LIST_USERS_BY_ID_MAIL_USERNAME: Endpoint =
        Endpoint::new(Auth, Post, "/user_infos/list-by-id-mail-username", true);

    // --- 关于我们 / 章程 ---
    pub const ABOUT_ACTIVE: Endpoint = Endpoint::new(About, Get, "/about_us/actif", true);
    pub const CHARTER: Endpoint = Endpoint::new(Charter, Get, "/notre_charte/notre_charte", true);

    // --- 活动 ---
    pub const ALLOWED_EVENTS: Endpoint =
        Endpoint::new(Events, Get, "/Event_public/get_all_allawed_event", false);
    pub const RECENT_EVENTS: Endpoint =
        Endpoint::new(Events, Get, "/Event_public/get_all_event_by_recent", true);
    pub const EVENT_IMAGES: Endpoint =
        Endpoint::new(Events, Get, "/Event_public/get_all_event_images", true);
    pub const EVENT_BY_ID: Endpoint =
        Endpoint::new(Events, Get, "/Event_public/get_event_by_id/{}", true);
    pub const SEARCH_EVENTS: Endpoint =
        Endpoint::new(Events, Get, "/Event_public/recherche/", true);
    pub const EVENTS_BY_CATEGORY: Endpoint =
        Endpoint::new(Events, Get, "/Event_public/get_event_by_categorie/{}", true);
    pub const EVENT_IMAGE: Endpoint =
        Endpoint::new(Events, Get, "/Event_public/get_event_image/{}", true);

    // --- 用户动态 ---
    pub const PUBLICATIONS: Endpoint = Endpoint::new(
        Publications,
        Get,
        "/publication_utilisateur/publications/",
        true,
    );
    pub const CREATE_PUBLICATION: Endpoint = Endpoint::new(
        Publications,
        Post,
        "/publication_utilisateur/publications/",
        true,
    );
    pub const MY_PUBLICATIONS: Endpoint = Endpoint::new(
        Publications,
        Get,
        "/publication_utilisateur/publications/mes/",
        true,
    );
    pub const PUBLICATION_BY_ID: Endpoint = Endpoint::new(
        Publications,
        Get,
        "/publication_utilisateur/publications/{}",
        true,
    );
    pub const UPDATE_PUBLICATION: Endpoint = Endpoint::new(
        Publications,
        Put,
        "/publication_utilisateur/publications/{}",
        true,
    );
    pub const DELETE_PUBLICATION: Endpoint = Endpoint::new(
        Publications,
        Delete,
        "/publication_utilisateur/publications/{}",
        true,
    );
    pub const PUBLICATION_IMAGES: Endpoint = Endpoint::new(
        Publications,
        Get,
        "/publication_utilisateur/publications/images/",
        true,
    );
    pub const PUBLICATION_IMAGE: Endpoint = Endpoint::new(
        Publications,
        Get,
        "/publication_utilisateur/publications/{}/image",
        true,
    );

    // --- 评论 ---
    pub const COMMENT_PUBLICATION: Endpoint =
        Endpoint::new(Comments, Post, "/commentaire/create_comment_for_pub", true);
    pub const COMMENT_EVENT: Endpoint =
        Endpoint::new(Comments, Post, "/commentaire/create_comment_for_event", true);
    pub const COMMENT_PRODUCT: Endpoint =
        Endpoint::new(Comments, Post, "/commentaire/create_comment_for_product", true);
    pub const COMMENT_BY_ID: Endpoint = Endpoint::new(Comments, Get, "/commentaire/comment/{}", true);
    pub const UPDATE_COMMENT: Endpoint =
        Endpoint::new(Comments, Put, "/commentaire/update_comment/{}", true);
    pub const DELETE_COMMENT: Endpoint =
        Endpoint::new(Comments, Delete, "/commentaire/delete_comment/{}", true);
    pub const COMMENTS_BY_PUBLICATION: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/comments_by_publication/{}", true);
    pub const COMMENTS_BY_EVENT: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/comments_by_evenement/{}", true);
    pub const COMMENTS_BY_PRODUCT: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/comments_by_product/{}", true);
    pub const MY_COMMENT_COUNT: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/my_comments_count", true);
    pub const COMMENT_COUNT_BY_EVENT: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/commens_count_by_event/{}", true);
    pub const COMMENT_COUNT_BY_PUBLICATION: Endpoint = Endpoint::new(
        Comments,
        Get,
        "/commentaire/commens_count_by_publication/{}",
        true,
    );
    pub const COMMENT_COUNT_BY_PRODUCT: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/commens_count_by_product/{}", true);

    // --- 评论管理 ---
    pub const ADMIN_COMMENTS_BY_USER: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/admin/commens_by_user/{}", true);
    pub const ADMIN_COMMENTS_BY_PUBLICATION: Endpoint = Endpoint::new(
        Comments,
        Get,
        "/commentaire/admin/commens_by_publication/{}",
        true,
    );
    pub const ADMIN_COMMENTS_BY_EVENT: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/admin/commens_by_event/{}", true);
    pub const ADMIN_COMMENTS_BY_PRODUCT: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/admin/commens_by_product/{}", true);
    pub const ADMIN_ALL_COMMENTS: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/admin/all_comments", true);
    pub const ADMIN_VALIDATE_COMMENT: Endpoint =
        Endpoint::new(Comments, Put, "/commentaire/admin/valide_comment/{}", true);
    pub const ADMIN_DELETE_COMMENT: Endpoint =
        Endpoint::new(Comments, Delete, "/commentaire/admin/delete_comment/{}", true);
    pub const ADMIN_COMMENT_STATISTICS: Endpoint =
        Endpoint::new(Comments, Get, "/commentaire/admin/statistiques", true);

    // --- 表态 ---
    pub const REACT_PUBLICATION: Endpoint =
        Endpoint::new(Reactions, Post, "/reaction/react_for_pub", true);
    pub const REACT_COMMENT: Endpoint =
        Endpoint::new(Reactions, Post, "/reaction/react_for_comment", true);
    pub const REACT_EVENT: Endpoint =
        Endpoint::new(Reactions, Post, "/reaction/react_for_event", true);
    pub const REACT_PRODUCT: Endpoint =
        Endpoint::new(Reactions, Post, "/reaction/react_for_product", true);
    pub const UPDATE_REACTION: Endpoint =
        Endpoint::new(Reactions, Put, "/reaction/update_reaction/{}", true);
    pub const DELETE_REACTION: Endpoint =
        Endpoint::new(Reactions, Delete, "/reaction/delete_reaction/{}", true);
    pub const MY_REACTION_COUNT: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_user_reactions", true);
    pub const REACTIONS_BY_TYPE_PUBLICATION: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_reactions_by_type/{}", true);
    pub const REACTIONS_TOTAL_PUBLICATION: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_total_reactions/{}", true);
    pub const REACTIONS_BY_TYPE_EVENT: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_reactions_by_type_event/{}", true);
    pub const REACTIONS_TOTAL_EVENT: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_total_reactions_event/{}", true);
    pub const REACTIONS_BY_TYPE_PRODUCT: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_reactions_by_type_product/{}", true);
    pub const REACTIONS_TOTAL_PRODUCT: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_total_reactions_product/{}", true);
    pub const REACTIONS_BY_TYPE_COMMENT: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_reactions_by_type_comment/{}", true);
    pub const REACTIONS_TOTAL_COMMENT: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/count_total_reactions_comment/{}", true);
    pub const REACTIONS_BY_TYPE_REPLY: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/count_reactions_by_type_response_commentaire/{}",
        true,
    );
    pub const REACTIONS_TOTAL_REPLY: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/count_total_reactions_response_commentaire/{}",
        true,
    );

    // --- 表态统计 (管理) ---
    pub const ADMIN_USER_REACTIONS: Endpoint =
        Endpoint::new(Reactions, Get, "/reaction/admin/count_total_reactions_user/{}", true);
    pub const ADMIN_USER_EVENT_REACTIONS: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/admin/count_total_reactions_user_event/{}",
        true,
    );
    pub const ADMIN_USER_PRODUCT_REACTIONS: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/admin/count_total_reactions_user_product/{}",
        true,
    );
    pub const ADMIN_USER_PUBLICATION_REACTIONS: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/admin/count_total_reactions_user_publication/{}",
        true,
    );
    pub const ADMIN_USER_COMMENT_REACTIONS: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/admin/count_total_reactions_user_comment/{}",
        true,
    );
    pub const ADMIN_USER_REPLY_REACTIONS: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/admin/count_total_reactions_user_response_commentaire/{}",
        true,
    );
    pub const ADMIN_USER_REACTIONS_BY_TYPE: Endpoint = Endpoint::new(
        Reactions,
        Get,
        "/reaction/admin/count_total_reactions_user_by_type/{}",
        true,
    );

    // --- 关注 ---
    pub const FOLLOW: Endpoint = Endpoint::new(Follows, Post, "/follow/follow_user", true);
    pub const UNFOLLOW: Endpoint = Endpoint::new(Follows, Delete, "/follow/unfollow/{}", true);
    pub const FOLLOWERS: Endpoint = Endpoint::new(Follows, Get, "/follow/followers/{}", true);
    pub const FOLLOWING: Endpoint = Endpoint::new(Follows, Get, "/follow/following/{}", true);
    pub const FOLLOWER_COUNT: Endpoint =
        Endpoint::new(Follows, Get, "/follow/count_followers/{}", true);
    pub const FOLLOWING_COUNT: Endpoint =
        Endpoint::new(Follows, Get, "/follow/count_following/{}", true);
}
