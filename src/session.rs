//! 会话存储
//!
//! "当前是否有人登录、以什么角色登录"的唯一来源。
//! 所有修改立即写入持久化存储（键 `access_token` / `role`），页面刷新后可以
//! 从存储中恢复会话而不必重新登录。

use std::fmt::{self, Display};
use std::str::FromStr;

use rencontre_shared::{STORAGE_ROLE_KEY, STORAGE_TOKEN_KEY};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::token::TokenClaims;

/// 封闭的角色集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    SuperAdmin,
    DeletedUser,
    SuspendedUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::SuperAdmin => "super_admin",
            Role::DeletedUser => "deleted_user",
            Role::SuspendedUser => "suspended_user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "super_admin" => Ok(Role::SuperAdmin),
            "deleted_user" => Ok(Role::DeletedUser),
            "suspended_user" => Ok(Role::SuspendedUser),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 常用角色组合
pub mod roles {
    use super::Role;

    pub const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];
    pub const USER_OR_DELETED: &[Role] = &[Role::User, Role::DeletedUser];
    pub const USER_OR_SUSPENDED: &[Role] = &[Role::User, Role::SuspendedUser];
}

/// 会话
///
/// 显式对象，通过 `Rc<Session<_>>` 传给导航守卫和 API 客户端。
pub struct Session<S> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 写入新会话，覆盖旧值
    ///
    /// `role` 为 `None` 时删除旧角色，避免新令牌沿用上一个用户的角色。
    pub fn set_session(&self, token: &str, role: Option<Role>) {
        self.store.set(STORAGE_TOKEN_KEY, token);
        match role {
            Some(role) => {
                self.store.set(STORAGE_ROLE_KEY, role.as_str());
            }
            None => {
                self.store.delete(STORAGE_ROLE_KEY);
            }
        }
        debug!(role = role.map(|r| r.as_str()), "session stored");
    }

    pub fn clear_session(&self) {
        self.store.delete(STORAGE_TOKEN_KEY);
        self.store.delete(STORAGE_ROLE_KEY);
        debug!("session cleared");
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(STORAGE_TOKEN_KEY)
    }

    /// 读取存储的角色（不检查令牌）
    ///
    /// 无法识别的角色字符串视为不存在。
    pub fn role(&self) -> Option<Role> {
        let raw = self.store.get(STORAGE_ROLE_KEY)?;
        match raw.parse() {
            Ok(role) => Some(role),
            Err(e) => {
                warn!(error = %e, "ignoring stored role");
                None
            }
        }
    }

    /// 只检查令牌是否存在，不检查角色与有效期
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// 存储的角色是否属于 `candidates`
    ///
    /// 没有令牌时角色不可信，一律返回 `false`。
    pub fn has_role(&self, candidates: &[Role]) -> bool {
        if !self.is_logged_in() {
            return false;
        }
        self.role().is_some_and(|role| candidates.contains(&role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&[Role::Admin])
    }

    pub fn is_user(&self) -> bool {
        self.has_role(&[Role::User])
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(&[Role::SuperAdmin])
    }

    pub fn is_deleted_user(&self) -> bool {
        self.has_role(&[Role::DeletedUser])
    }

    pub fn is_suspended_user(&self) -> bool {
        self.has_role(&[Role::SuspendedUser])
    }

    pub fn is_user_or_admin(&self) -> bool {
        self.has_role(roles::USER_OR_ADMIN)
    }

    pub fn is_user_or_deleted(&self) -> bool {
        self.has_role(roles::USER_OR_DELETED)
    }

    pub fn is_user_or_suspended(&self) -> bool {
        self.has_role(roles::USER_OR_SUSPENDED)
    }

    /// 解码当前令牌的载荷
    pub fn claims(&self) -> Option<TokenClaims> {
        TokenClaims::decode(&self.token()?)
    }

    pub fn current_user_id(&self) -> Option<i64> {
        self.claims()?.user_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::token::unsigned_jwt;
    use serde_json::json;

    const ALL_ROLES: [Role; 5] = [
        Role::Admin,
        Role::User,
        Role::SuperAdmin,
        Role::DeletedUser,
        Role::SuspendedUser,
    ];

    fn session() -> Session<MemoryStore> {
        Session::new(MemoryStore::new())
    }

    #[test]
    fn test_role_string_roundtrip() {
        for role in ALL_ROLES {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("moderator".parse::<Role>().is_err());
    }

    #[test]
    fn test_has_role_is_set_membership() {
        let s = session();
        let sets: [&[Role]; 5] = [
            &[],
            &[Role::Admin],
            roles::USER_OR_ADMIN,
            roles::USER_OR_DELETED,
            &ALL_ROLES,
        ];
        for stored in ALL_ROLES {
            s.set_session("tok", Some(stored));
            for set in sets {
                assert_eq!(s.has_role(set), set.contains(&stored), "{stored} in {set:?}");
            }
        }
    }

    #[test]
    fn test_has_role_false_without_session() {
        let s = session();
        assert!(!s.has_role(&ALL_ROLES));

        // 角色残留但令牌缺失：不可信
        s.store().set(STORAGE_ROLE_KEY, "admin");
        assert_eq!(s.role(), Some(Role::Admin));
        assert!(!s.is_admin());
    }

    #[test]
    fn test_login_state_lifecycle() {
        let s = session();
        assert!(!s.is_logged_in());

        s.set_session("tok", Some(Role::User));
        assert!(s.is_logged_in());
        assert!(s.is_user_or_suspended());
        assert!(!s.is_super_admin());

        s.clear_session();
        assert!(!s.is_logged_in());
        assert_eq!(s.token(), None);
        assert_eq!(s.role(), None);
    }

    #[test]
    fn test_set_session_overwrites_previous_role() {
        let s = session();
        s.set_session("first", Some(Role::Admin));
        s.set_session("second", None);
        assert_eq!(s.token().as_deref(), Some("second"));
        assert_eq!(s.role(), None);
    }

    #[test]
    fn test_session_survives_reload() {
        let store = std::rc::Rc::new(MemoryStore::new());
        Session::new(store.clone()).set_session("tok", Some(Role::DeletedUser));

        let reloaded = Session::new(store);
        assert!(reloaded.is_logged_in());
        assert!(reloaded.is_user_or_deleted());
    }

    #[test]
    fn test_unknown_stored_role_is_absent() {
        let s = session();
        s.set_session("tok", None);
        s.store().set(STORAGE_ROLE_KEY, "moderator");
        assert_eq!(s.role(), None);
        assert!(!s.has_role(&ALL_ROLES));
    }

    #[test]
    fn test_current_user_id_from_token() {
        let s = session();
        assert_eq!(s.current_user_id(), None);
        s.set_session(&unsigned_jwt(json!({"id": 12})), Some(Role::User));
        assert_eq!(s.current_user_id(), Some(12));
        s.set_session("opaque", Some(Role::User));
        assert_eq!(s.current_user_id(), None);
    }
}
