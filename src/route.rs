//! 路由表 - 领域模型
//!
//! 纯粹的路由定义，不依赖 DOM。
//! 每条路由是 `{ path, view, is_public }`，启动时定义，之后不可变。
//! 路径段以 `:` 开头表示参数，例如 `/EventDetail/:id`。

/// 视图标识，由前端映射到具体组件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Landing,
    Login,
    Register,
    Shop,
    Events,
    EventDetail,
    Publications,
    Profile,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub is_public: bool,
}

impl RouteDescriptor {
    pub const fn public(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view,
            is_public: true,
        }
    }

    pub const fn protected(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view,
            is_public: false,
        }
    }

    /// 按位置填充路径参数，参数不足时返回 `None`
    pub fn href(&self, params: &[&str]) -> Option<String> {
        let mut params = params.iter();
        let mut out = String::new();
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            out.push('/');
            if segment.starts_with(':') {
                out.push_str(&urlencoding::encode(params.next()?));
            } else {
                out.push_str(segment);
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Some(out)
    }

    /// 匹配路径，成功时返回捕获的参数
    fn matches(&self, path: &str) -> Option<RouteParams> {
        let pattern: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = RouteParams::default();
        for (p, a) in pattern.iter().zip(actual.iter()) {
            if let Some(name) = p.strip_prefix(':') {
                let value = urlencoding::decode(a).map(|v| v.into_owned()).ok()?;
                params.0.push((name, value));
            } else if p != a {
                return None;
            }
        }
        Some(params)
    }
}

/// 捕获的路径参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(&'static str, String)>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEntry {
    Page(RouteDescriptor),
    /// 旧路径重定向到落地页上的锚点
    Redirect {
        from: &'static str,
        to: &'static str,
    },
}

/// 路径解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Page {
        route: RouteDescriptor,
        params: RouteParams,
    },
    Redirect(&'static str),
}

pub const LOGIN_PATH: &str = "/login";

/// 未匹配任何路由时使用
pub const NOT_FOUND: RouteDescriptor = RouteDescriptor::public("/404", "not-found", View::NotFound);

const ROUTES: &[RouteEntry] = &[
    RouteEntry::Page(RouteDescriptor::public("/", "landing", View::Landing)),
    RouteEntry::Redirect {
        from: "/apropos",
        to: "/#apropos",
    },
    RouteEntry::Redirect {
        from: "/charte",
        to: "/#chartes",
    },
    RouteEntry::Redirect {
        from: "/contact",
        to: "/#contacts",
    },
    RouteEntry::Redirect {
        from: "/home",
        to: "/#home",
    },
    RouteEntry::Page(RouteDescriptor::public(LOGIN_PATH, "connexion", View::Login)),
    RouteEntry::Page(RouteDescriptor::public("/register", "register", View::Register)),
    RouteEntry::Page(RouteDescriptor::public("/boutique", "boutique", View::Shop)),
    RouteEntry::Page(RouteDescriptor::public("/evenement", "evenement", View::Events)),
    RouteEntry::Page(RouteDescriptor::public(
        "/EventDetail/:id",
        "event-detail",
        View::EventDetail,
    )),
    RouteEntry::Page(RouteDescriptor::public(
        "/publication",
        "publication",
        View::Publications,
    )),
    RouteEntry::Page(RouteDescriptor::protected("/profil", "profil", View::Profile)),
];

/// 静态路由表，按声明顺序匹配，先匹配者胜出
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(ROUTES.to_vec())
    }
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// 解析路径（忽略查询串与锚点），未知路径解析为 404 页面
    pub fn resolve(&self, path: &str) -> Resolution {
        let path = strip_suffixes(path);

        for entry in &self.entries {
            match entry {
                RouteEntry::Redirect { from, to } if path_eq(from, path) => {
                    return Resolution::Redirect(*to);
                }
                RouteEntry::Page(route) => {
                    if let Some(params) = route.matches(path) {
                        return Resolution::Page {
                            route: *route,
                            params,
                        };
                    }
                }
                _ => {}
            }
        }

        Resolution::Page {
            route: NOT_FOUND,
            params: RouteParams::default(),
        }
    }

    /// 视图对应的路由
    pub fn route_for(&self, view: View) -> Option<&RouteDescriptor> {
        self.entries.iter().find_map(|entry| match entry {
            RouteEntry::Page(route) if route.view == view => Some(route),
            _ => None,
        })
    }

    /// 生成指向某个视图的链接
    pub fn link(&self, view: View, params: &[&str]) -> Option<String> {
        self.route_for(view)?.href(params)
    }
}

fn strip_suffixes(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn path_eq(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
