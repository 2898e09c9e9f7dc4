//! 远端 API 地址配置
//!
//! 每个服务域一个 base URL。未单独配置的服务域回退到主地址
//! (`RENCONTRE_API_URL`)，主地址也缺失时使用本地开发默认值。

use std::collections::HashMap;

use rencontre_shared::protocol::ServiceArea;
use serde::Deserialize;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const MAIN_URL_VAR: &str = "RENCONTRE_API_URL";

/// 服务域对应的配置变量名
pub fn area_var(area: ServiceArea) -> &'static str {
    match area {
        ServiceArea::Auth => MAIN_URL_VAR,
        ServiceArea::About => "RENCONTRE_API_URL_ABOUT",
        ServiceArea::Publications => "RENCONTRE_API_URL_PUBLICATIONS",
        ServiceArea::Charter => "RENCONTRE_API_URL_CHARTER",
        ServiceArea::Events => "RENCONTRE_API_URL_EVENTS",
        ServiceArea::Comments => "RENCONTRE_API_URL_COMMENTS",
        ServiceArea::Reactions => "RENCONTRE_API_URL_REACTIONS",
        ServiceArea::Follows => "RENCONTRE_API_URL_FOLLOWS",
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// 主地址（认证与用户服务）
    base_url: String,
    /// 按服务域覆盖的地址
    #[serde(default)]
    areas: HashMap<ServiceArea, String>,
}

impl ApiConfig {
    /// 所有服务域共用一个地址
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            areas: HashMap::new(),
        }
    }

    pub fn with_area(mut self, area: ServiceArea, url: impl Into<String>) -> Self {
        self.areas.insert(area, normalize(url.into()));
        self
    }

    /// 通过查找函数构建配置（环境变量、编译期常量等）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup(MAIN_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        ServiceArea::ALL
            .into_iter()
            .filter(|area| *area != ServiceArea::Auth)
            .fold(Self::new(base), |config, area| {
                match lookup(area_var(area)).filter(|v| !v.trim().is_empty()) {
                    Some(url) => config.with_area(area, url),
                    None => config,
                }
            })
    }

    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 服务域的 base URL（不带末尾斜杠）
    pub fn base_url(&self, area: ServiceArea) -> &str {
        self.areas
            .get(&area)
            .map(String::as_str)
            .unwrap_or(&self.base_url)
            .trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn normalize(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_areas_fall_back_to_main_url() {
        let config = ApiConfig::from_lookup(|key| match key {
            "RENCONTRE_API_URL" => Some("https://api.example.org/".to_string()),
            "RENCONTRE_API_URL_EVENTS" => Some("https://events.example.org".to_string()),
            "RENCONTRE_API_URL_COMMENTS" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url(ServiceArea::Auth), "https://api.example.org");
        assert_eq!(config.base_url(ServiceArea::Events), "https://events.example.org");
        assert_eq!(config.base_url(ServiceArea::Comments), "https://api.example.org");
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.base_url(ServiceArea::Follows), DEFAULT_API_URL);
    }

    #[test]
    fn test_deserialize() {
        let config: ApiConfig = serde_json::from_str(
            r#"{"base_url": "https://a.org", "areas": {"reactions": "https://r.org/"}}"#,
        )
        .unwrap();
        assert_eq!(config.base_url(ServiceArea::Reactions), "https://r.org");
        assert_eq!(config.base_url(ServiceArea::About), "https://a.org");
    }
}
