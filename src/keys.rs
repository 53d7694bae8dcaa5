//! Cache Key Builders
//!
//! Pure formatters turning request parameters into canonical cache keys.
//! Two semantically identical requests must produce byte-identical keys, or
//! the cache silently holds duplicates; optional parameters therefore render
//! a fixed placeholder (`all`, `none`) when absent.

use std::fmt::Display;

fn or_placeholder<T: Display>(value: Option<T>, placeholder: &str) -> String {
    value.map_or_else(|| placeholder.to_string(), |v| v.to_string())
}

/// Appends `filters` to `base` as `:name=value` pairs sorted by name.
///
/// Filter order in the request does not affect the key; empty filter sets
/// leave `base` unchanged.
pub fn with_filters<K, V>(base: &str, filters: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(&str, &str)> = filters
        .iter()
        .map(|(name, value)| (name.as_ref(), value.as_ref()))
        .collect();
    pairs.sort_unstable();

    let mut key = base.to_string();
    for (name, value) in pairs {
        key.push(':');
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}

pub mod admin {
    use super::or_placeholder;

    pub fn dashboard(date_range: &str, include_export: bool) -> String {
        format!("admin:dashboard:{date_range}:{include_export}")
    }

    pub fn users(page: u32, limit: u32, role: Option<&str>) -> String {
        format!("admin:users:{page}:{limit}:{}", or_placeholder(role, "all"))
    }

    pub fn orders(page: u32, limit: u32, status: Option<&str>) -> String {
        format!("admin:orders:{page}:{limit}:{}", or_placeholder(status, "all"))
    }

    pub fn vendors(page: u32, limit: u32, active: Option<bool>) -> String {
        format!("admin:vendors:{page}:{limit}:{}", or_placeholder(active, "all"))
    }
}

pub mod vendor {
    use super::or_placeholder;

    pub fn dashboard(vendor_id: u64, date_range: &str) -> String {
        format!("vendor:{vendor_id}:dashboard:{date_range}")
    }

    pub fn products(vendor_id: u64, page: u32, limit: u32) -> String {
        format!("vendor:{vendor_id}:products:{page}:{limit}")
    }

    pub fn orders(vendor_id: u64, page: u32, limit: u32, status: Option<&str>) -> String {
        format!(
            "vendor:{vendor_id}:orders:{page}:{limit}:{}",
            or_placeholder(status, "all")
        )
    }
}

pub mod public {
    use super::or_placeholder;

    pub fn products(page: u32, limit: u32, category_id: Option<u64>, search: Option<&str>) -> String {
        format!(
            "products:list:{page}:{limit}:{}:{}",
            or_placeholder(category_id, "all"),
            or_placeholder(search, "none")
        )
    }

    pub fn product_detail(slug: &str) -> String {
        format!("product:detail:{slug}")
    }

    pub fn categories() -> String {
        "categories:public:all".to_string()
    }

    pub fn homepage() -> String {
        "homepage:public:data".to_string()
    }
}
