use std::borrow::Cow;

/// Environment variable overriding [ContainerConfig::max_depth]
pub const MAX_DEPTH_ENV: &str = "WIREBOX_MAX_DEPTH";
/// Environment variable overriding [ContainerConfig::default_method]
pub const DEFAULT_METHOD_ENV: &str = "WIREBOX_DEFAULT_METHOD";

/// Settings of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// How deep `make` may recurse before failing with [crate::ContainerError::RecursionLimit]
    pub max_depth: usize,
    /// Method called on a bound method target without an explicit method name
    pub default_method: Cow<'static, str>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        ContainerConfig {
            max_depth: 128,
            default_method: Cow::Borrowed("invoke"),
        }
    }
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `WIREBOX_MAX_DEPTH` and `WIREBOX_DEFAULT_METHOD` if set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => tracing::warn!("Ignoring invalid {}: '{}'", MAX_DEPTH_ENV, raw),
            }
        }

        if let Some(raw) = lookup(DEFAULT_METHOD_ENV) {
            let method = raw.trim();
            if method.is_empty() {
                tracing::warn!("Ignoring empty {}", DEFAULT_METHOD_ENV);
            } else {
                config.default_method = Cow::Owned(method.to_string());
            }
        }

        config
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_default_method(mut self, method: impl Into<Cow<'static, str>>) -> Self {
        self.default_method = method.into();
        self
    }
}
