//! Application configuration
//!
//! Re-exports the shared config type from atlas-types and adds validation,
//! key-based editing and (native only) persistence through confy.

pub use atlas_types::{AtlasConfig, ORDERED_GROUPS};

use crate::error::ConfigError;
use crate::pack::MAX_PACK_SIZE;

#[cfg(not(target_arch = "wasm32"))]
const APP_NAME: &str = "atlas";
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_NAME: &str = "config";

/// Keys accepted by [`AtlasConfigExt::set`].
pub const SETTABLE_KEYS: [&str; 11] = [
    "data_source",
    "fallback_geography",
    "default_group",
    "small_bucket_threshold",
    "dense_bubble_count",
    "search_debounce_ms",
    "resize_debounce_ms",
    "drawer_open_delay_ms",
    "mobile_breakpoint_px",
    "drawer_page_size",
    "pack_limit",
];

// ─────────────────────────────────────────────────────────────────────────────
// AtlasConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AtlasConfig validation and persistence
pub trait AtlasConfigExt: Sized {
    fn validate(&self) -> Result<(), ConfigError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;

    #[cfg(not(target_arch = "wasm32"))]
    fn load() -> Self;
    #[cfg(not(target_arch = "wasm32"))]
    fn load_from(path: &std::path::Path) -> Result<Self, ConfigError>;
    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) -> Result<(), ConfigError>;
    #[cfg(not(target_arch = "wasm32"))]
    fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError>;
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn non_blank(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Invalid {
            key,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

impl AtlasConfigExt for AtlasConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("small_bucket_threshold", self.small_bucket_threshold),
            ("drawer_page_size", self.drawer_page_size),
            ("pack_limit", self.pack_limit),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if self.pack_limit > MAX_PACK_SIZE {
            return Err(ConfigError::Invalid {
                key: "pack_limit",
                reason: format!("must be at most {MAX_PACK_SIZE}"),
            });
        }
        non_blank("data_source", &self.data_source)?;
        non_blank("fallback_geography", &self.fallback_geography)?;
        non_blank("default_group", &self.default_group)?;
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        match key {
            "data_source" => next.data_source = non_blank("data_source", value)?,
            "fallback_geography" => {
                next.fallback_geography = non_blank("fallback_geography", value)?
            }
            "default_group" => next.default_group = non_blank("default_group", value)?,
            "small_bucket_threshold" => {
                next.small_bucket_threshold = parse_number("small_bucket_threshold", value)?
            }
            "dense_bubble_count" => {
                next.dense_bubble_count = parse_number("dense_bubble_count", value)?
            }
            "search_debounce_ms" => {
                next.search_debounce_ms = parse_number("search_debounce_ms", value)?
            }
            "resize_debounce_ms" => {
                next.resize_debounce_ms = parse_number("resize_debounce_ms", value)?
            }
            "drawer_open_delay_ms" => {
                next.drawer_open_delay_ms = parse_number("drawer_open_delay_ms", value)?
            }
            "mobile_breakpoint_px" => {
                next.mobile_breakpoint_px = parse_number("mobile_breakpoint_px", value)?
            }
            "drawer_page_size" => next.drawer_page_size = parse_number("drawer_page_size", value)?,
            "pack_limit" => next.pack_limit = parse_number("pack_limit", value)?,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "key",
                    reason: format!("unknown setting '{key}'"),
                });
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load() -> Self {
        match confy::load::<AtlasConfig>(APP_NAME, CONFIG_NAME) {
            Ok(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid configuration, using defaults");
                    AtlasConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load configuration, using defaults");
                AtlasConfig::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config: AtlasConfig = confy::load_path(path)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }
}
