//! Simplified→Traditional conversion via OpenCC, behind the `opencc`
//! feature.
//!
//! Converter instances are stateless after construction, so one per
//! configuration name is kept in a bounded pool owned by the caller.

/// Matches the handful of configs a single invocation realistically uses.
pub const DEFAULT_POOL_CAPACITY: usize = 8;

#[cfg(feature = "opencc")]
mod imp {
    use std::collections::HashMap;

    use ferrous_opencc::OpenCC;
    use ferrous_opencc::config::BuiltinConfig;

    use crate::TailoError;

    /// Bounded cache of OpenCC converters keyed by configuration name.
    pub struct OpenCcPool {
        capacity: usize,
        converters: HashMap<String, OpenCC>,
    }

    impl OpenCcPool {
        pub fn new(capacity: usize) -> Self {
            Self {
                capacity: capacity.max(1),
                converters: HashMap::new(),
            }
        }

        /// Convert `text` with the converter for `config`, building and
        /// caching it on first use.
        pub fn convert(&mut self, text: &str, config: &str) -> Result<String, TailoError> {
            if text.is_empty() {
                return Ok(String::new());
            }
            if !self.converters.contains_key(config) {
                let builtin = builtin_config(config).ok_or_else(|| {
                    TailoError::Opencc(format!("unknown OpenCC config `{config}`"))
                })?;
                let converter = OpenCC::from_config(builtin)
                    .map_err(|e| TailoError::Opencc(e.to_string()))?;
                if self.converters.len() >= self.capacity {
                    // Config churn past capacity just resets the pool.
                    self.converters.clear();
                }
                self.converters.insert(config.to_string(), converter);
            }
            Ok(self.converters[config].convert(text))
        }
    }

    fn builtin_config(name: &str) -> Option<BuiltinConfig> {
        match name {
            "s2t" => Some(BuiltinConfig::S2t),
            "t2s" => Some(BuiltinConfig::T2s),
            "s2tw" => Some(BuiltinConfig::S2tw),
            "tw2s" => Some(BuiltinConfig::Tw2s),
            "s2twp" => Some(BuiltinConfig::S2twp),
            "tw2sp" => Some(BuiltinConfig::Tw2sp),
            "s2hk" => Some(BuiltinConfig::S2hk),
            "hk2s" => Some(BuiltinConfig::Hk2s),
            "t2tw" => Some(BuiltinConfig::T2tw),
            "tw2t" => Some(BuiltinConfig::Tw2t),
            "t2hk" => Some(BuiltinConfig::T2hk),
            "hk2t" => Some(BuiltinConfig::Hk2t),
            "t2jp" => Some(BuiltinConfig::T2jp),
            "jp2t" => Some(BuiltinConfig::Jp2t),
            _ => None,
        }
    }
}

#[cfg(not(feature = "opencc"))]
mod imp {
    use crate::TailoError;

    /// Stub used when the crate is built without OpenCC support: every
    /// conversion attempt reports the feature as unavailable.
    pub struct OpenCcPool {
        _capacity: usize,
    }

    impl OpenCcPool {
        pub fn new(capacity: usize) -> Self {
            Self {
                _capacity: capacity,
            }
        }

        pub fn convert(&mut self, _text: &str, _config: &str) -> Result<String, TailoError> {
            Err(TailoError::OpenccUnavailable)
        }
    }
}

pub use imp::OpenCcPool;

impl Default for OpenCcPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}
