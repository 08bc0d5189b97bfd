//! Named string lookups used to build configuration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// A source of named configuration strings
pub trait EnvSource {
    /// Raw value for `key`, if set
    fn var(&self, key: &str) -> Option<String>;

    /// Value for `key`, treating empty or whitespace-only values as unset
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<K, V, S> EnvSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.as_ref().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source() {
        let env = HashMap::from([("PROVIDER", "HF_TGI"), ("EMPTY", "  ")]);

        assert_eq!(env.var("PROVIDER"), Some("HF_TGI".to_string()));
        assert_eq!(env.var("MISSING"), None);
        assert_eq!(env.var("EMPTY"), Some("  ".to_string()));
        assert_eq!(env.non_empty("EMPTY"), None);
    }

    #[test]
    fn test_non_empty_trims() {
        let env = HashMap::from([("KEY".to_string(), " value ".to_string())]);
        assert_eq!(env.non_empty("KEY"), Some("value".to_string()));
    }
}
