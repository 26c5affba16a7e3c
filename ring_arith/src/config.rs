use std::num::NonZeroUsize;

/// Configuration of a [`crate::TransformCache`].
///
/// The default cache is unbounded: once built, a context stays until the
/// cache is dropped. Setting a maximum number of entries turns on
/// least-recently-used eviction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_entries: Option<NonZeroUsize>,
}

impl CacheConfig {
    pub fn unbounded() -> Self {
        Self { max_entries: None }
    }

    pub fn with_max_entries(mut self, max_entries: NonZeroUsize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.max_entries.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unbounded() {
        assert_eq!(CacheConfig::default(), CacheConfig::unbounded());
        assert!(!CacheConfig::default().is_bounded());
        let config: CacheConfig =
            CacheConfig::default().with_max_entries(NonZeroUsize::new(4).unwrap());
        assert!(config.is_bounded());
        assert_eq!(config.max_entries.map(NonZeroUsize::get), Some(4));
    }
}
