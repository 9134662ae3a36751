use std::sync::Mutex;

/// Remembers the most recently issued request key so that late responses for
/// older keys can be recognised and dropped.
#[derive(Debug)]
pub struct LatestGuard<K> {
    latest: Mutex<Option<K>>,
}

impl<K> Default for LatestGuard<K> {
    fn default() -> Self {
        Self {
            latest: Mutex::new(None),
        }
    }
}

impl<K> LatestGuard<K>
where
    K: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, key: K) {
        *self.latest.lock().expect("latest guard mutex poisoned") = Some(key);
    }

    pub fn is_latest(&self, key: &K) -> bool {
        self.latest
            .lock()
            .expect("latest guard mutex poisoned")
            .as_ref()
            .is_some_and(|latest| latest == key)
    }

    /// Forgets the current key; every outstanding response becomes stale.
    pub fn reset(&self) {
        *self.latest.lock().expect("latest guard mutex poisoned") = None;
    }

    pub fn latest(&self) -> Option<K> {
        self.latest
            .lock()
            .expect("latest guard mutex poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_last_issued_key_is_latest() {
        let guard = LatestGuard::new();
        assert!(!guard.is_latest(&"du"));

        guard.issue("du");
        guard.issue("dub");
        assert!(!guard.is_latest(&"du"));
        assert!(guard.is_latest(&"dub"));

        guard.reset();
        assert!(!guard.is_latest(&"dub"));
        assert_eq!(guard.latest(), None);
    }
}
