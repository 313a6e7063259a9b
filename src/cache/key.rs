//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Generate a deterministic cache key from an operation, its parameters and a locale.
///
/// The key is `"{operation}_{hash}"` where the hash covers the operation name,
/// the parameters sorted by name, and the locale. Parameter order never
/// affects the key, and the readable prefix allows invalidation by operation.
pub fn cache_key(operation: &str, params: &[(&str, &str)], locale: &str) -> String {
    let mut hasher = Sha256::new();

    update_field(&mut hasher, operation);

    let mut sorted_params: Vec<_> = params.iter().collect();
    sorted_params.sort();

    hasher.update((sorted_params.len() as u64).to_le_bytes());
    for (k, v) in sorted_params {
        update_field(&mut hasher, k);
        update_field(&mut hasher, v);
    }

    update_field(&mut hasher, locale);

    format!("{}_{:x}", operation, hasher.finalize())
}

/// Length-prefixed so no two distinct inputs hash the same byte stream
fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_deterministic() {
        let key1 = cache_key("verse", &[("chapter", "2"), ("verse", "47")], "en");
        let key2 = cache_key("verse", &[("verse", "47"), ("chapter", "2")], "en");

        // Same inputs in different order should produce same key
        assert_eq!(key1, key2);
        assert_eq!(key1, cache_key("verse", &[("chapter", "2"), ("verse", "47")], "en"));
    }

    #[test]
    fn test_cache_key_prefixed_with_operation() {
        let key = cache_key("chapter", &[("chapter", "5")], "en");
        assert!(key.starts_with("chapter_"));
        // operation + '_' + 64 hex chars
        assert_eq!(key.len(), "chapter_".len() + 64);
    }

    #[test]
    fn test_cache_key_different_operations() {
        let key1 = cache_key("saint", &[("name", "x")], "en");
        let key2 = cache_key("place", &[("name", "x")], "en");

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_cache_key_different_locales() {
        let key1 = cache_key("verse", &[("chapter", "2"), ("verse", "47")], "en");
        let key2 = cache_key("verse", &[("chapter", "2"), ("verse", "47")], "hi");

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_cache_key_param_values_matter() {
        let key1 = cache_key("verse", &[("chapter", "2"), ("verse", "47")], "en");
        let key2 = cache_key("verse", &[("chapter", "2"), ("verse", "48")], "en");

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_cache_key_no_params() {
        let key1 = cache_key("leelas", &[], "en");
        let key2 = cache_key("leelas", &[], "en");

        assert_eq!(key1, key2);
    }

    #[test]
    fn test_cache_key_delimiters_in_values_do_not_collide() {
        let key1 = cache_key("wisdom", &[("temple", "z"), ("location", "x&temple=y")], "en");
        let key2 = cache_key("wisdom", &[("temple", "y&temple=z"), ("location", "x")], "en");

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_cache_key_locale_not_confused_with_params() {
        let key1 = cache_key("leelas", &[("a", "b|en")], "");
        let key2 = cache_key("leelas", &[("a", "b")], "en");

        assert_ne!(key1, key2);
    }
}
