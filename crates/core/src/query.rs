//! Multi-valued query composition for search API requests.
//!
//! A [`Query`] binds a base endpoint to a set of parameters. Keys may hold
//! several values (`add_*`) or be force-replaced by a single value (`set_*`),
//! and serialization is repeatable: keys are emitted in sorted order and each
//! key's values keep their insertion order.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Parameters that change per invocation without changing search intent.
pub const VOLATILE_KEYS: &[&str] = &["apikey", "seed"];

/// A base endpoint plus an ordered multi-value parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    base: String,
    params: BTreeMap<String, Vec<String>>,
}

impl Query {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into(), params: BTreeMap::new() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Append `value` under `key` unless it is empty.
    pub fn add_string(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.params
                .entry(key.to_string())
                .or_default()
                .push(value.to_string());
        }
    }

    /// Append `value` under `key` unless it is zero.
    pub fn add_int(&mut self, key: &str, value: i64) {
        if value != 0 {
            self.add_string(key, &value.to_string());
        }
    }

    /// Append `"true"` under `key` if `value` is set.
    pub fn add_bool(&mut self, key: &str, value: bool) {
        if value {
            self.add_string(key, "true");
        }
    }

    /// Replace every value under `key` with `value`, or drop `key` if `value` is empty.
    pub fn set_string(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.params.remove(key);
        } else {
            self.params.insert(key.to_string(), vec![value.to_string()]);
        }
    }

    /// Replace every value under `key` with `value`, or drop `key` if `value` is zero.
    pub fn set_int(&mut self, key: &str, value: i64) {
        if value == 0 {
            self.params.remove(key);
        } else {
            self.set_string(key, &value.to_string());
        }
    }

    /// Replace every value under `key` with `"true"`, or drop `key` if `value` is false.
    pub fn set_bool(&mut self, key: &str, value: bool) {
        if value {
            self.set_string(key, "true");
        } else {
            self.params.remove(key);
        }
    }

    /// First value stored under `key`.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value under `key` parsed as an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get_string(key).and_then(|v| v.parse().ok())
    }

    /// True only if the first value under `key` is `"true"` (any case).
    pub fn get_bool(&self, key: &str) -> bool {
        self.get_string(key)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Independent copy of this query with `key` removed.
    pub fn without(&self, key: &str) -> Query {
        let mut copy = self.clone();
        copy.params.remove(key);
        copy
    }

    /// Serialize to `base?k=v&...`, or the bare base if no parameters are set.
    pub fn build(&self) -> String {
        if self.params.is_empty() {
            return self.base.clone();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        format!("{}?{}", self.base, serializer.finish())
    }

    pub fn build_without(&self, key: &str) -> String {
        self.without(key).build()
    }

    /// The query serialized without [`VOLATILE_KEYS`], used for cache validity checks.
    pub fn signature(&self) -> Signature {
        let mut stable = self.clone();
        for key in VOLATILE_KEYS {
            stable.params.remove(*key);
        }
        Signature(stable.build())
    }

    /// The request URL with the API key stripped, for logs and error messages.
    pub fn redacted(&self) -> String {
        self.build_without("apikey")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// Canonical form of a query with volatile parameters removed.
///
/// Never sent over the wire; persisted next to a signature-sensitive bucket
/// and compared on the next run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Signature {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://wallhaven.cc/api/v1/search";

    #[test]
    fn test_build_without_params_returns_base() {
        let query = Query::new(BASE);
        assert_eq!(query.build(), BASE);
    }

    #[test]
    fn test_add_string_accumulates() {
        let mut query = Query::new(BASE);
        query.add_string("q", "cats");
        query.add_string("q", "dogs");
        assert_eq!(query.build(), format!("{BASE}?q=cats&q=dogs"));
        assert_eq!(query.get_all("q"), ["cats", "dogs"]);
    }

    #[test]
    fn test_set_string_replaces() {
        let mut query = Query::new(BASE);
        query.add_string("sorting", "hot");
        query.set_string("sorting", "random");
        query.set_string("sorting", "toplist");
        assert_eq!(query.build(), format!("{BASE}?sorting=toplist"));
    }

    #[test]
    fn test_set_empty_deletes_key() {
        let mut query = Query::new(BASE);
        query.add_string("q", "cats");
        query.add_string("q", "dogs");
        query.set_string("q", "");
        assert!(!query.has("q"));
        assert_eq!(query.build(), BASE);

        query.set_int("page", 3);
        query.set_int("page", 0);
        assert!(!query.has("page"));

        query.set_bool("ai_art_filter", true);
        query.set_bool("ai_art_filter", false);
        assert!(!query.has("ai_art_filter"));
    }

    #[test]
    fn test_add_guards_skip_empty_values() {
        let mut query = Query::new(BASE);
        query.add_string("q", "");
        query.add_int("page", 0);
        query.add_bool("nsfw", false);
        assert_eq!(query.build(), BASE);

        query.add_int("page", 2);
        query.add_bool("nsfw", true);
        assert_eq!(query.get_int("page"), Some(2));
        assert!(query.get_bool("nsfw"));
    }

    #[test]
    fn test_getters_on_missing_or_malformed_values() {
        let mut query = Query::new(BASE);
        assert_eq!(query.get_string("q"), None);
        assert_eq!(query.get_int("page"), None);
        assert!(!query.get_bool("nsfw"));

        query.set_string("page", "two");
        assert_eq!(query.get_int("page"), None);
        query.set_string("nsfw", "TRUE");
        assert!(query.get_bool("nsfw"));
    }

    #[test]
    fn test_build_orders_keys_and_encodes() {
        let mut query = Query::new(BASE);
        query.set_string("sorting", "random");
        query.add_string("q", "blue sky & sea");
        query.set_string("purity", "100");
        assert_eq!(query.build(), format!("{BASE}?purity=100&q=blue+sky+%26+sea&sorting=random"));
    }

    #[test]
    fn test_without_leaves_original_untouched() {
        let mut query = Query::new(BASE);
        query.add_string("apikey", "secret");
        query.add_string("q", "cats");
        let before = query.build();

        let stripped = query.without("apikey");
        assert!(!stripped.build().contains("apikey"));
        assert_eq!(query.build(), before);
        assert_eq!(query.build_without("apikey"), stripped.build());
    }

    #[test]
    fn test_signature_ignores_volatile_keys() {
        let mut first = Query::new(BASE);
        first.add_string("seed", "abc123");
        first.add_string("apikey", "one");
        first.add_string("q", "mountains");

        let mut second = Query::new(BASE);
        second.add_string("q", "mountains");
        second.add_string("seed", "zzz999");

        assert_eq!(first.signature(), second.signature());
        assert!(!first.signature().as_str().contains("seed"));
    }

    #[test]
    fn test_signature_changes_with_search_terms() {
        let mut first = Query::new(BASE);
        first.add_string("q", "mountains");
        let mut second = first.clone();
        second.set_string("q", "forest");
        assert_ne!(first.signature(), second.signature());

        let mut third = first.clone();
        third.set_string("purity", "111");
        assert_ne!(first.signature(), third.signature());
    }

    #[test]
    fn test_redacted_hides_apikey_only() {
        let mut query = Query::new(BASE);
        query.add_string("apikey", "secret");
        query.add_string("seed", "abc");
        let redacted = query.redacted();
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("seed=abc"));
    }
}
