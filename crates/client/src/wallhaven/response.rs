//! wallhaven.cc search response envelope.

use serde::Deserialize;

use wallmancer_core::PageMeta;

/// Raw search response: `{ data: [{ path, .. }], meta: { total, last_page, .. } }`.
///
/// Fields not listed here are ignored.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub data: Vec<Wallpaper>,
    pub meta: SearchMeta,
}

/// One search hit.
#[derive(Debug, Deserialize)]
pub struct Wallpaper {
    #[serde(default)]
    pub id: Option<String>,
    /// Full-size image URL; this is the cached identifier.
    pub path: String,
}

/// Pagination metadata.
#[derive(Debug, Deserialize)]
pub struct SearchMeta {
    pub total: u64,
    pub last_page: u32,
}

impl SearchEnvelope {
    pub fn page_meta(&self) -> PageMeta {
        PageMeta { total: self.meta.total, last_page: self.meta.last_page }
    }

    /// Item paths in response order.
    pub fn into_paths(self) -> Vec<String> {
        self.data.into_iter().map(|w| w.path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "data": [
            {
                "id": "85k9xo",
                "url": "https://wallhaven.cc/w/85k9xo",
                "purity": "sfw",
                "resolution": "3840x2160",
                "path": "https://w.wallhaven.cc/full/85/wallhaven-85k9xo.jpg"
            },
            {
                "id": "l3xk2q",
                "path": "https://w.wallhaven.cc/full/l3/wallhaven-l3xk2q.png"
            }
        ],
        "meta": {
            "current_page": 1,
            "last_page": 74,
            "per_page": "24",
            "total": 1766,
            "query": "mountains",
            "seed": "abc123"
        }
    }"#;

    #[test]
    fn test_deserialize_envelope() {
        let envelope: SearchEnvelope = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].id.as_deref(), Some("85k9xo"));
        assert_eq!(envelope.page_meta(), PageMeta { total: 1766, last_page: 74 });
    }

    #[test]
    fn test_into_paths_keeps_order() {
        let envelope: SearchEnvelope = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(
            envelope.into_paths(),
            [
                "https://w.wallhaven.cc/full/85/wallhaven-85k9xo.jpg",
                "https://w.wallhaven.cc/full/l3/wallhaven-l3xk2q.png"
            ]
        );
    }

    #[test]
    fn test_empty_data() {
        let json = r#"{"data": [], "meta": {"total": 0, "last_page": 1}}"#;
        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.into_paths().is_empty());
    }

    #[test]
    fn test_missing_meta_is_error() {
        let json = r#"{"data": []}"#;
        assert!(serde_json::from_str::<SearchEnvelope>(json).is_err());
    }

    #[test]
    fn test_item_without_path_is_error() {
        let json = r#"{"data": [{"id": "x"}], "meta": {"total": 1, "last_page": 1}}"#;
        assert!(serde_json::from_str::<SearchEnvelope>(json).is_err());
    }
}
