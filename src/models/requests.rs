//! Request DTOs for the diagnostics API

use std::collections::HashSet;

use serde::Deserialize;

use crate::measure::TextItem;

/// Request body for `PUT /heights`
#[derive(Debug, Clone, Deserialize)]
pub struct SetHeightRequest {
    /// Item id used as the cache key
    pub id: String,
    /// Height to store
    pub height: f64,
}

impl SetHeightRequest {
    /// Returns an error message if the id is unusable, None if valid.
    ///
    /// The height range is checked by the cache's own validation.
    pub fn validate(&self) -> Option<String> {
        if self.id.is_empty() {
            return Some("Item id cannot be empty".to_string());
        }
        None
    }
}

/// Request body for `POST /preload`
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadRequest {
    /// Measurement width; the configured default when absent
    #[serde(default)]
    pub width: Option<f64>,
    /// Items to preload, in display order
    pub items: Vec<TextItem>,
}

impl PreloadRequest {
    /// Returns an error message if the request is unusable, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(width) = self.width {
            if !width.is_finite() || width <= 0.0 {
                return Some(format!("Width must be a positive number, got {}", width));
            }
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.is_empty() {
                return Some("Item id cannot be empty".to_string());
            }
            if !seen.insert(item.id.as_str()) {
                return Some(format!("Duplicate item id '{}'", item.id));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_height_request_deserialize() {
        let json = r#"{"id": "row-1", "height": 44.5}"#;
        let req: SetHeightRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "row-1");
        assert_eq!(req.height, 44.5);
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_set_height_request_empty_id() {
        let req = SetHeightRequest {
            id: "".to_string(),
            height: 10.0,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_preload_request_defaults_width() {
        let json = r#"{"items": [{"id": "a", "text": "hello"}]}"#;
        let req: PreloadRequest = serde_json::from_str(json).unwrap();
        assert!(req.width.is_none());
        assert_eq!(req.items.len(), 1);
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_preload_request_rejects_bad_width() {
        let req = PreloadRequest {
            width: Some(0.0),
            items: vec![],
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_preload_request_rejects_duplicates() {
        let req = PreloadRequest {
            width: None,
            items: vec![TextItem::new("a", "x"), TextItem::new("a", "y")],
        };
        assert!(req.validate().unwrap().contains("Duplicate"));
    }
}
