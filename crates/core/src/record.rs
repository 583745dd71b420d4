//! The persisted post record.

use serde::{Deserialize, Serialize};

/// One forum post as written to the records file.
///
/// Field names serialize in camelCase (`postId`) so the file matches the
/// layout consumed by downstream tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Page offset the post was found at.
    pub offset: u32,
    /// Post identifier; empty when the page did not expose one.
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub author: String,
    /// Absolute date text ("28 dec 2025 at 1:10"), or the raw text when it
    /// was not a relative phrase.
    #[serde(default)]
    pub date: String,
    /// Body text with inline `[[EMOJI:<url>]]` markers.
    pub text: String,
    #[serde(default)]
    pub emojis: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let record = PostRecord {
            offset: 20,
            post_id: "-1_42".to_string(),
            author: "Alice".to_string(),
            date: "28 dec 2025 at 1:10".to_string(),
            text: "hello".to_string(),
            emojis: vec![],
            photos: vec!["https://example.com/p.jpg".to_string()],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["postId"], "-1_42");
        assert_eq!(json["offset"], 20);
        assert!(json.get("post_id").is_none());
        assert_eq!(json["photos"][0], "https://example.com/p.jpg");
    }

    #[test]
    fn test_deserializes_with_missing_lists() {
        let record: PostRecord = serde_json::from_str(r#"{"offset":0,"text":"hi"}"#).unwrap();
        assert_eq!(record.text, "hi");
        assert!(record.post_id.is_empty());
        assert!(record.emojis.is_empty());
        assert!(record.photos.is_empty());
    }
}
