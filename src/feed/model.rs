use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostStat {
    pub icon: String,
    pub label: String,
    pub value: String,
}

/// Feed entry. Field names match the stored JSON (`isLiked`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub avatar: String,
    pub timestamp: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<PostStat>>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub is_liked: bool,
}

impl Post {
    pub fn toggle_like(&mut self) {
        if self.is_liked {
            self.likes -= 1;
        } else {
            self.likes += 1;
        }
        self.is_liked = !self.is_liked;
    }
}

/// User input for a new post, before validation.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub image: Option<String>,
}

/// Splits free-form hashtag input on whitespace and commas and
/// prefixes `#` where missing.
pub fn parse_hashtags(raw: &str) -> Vec<String> {
    lazy_static! {
        static ref SEP: Regex = Regex::new(r"[\s,]+").unwrap();
    }
    SEP.split(raw)
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.starts_with('#') {
                t.to_string()
            } else {
                format!("#{t}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(likes: i64, is_liked: bool) -> Post {
        Post {
            id: 7,
            author: "ana".into(),
            avatar: "/a.jpeg".into(),
            timestamp: "Just now".into(),
            content: "hi".into(),
            image: None,
            hashtags: None,
            stats: None,
            likes,
            comments: 0,
            is_liked,
        }
    }

    #[test]
    fn toggle_like_twice_is_identity() {
        for (likes, liked) in [(0, false), (12, false), (78, true)] {
            let original = post(likes, liked);
            let mut p = original.clone();
            p.toggle_like();
            assert_eq!(p.is_liked, !liked);
            assert_eq!(p.likes, if liked { likes - 1 } else { likes + 1 });
            p.toggle_like();
            assert_eq!(p, original);
        }
    }

    #[test]
    fn hashtags_are_split_and_prefixed() {
        assert_eq!(
            parse_hashtags(" legday, #gym  pr,,"),
            vec!["#legday", "#gym", "#pr"]
        );
        assert!(parse_hashtags("  , ").is_empty());
    }

    #[test]
    fn stored_json_uses_camel_case() {
        let json = serde_json::to_value(post(1, true)).unwrap();
        assert_eq!(json["isLiked"], true);
        assert!(json.get("image").is_none());

        let back: Post = serde_json::from_str(
            r#"{"id":5,"author":"a","avatar":"b","timestamp":"t","content":"c"}"#,
        )
        .unwrap();
        assert_eq!(back.likes, 0);
        assert!(!back.is_liked);
    }
}
