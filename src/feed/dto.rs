use serde::{Deserialize, Serialize};

use super::model::{parse_hashtags, Post, PostDraft};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub caption: String,
    /// Free-form, e.g. `"legday, #gym pr"`.
    #[serde(default)]
    pub hashtags: String,
    pub image: Option<String>,
}

impl From<CreatePostRequest> for PostDraft {
    fn from(req: CreatePostRequest) -> Self {
        PostDraft {
            caption: req.caption,
            hashtags: parse_hashtags(&req.hashtags),
            image: req.image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub author: String,
    pub posts: Vec<Post>,
}
