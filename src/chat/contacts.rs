use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub message: String,
    pub time: String,
    pub image: String,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

struct Row {
    id: u32,
    name: &'static str,
    subtitle: Option<&'static str>,
    message: &'static str,
    time: &'static str,
    image: &'static str,
    is_new: bool,
    status: Option<&'static str>,
}

const ROWS: [Row; 5] = [
    Row {
        id: 1,
        name: "Maya Torres",
        subtitle: Some("Running club"),
        message: "Let's sync up after lunch.",
        time: "09:31",
        image: "/static/avatars/maya.jpeg",
        is_new: true,
        status: Some("Online • now"),
    },
    Row {
        id: 2,
        name: "Leo Park",
        subtitle: None,
        message: "Same time tomorrow for squats?",
        time: "06:53",
        image: "/static/avatars/leo.jpeg",
        is_new: false,
        status: Some("Active 5m ago"),
    },
    Row {
        id: 3,
        name: "Priya Nair",
        subtitle: None,
        message: "That stretching routine helped a lot",
        time: "Wed",
        image: "/static/avatars/priya.jpeg",
        is_new: false,
        status: None,
    },
    Row {
        id: 4,
        name: "Sam Okafor",
        subtitle: None,
        message: "Bike ride on Saturday?",
        time: "Wed",
        image: "/static/avatars/sam.jpeg",
        is_new: false,
        status: None,
    },
    Row {
        id: 5,
        name: "Elena Ruiz",
        subtitle: None,
        message: "Loved your new profile picture",
        time: "Mon",
        image: "/static/avatars/elena.jpeg",
        is_new: false,
        status: None,
    },
];

lazy_static! {
    pub static ref CONVERSATIONS: Vec<Conversation> = ROWS
        .iter()
        .map(|r| Conversation {
            id: r.id,
            name: r.name.to_string(),
            subtitle: r.subtitle.map(str::to_string),
            message: r.message.to_string(),
            time: r.time.to_string(),
            image: r.image.to_string(),
            is_new: r.is_new,
            status: r.status.map(str::to_string),
        })
        .collect();
}

pub fn find(id: u32) -> Option<&'static Conversation> {
    CONVERSATIONS.iter().find(|c| c.id == id)
}

/// Case-insensitive match on name, last message or subtitle.
pub fn search(query: &str) -> Vec<Conversation> {
    let q = query.trim().to_lowercase();
    CONVERSATIONS
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&q)
                || c.message.to_lowercase().contains(&q)
                || c.subtitle
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&q))
        })
        .cloned()
        .collect()
}
