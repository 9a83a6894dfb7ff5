use super::model::{Post, PostStat};

/// Example entries present in every feed regardless of stored data.
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            author: "Maya Torres".into(),
            avatar: "/static/avatars/maya.jpeg".into(),
            timestamp: "2h ago".into(),
            content: "Sunrise 5k done before coffee. New personal best on the river loop! #cardio #running #fitnessgoals".into(),
            image: Some("/static/posts/river-run.jpeg".into()),
            hashtags: None,
            stats: Some(vec![
                PostStat {
                    icon: "directions_run".into(),
                    label: "Distance".into(),
                    value: "5.02 km".into(),
                },
                PostStat {
                    icon: "timer".into(),
                    label: "Time".into(),
                    value: "24:15".into(),
                },
            ]),
            likes: 12,
            comments: 5,
            is_liked: false,
        },
        Post {
            id: 2,
            author: "Leo Park".into(),
            avatar: "/static/avatars/leo.jpeg".into(),
            timestamp: "Yesterday".into(),
            content: "Deadlift PR today. Slow and steady wins. #gymlife #strengthtraining".into(),
            image: Some("/static/posts/deadlift.jpeg".into()),
            hashtags: None,
            stats: None,
            likes: 78,
            comments: 12,
            is_liked: true,
        },
    ]
}
