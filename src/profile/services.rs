use time::OffsetDateTime;

use super::dto::{ProfileResponse, ProfileUpdateRequest};
use super::repo::{avatar_or_default, Profile};
use crate::storage::KvStore;

fn to_response(email: &str, profile: Profile, avatar: String) -> ProfileResponse {
    ProfileResponse {
        email: email.to_string(),
        username: email.to_string(),
        full_name: profile.full_name,
        bio: profile.bio,
        gender: profile.gender,
        age: profile.age,
        height_cm: profile.height_cm,
        weight_kg: profile.weight_kg,
        avatar,
    }
}

pub async fn load_profile(store: &dyn KvStore, email: &str) -> anyhow::Result<Option<ProfileResponse>> {
    let Some(profile) = Profile::load(store, email).await? else {
        return Ok(None);
    };
    let avatar = avatar_or_default(store, email).await?;
    Ok(Some(to_response(email, profile, avatar)))
}

/// Applies the supplied fields. `None` when the profile does not exist.
pub async fn update_profile(
    store: &dyn KvStore,
    email: &str,
    req: ProfileUpdateRequest,
) -> anyhow::Result<Option<ProfileResponse>> {
    let Some(mut profile) = Profile::load(store, email).await? else {
        return Ok(None);
    };

    if let Some(v) = req.full_name {
        profile.full_name = v;
    }
    if let Some(v) = req.bio {
        profile.bio = v;
    }
    if let Some(v) = req.gender {
        profile.gender = v;
    }
    if req.age.is_some() {
        profile.age = req.age;
    }
    if req.height_cm.is_some() {
        profile.height_cm = req.height_cm;
    }
    if req.weight_kg.is_some() {
        profile.weight_kg = req.weight_kg;
    }
    profile.updated_at = OffsetDateTime::now_utc();
    profile.save(store, email).await?;

    let avatar = avatar_or_default(store, email).await?;
    Ok(Some(to_response(email, profile, avatar)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::repo::DEFAULT_AVATAR;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn partial_update_keeps_unsent_fields() {
        let store = MemoryStore::new();
        let mut profile = Profile::new("Ana Silva");
        profile.bio = "Runner".into();
        profile.weight_kg = Some(60);
        profile.save(&store, "ana@fit.io").await.unwrap();

        let updated = update_profile(
            &store,
            "ana@fit.io",
            ProfileUpdateRequest {
                bio: Some("Marathoner".into()),
                age: Some(29),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.full_name, "Ana Silva");
        assert_eq!(updated.bio, "Marathoner");
        assert_eq!(updated.age, Some(29));
        assert_eq!(updated.weight_kg, Some(60));
        assert_eq!(updated.avatar, DEFAULT_AVATAR);
    }

    #[tokio::test]
    async fn update_of_missing_profile_is_none() {
        let store = MemoryStore::new();
        let res = update_profile(&store, "ghost@fit.io", ProfileUpdateRequest::default())
            .await
            .unwrap();
        assert!(res.is_none());
    }
}
