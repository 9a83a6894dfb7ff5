use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub bio: String,
    pub gender: String,
    pub age: Option<u32>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    pub avatar: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
}

impl ProfileUpdateRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_len("Full name", self.full_name.as_deref(), 255)?;
        check_len("Bio", self.bio.as_deref(), 255)?;
        check_len("Gender", self.gender.as_deref(), 50)?;
        Ok(())
    }
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value {
        Some(v) if v.chars().count() > max => {
            Err(format!("{field} must not exceed {max} characters"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_length_limits() {
        let ok = ProfileUpdateRequest {
            full_name: Some("a".repeat(255)),
            gender: Some("f".repeat(50)),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let long_bio = ProfileUpdateRequest {
            bio: Some("b".repeat(256)),
            ..Default::default()
        };
        assert_eq!(
            long_bio.validate().unwrap_err(),
            "Bio must not exceed 255 characters"
        );

        let long_gender = ProfileUpdateRequest {
            gender: Some("g".repeat(51)),
            ..Default::default()
        };
        assert!(long_gender.validate().is_err());
    }
}
