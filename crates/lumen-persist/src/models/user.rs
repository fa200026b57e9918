use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data supplied by the identity provider
///
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl UpsertUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            profile_image_url: self.profile_image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

impl User {
    /// Merge an upsert into the stored record
    pub fn apply(&mut self, upsert: UpsertUser, now: DateTime<Utc>) {
        if upsert.email.is_some() {
            self.email = upsert.email;
        }
        if upsert.first_name.is_some() {
            self.first_name = upsert.first_name;
        }
        if upsert.last_name.is_some() {
            self.last_name = upsert.last_name;
        }
        if upsert.profile_image_url.is_some() {
            self.profile_image_url = upsert.profile_image_url;
        }
        self.updated_at = now.max(self.updated_at);
    }
}
