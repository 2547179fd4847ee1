use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};

/// Where an uploaded file lives in the bucket.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum UploadFolder {
    #[graphql(name = "ORGANIZATIONS")]
    Organizations,
    #[graphql(name = "TEAMS")]
    Teams,
    #[graphql(name = "PLAYERS")]
    Players,
    #[graphql(name = "VENUES")]
    Venues,
    #[graphql(name = "COMPETITIONS")]
    Competitions,
}

impl UploadFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFolder::Organizations => "organizations",
            UploadFolder::Teams => "teams",
            UploadFolder::Players => "players",
            UploadFolder::Venues => "venues",
            UploadFolder::Competitions => "competitions",
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct UploadUrl {
    /// Pre-signed `PUT` URL
    pub url: String,
    pub key: String,
    /// Where the object is readable once uploaded
    pub public_url: String,
    pub expires_at: DateTime<Utc>,
}
