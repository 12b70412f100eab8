use serde::{Deserialize, Serialize};
use url::Url;

/// Message sender as exposed on the wire (not a DB model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVM {
    pub name: String,
    pub avatar_image_link: Url,
}
