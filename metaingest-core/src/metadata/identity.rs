//! Corp user and group aspects.

use serde::{Deserialize, Serialize};

const DEFAULT_PICTURE_LINK: &str = "https://raw.githubusercontent.com/linkedin/datahub/master/datahub-web/packages/data-portal/public/assets/images/default_avatar.png";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpUserInfo {
    pub active: bool,
    pub display_name: Option<String>,
    pub email: String,
    pub title: Option<String>,
    pub manager_urn: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub country_code: Option<String>,
}

/// User information editable from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpUserEditableInfo {
    pub about_me: Option<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_picture_link")]
    pub picture_link: String,
}

fn default_picture_link() -> String {
    DEFAULT_PICTURE_LINK.to_string()
}

impl Default for CorpUserEditableInfo {
    fn default() -> Self {
        Self {
            about_me: None,
            teams: Vec::new(),
            skills: Vec::new(),
            picture_link: default_picture_link(),
        }
    }
}

/// A group of corp users; may contain nested groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpGroupInfo {
    pub email: String,
    pub admins: Vec<String>,
    pub members: Vec<String>,
    pub groups: Vec<String>,
}
