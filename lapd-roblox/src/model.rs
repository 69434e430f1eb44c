use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobloxUser {
    pub id: u64,
    pub name: String,
    pub display_name: String,
}

impl RobloxUser {
    pub fn profile_url(&self) -> String {
        format!("https://www.roblox.com/users/{}/profile", self.id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsernameLookupEntry {
    requested_username: Option<String>,
    id: u64,
    name: String,
    display_name: String,
}

#[derive(Deserialize)]
pub(crate) struct UsernameLookupResponse {
    #[serde(default)]
    data: Vec<UsernameLookupEntry>,
}

impl UsernameLookupResponse {
    pub(crate) fn into_user(self, requested: &str) -> Option<RobloxUser> {
        self.data
            .into_iter()
            .find(|entry| {
                entry
                    .requested_username
                    .as_deref()
                    .is_none_or(|name| name.eq_ignore_ascii_case(requested))
            })
            .map(|entry| RobloxUser {
                id: entry.id,
                name: entry.name,
                display_name: entry.display_name,
            })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeadshotEntry {
    target_id: u64,
    state: String,
    image_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct HeadshotResponse {
    #[serde(default)]
    data: Vec<HeadshotEntry>,
}

impl HeadshotResponse {
    pub(crate) fn image_url_for(self, roblox_id: u64) -> Option<String> {
        self.data
            .into_iter()
            .find(|entry| entry.target_id == roblox_id && entry.state == "Completed")
            .and_then(|entry| entry.image_url)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadshotResponse, UsernameLookupResponse};

    #[test]
    fn username_lookup_matches_requested_name() {
        let response: UsernameLookupResponse = serde_json::from_str(
            r#"{"data":[{"requestedUsername":"builderman","hasVerifiedBadge":true,"id":156,"name":"builderman","displayName":"Builderman"}]}"#,
        )
        .expect("valid json");

        let user = response.into_user("BuilderMan").expect("user");
        assert_eq!(user.id, 156);
        assert_eq!(user.display_name, "Builderman");
        assert_eq!(user.profile_url(), "https://www.roblox.com/users/156/profile");
    }

    #[test]
    fn empty_lookup_is_none() {
        let response: UsernameLookupResponse =
            serde_json::from_str(r#"{"data":[]}"#).expect("valid json");
        assert!(response.into_user("nobody").is_none());
    }

    #[test]
    fn pending_headshots_are_skipped() {
        let response: HeadshotResponse = serde_json::from_str(
            r#"{"data":[{"targetId":1,"state":"Pending","imageUrl":""},{"targetId":2,"state":"Completed","imageUrl":"https://tr.rbxcdn.com/x.png"}]}"#,
        )
        .expect("valid json");
        assert_eq!(
            response.image_url_for(2).as_deref(),
            Some("https://tr.rbxcdn.com/x.png")
        );

        let pending: HeadshotResponse = serde_json::from_str(
            r#"{"data":[{"targetId":1,"state":"Pending","imageUrl":""}]}"#,
        )
        .expect("valid json");
        assert!(pending.image_url_for(1).is_none());
    }
}
