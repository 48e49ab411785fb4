use serde::Serialize;
use serde_json::Value;

/// Raw identity record returned by the provider. Stored and restored as-is.
pub type ProviderProfile = Value;

/// Read-only view over a provider profile. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture_url: Option<String>,
}

impl Principal {
    pub fn from_profile(profile: &ProviderProfile) -> Option<Self> {
        let id = profile.get("id")?.as_str().filter(|s| !s.is_empty())?;

        let name = match profile.get("name").and_then(Value::as_str) {
            Some(n) => Some(n.to_string()),
            None => {
                let parts: Vec<&str> = ["first_name", "middle_name", "last_name"]
                    .iter()
                    .filter_map(|k| profile.get(*k).and_then(Value::as_str))
                    .filter(|s| !s.is_empty())
                    .collect();
                if parts.is_empty() { None } else { Some(parts.join(" ")) }
            }
        };

        let email = profile
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_string);

        let picture_url = profile
            .pointer("/picture/data/url")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Principal {
            id: id.to_string(),
            name,
            email,
            picture_url,
        })
    }
}

/// A profile is usable when it is an object carrying a non-empty string `id`.
pub fn is_usable(profile: &ProviderProfile) -> bool {
    profile.is_object() && Principal::from_profile(profile).is_some()
}
