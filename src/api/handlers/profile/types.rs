//! Profile aggregate wire types and embedded collection entries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Named social platform links, each independently optional. Only keys the
/// caller supplied are serialized, which keeps stored updates sparse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// One position in the experience collection. The id is assigned at insert
/// time so the entry can be removed later.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EducationEntry {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The profile owner's display fields, expanded into profile reads.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileOwner {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub user: ProfileOwner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    pub social: SocialLinks,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub created_at: String,
    pub updated_at: String,
}

/// Profile upsert payload. `status` and `skills` are required; everything
/// else is optional and, on update, absent fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
    /// Comma-separated list, split and trimmed before storage.
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddEducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

/// Remove the entry with the given id from an owned collection.
///
/// Unknown ids leave the sequence unchanged; callers persist either way.
pub(crate) fn excise<T, F>(entries: &mut Vec<T>, id: Uuid, id_of: F) -> bool
where
    F: Fn(&T) -> Uuid,
{
    let before = entries.len();
    entries.retain(|entry| id_of(entry) != id);
    entries.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: Uuid, title: &str) -> ExperienceEntry {
        ExperienceEntry {
            id,
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            from: "2020-01-01".to_string(),
            to: None,
            current: true,
            description: None,
        }
    }

    #[test]
    fn excise_removes_matching_entry() {
        let target = Uuid::new_v4();
        let mut entries = vec![entry(Uuid::new_v4(), "first"), entry(target, "second")];

        assert!(excise(&mut entries, target, |e| e.id));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "first");
    }

    #[test]
    fn excise_unknown_id_is_a_noop() {
        let mut entries = vec![entry(Uuid::new_v4(), "only")];

        assert!(!excise(&mut entries, Uuid::new_v4(), |e| e.id));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "only");
    }

    #[test]
    fn social_links_serialize_sparse() {
        let social = SocialLinks {
            twitter: Some("https://twitter.com/dev".to_string()),
            ..SocialLinks::default()
        };
        let json = serde_json::to_value(&social).expect("serialize");
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("twitter"));
    }

    #[test]
    fn experience_entry_roundtrips_through_json() {
        let original = entry(Uuid::new_v4(), "Engineer");
        let json = serde_json::to_string(&original).expect("serialize");
        let decoded: ExperienceEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded.id, original.id);
        assert_eq!(decoded.title, original.title);
        assert!(decoded.current);
    }
}
