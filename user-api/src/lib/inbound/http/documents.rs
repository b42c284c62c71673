//! JSON:API request and response documents for the user resource.

use serde::Deserialize;
use serde::Serialize;

use crate::domain::pagination::Page;
use crate::domain::user::models::User;
use crate::domain::user::validation::UserDraft;

pub const USER_RESOURCE_TYPE: &str = "user";
pub const USERS_PATH: &str = "/api/v1/users";

/// Public attributes of a user. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAttributes {
    pub name: String,
    pub username: String,
    pub email: String,
}

/// JSON:API resource object for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: UserAttributes,
}

impl From<&User> for UserResource {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            kind: USER_RESOURCE_TYPE,
            attributes: UserAttributes {
                name: user.name.as_str().to_string(),
                username: user.username.as_str().to_string(),
                email: user.email.as_str().to_string(),
            },
        }
    }
}

impl UserResource {
    pub fn location(&self) -> String {
        format!("{USERS_PATH}/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDocument {
    pub data: UserResource,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self { data: user.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionMeta {
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    #[serde(rename = "self")]
    pub current: String,
    pub first: String,
    pub last: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCollectionDocument {
    pub data: Vec<UserResource>,
    pub meta: CollectionMeta,
    pub links: PaginationLinks,
}

fn page_link(page: u64, per_page: u32) -> String {
    format!("{USERS_PATH}?page={page}&per_page={per_page}")
}

impl From<&Page<User>> for UserCollectionDocument {
    fn from(page: &Page<User>) -> Self {
        let current = u64::from(page.page);
        let total_pages = page.total_pages();

        Self {
            data: page.items.iter().map(UserResource::from).collect(),
            meta: CollectionMeta {
                pagination: PaginationMeta {
                    page: page.page,
                    per_page: page.per_page,
                    total_pages,
                    total_count: page.total_count,
                },
            },
            links: PaginationLinks {
                current: page_link(current, page.per_page),
                first: page_link(1, page.per_page),
                last: page_link(total_pages.max(1), page.per_page),
                prev: page
                    .has_previous()
                    .then(|| page_link(current - 1, page.per_page)),
                next: page
                    .has_next()
                    .then(|| page_link(current + 1, page.per_page)),
            },
        }
    }
}

/// Incoming `{"data": {"type": "user", "attributes": {...}}}` document.
///
/// Both levels are optional so a missing envelope can be reported as a
/// missing parameter instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRequestDocument {
    pub data: Option<UserRequestData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRequestData {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub attributes: Option<UserRequestAttributes>,
}

/// Permitted attributes; anything else in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRequestAttributes {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl From<UserRequestAttributes> for UserDraft {
    fn from(attributes: UserRequestAttributes) -> Self {
        Self {
            name: attributes.name,
            username: attributes.username,
            email: attributes.email,
            password: attributes.password,
            password_confirmation: attributes.password_confirmation,
        }
    }
}

/// Name of the first missing level of the envelope, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingParameter {
    Data,
    Attributes,
}

impl MissingParameter {
    pub fn name(&self) -> &'static str {
        match self {
            MissingParameter::Data => "data",
            MissingParameter::Attributes => "attributes",
        }
    }
}

impl UserRequestDocument {
    /// Unwrap `data.attributes`.
    ///
    /// A level that is absent or empty counts as missing, so `{"data": {}}`
    /// reports `data` and an attributes object without any permitted field
    /// reports `attributes`.
    pub fn into_attributes(self) -> Result<UserRequestAttributes, MissingParameter> {
        let data = self
            .data
            .filter(|data| !data.is_empty())
            .ok_or(MissingParameter::Data)?;

        data.attributes
            .filter(|attributes| !attributes.is_empty())
            .ok_or(MissingParameter::Attributes)
    }
}

impl UserRequestData {
    fn is_empty(&self) -> bool {
        self.kind.is_none() && self.attributes.is_none()
    }
}

impl UserRequestAttributes {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.password_confirmation.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::domain::pagination::PageRequest;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Name;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;

    fn user(id: i64) -> User {
        let now = Utc::now();
        User {
            id: UserId(id),
            name: Name::new("Ada Lovelace".to_string()).unwrap(),
            username: Username::new("ada".to_string()).unwrap(),
            email: EmailAddress::new(format!("ada{id}@example.com")).unwrap(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_document_hides_password_hash() {
        let document = UserDocument::from(&user(5));
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(
            value,
            json!({
                "data": {
                    "id": "5",
                    "type": "user",
                    "attributes": {
                        "name": "Ada Lovelace",
                        "username": "ada",
                        "email": "ada5@example.com"
                    }
                }
            })
        );
        assert_eq!(document.data.location(), "/api/v1/users/5");
    }

    #[test]
    fn test_collection_document_meta_and_links() {
        let page = Page::new(
            vec![user(21), user(22)],
            PageRequest {
                page: 3,
                per_page: 10,
            },
            50,
        );
        let value = serde_json::to_value(UserCollectionDocument::from(&page)).unwrap();

        assert_eq!(value["data"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["meta"]["pagination"],
            json!({"page": 3, "per_page": 10, "total_pages": 5, "total_count": 50})
        );
        assert_eq!(value["links"]["self"], "/api/v1/users?page=3&per_page=10");
        assert_eq!(value["links"]["prev"], "/api/v1/users?page=2&per_page=10");
        assert_eq!(value["links"]["next"], "/api/v1/users?page=4&per_page=10");
        assert_eq!(value["links"]["last"], "/api/v1/users?page=5&per_page=10");
    }

    #[test]
    fn test_empty_collection_links() {
        let page: Page<User> = Page::new(
            vec![],
            PageRequest {
                page: 1,
                per_page: 10,
            },
            0,
        );
        let value = serde_json::to_value(UserCollectionDocument::from(&page)).unwrap();

        assert_eq!(value["meta"]["pagination"]["total_pages"], 0);
        assert_eq!(value["links"]["last"], "/api/v1/users?page=1&per_page=10");
        assert!(value["links"].get("prev").is_none());
        assert!(value["links"].get("next").is_none());
    }

    #[test]
    fn test_request_document_missing_levels() {
        let missing_data: UserRequestDocument =
            serde_json::from_value(json!({"name": "Ada"})).unwrap();
        assert!(matches!(
            missing_data.into_attributes(),
            Err(MissingParameter::Data)
        ));

        let missing_attributes: UserRequestDocument =
            serde_json::from_value(json!({"data": {"type": "user"}})).unwrap();
        assert!(matches!(
            missing_attributes.into_attributes(),
            Err(MissingParameter::Attributes)
        ));
    }

    #[test]
    fn test_request_document_empty_levels_are_missing() {
        let empty_data: UserRequestDocument =
            serde_json::from_value(json!({"data": {}})).unwrap();
        assert_eq!(empty_data.into_attributes().unwrap_err(), MissingParameter::Data);

        let empty_attributes: UserRequestDocument =
            serde_json::from_value(json!({"data": {"attributes": {}}})).unwrap();
        assert_eq!(
            empty_attributes.into_attributes().unwrap_err(),
            MissingParameter::Attributes
        );

        let only_unpermitted: UserRequestDocument = serde_json::from_value(json!({
            "data": {"type": "user", "attributes": {"admin": true}}
        }))
        .unwrap();
        assert_eq!(
            only_unpermitted.into_attributes().unwrap_err(),
            MissingParameter::Attributes
        );
    }

    #[test]
    fn test_request_document_into_draft() {
        let document: UserRequestDocument = serde_json::from_value(json!({
            "data": {
                "type": "user",
                "attributes": {"name": "Ada", "email": "ada@example.com", "admin": true}
            }
        }))
        .unwrap();

        let draft = UserDraft::from(document.into_attributes().unwrap());
        assert_eq!(draft.name.as_deref(), Some("Ada"));
        assert_eq!(draft.email.as_deref(), Some("ada@example.com"));
        assert!(draft.password.is_none());
    }
}
