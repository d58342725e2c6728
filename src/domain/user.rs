use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Account that publishes recipes and follows other authors.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// User as seen by a particular viewer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    /// Whether the viewer is subscribed to this user.
    pub is_subscribed: bool,
}

impl UserProfile {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            user,
            is_subscribed,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            username: username.into().trim().to_string(),
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
        }
    }
}

impl From<&AuthenticatedUser> for NewUser {
    /// Provision a local account from identity claims issued by the auth service.
    fn from(value: &AuthenticatedUser) -> Self {
        let display_name = value.name.trim();
        let username = if display_name.is_empty() {
            value
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            display_name.to_string()
        };

        let (first_name, last_name) = match display_name.split_once(char::is_whitespace) {
            Some((first, last)) => (first, last),
            None => (display_name, ""),
        };

        NewUser::new(value.email.as_str(), username, first_name, last_name)
    }
}

/// Query definition used to list users.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
