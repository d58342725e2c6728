use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::recipe::RecipeSummary;
use crate::domain::user::UserProfile;

/// Followed author together with a preview of their recipes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorCard {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: usize,
}

/// Query definition used to list the authors a user follows.
#[derive(Debug, Clone)]
pub struct SubscriptionListQuery {
    pub subscriber_id: i32,
    pub pagination: Option<Pagination>,
}

impl SubscriptionListQuery {
    pub fn new(subscriber_id: i32) -> Self {
        Self {
            subscriber_id,
            pagination: None,
        }
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
