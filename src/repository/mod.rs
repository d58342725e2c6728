use std::collections::HashSet;

use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    ingredient::{Ingredient, IngredientListQuery, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, RecipeMark, RecipeSummary, UpdateRecipe},
    shopping_list::ShoppingList,
    subscription::SubscriptionListQuery,
    tag::{NewTag, Tag},
    user::{NewUser, User, UserListQuery},
};

pub mod ingredient;
pub mod recipe;
pub mod recipe_mark;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// `OFFSET` and `LIMIT` for a page. Values beyond `i64::MAX` saturate, which
/// yields an empty page instead of wrapping.
pub(crate) fn page_window(pagination: &Pagination) -> (i64, i64) {
    let offset = pagination
        .page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(pagination.per_page);
    (
        i64::try_from(offset).unwrap_or(i64::MAX),
        i64::try_from(pagination.per_page).unwrap_or(i64::MAX),
    )
}

/// Read-only operations over user records.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over user records.
pub trait UserWriter {
    /// Insert the user, or return the stored row when the email is taken.
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

/// Read-only operations over tags.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tags.
pub trait TagWriter {
    /// Insert tags, skipping slugs that already exist. Returns the number inserted.
    fn create_tags(&self, new_tags: &[NewTag]) -> RepositoryResult<usize>;
}

/// Read-only operations over ingredients.
pub trait IngredientReader {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
    fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
}

/// Write operations over ingredients.
pub trait IngredientWriter {
    /// Insert ingredients, skipping existing `(name, unit)` pairs. Returns the number inserted.
    fn create_ingredients(&self, new_ingredients: &[NewIngredient]) -> RepositoryResult<usize>;
}

/// Read-only operations over recipes, annotated for a viewer.
pub trait RecipeReader {
    fn get_recipe_by_id(&self, id: i32, viewer_id: Option<i32>)
    -> RepositoryResult<Option<Recipe>>;
    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
    /// Newest recipes of an author, optionally truncated to `limit`.
    fn list_author_recipes(
        &self,
        author_id: i32,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<RecipeSummary>>;
    fn count_author_recipes(&self, author_id: i32) -> RepositoryResult<usize>;
}

/// Write operations over recipes. Every call is a single transaction.
pub trait RecipeWriter {
    fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
    /// Returns `None`, leaving the recipe untouched, when `author_id` is not its author.
    fn update_recipe(
        &self,
        recipe_id: i32,
        author_id: i32,
        updates: &UpdateRecipe,
    ) -> RepositoryResult<Option<Recipe>>;
    /// Returns `false`, deleting nothing, when `author_id` is not the author.
    fn delete_recipe(&self, recipe_id: i32, author_id: i32) -> RepositoryResult<bool>;
}

/// Favorite and shopping-cart membership.
pub trait RecipeMarkWriter {
    /// Returns `false` when the mark already existed.
    fn add_recipe_mark(&self, mark: RecipeMark, user_id: i32, recipe_id: i32)
    -> RepositoryResult<bool>;
    /// Returns `false` when there was no mark to remove.
    fn remove_recipe_mark(
        &self,
        mark: RecipeMark,
        user_id: i32,
        recipe_id: i32,
    ) -> RepositoryResult<bool>;
}

/// Aggregation of the ingredients in a user's shopping cart.
pub trait ShoppingListReader {
    fn get_shopping_list(&self, user_id: i32) -> RepositoryResult<ShoppingList>;
}

/// Read-only operations over subscriptions.
pub trait SubscriptionReader {
    /// Subset of `author_ids` the subscriber follows.
    fn subscribed_author_ids(
        &self,
        subscriber_id: i32,
        author_ids: &[i32],
    ) -> RepositoryResult<HashSet<i32>>;
    /// Authors followed by the subscriber, ordered by username.
    fn list_subscriptions(
        &self,
        query: SubscriptionListQuery,
    ) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over subscriptions.
pub trait SubscriptionWriter {
    /// Returns `false` when the subscription already existed.
    fn subscribe(&self, subscriber_id: i32, author_id: i32) -> RepositoryResult<bool>;
    /// Returns `false` when there was no subscription to remove.
    fn unsubscribe(&self, subscriber_id: i32, author_id: i32) -> RepositoryResult<bool>;
}
