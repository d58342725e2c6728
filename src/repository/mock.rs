use std::collections::HashSet;

use mockall::mock;

use super::{
    IngredientReader, RecipeMarkWriter, RecipeReader, RecipeWriter, ShoppingListReader,
    SubscriptionReader, SubscriptionWriter, TagReader, UserReader, UserWriter,
};
use crate::domain::{
    ingredient::{Ingredient, IngredientListQuery},
    recipe::{NewRecipe, Recipe, RecipeListQuery, RecipeMark, RecipeSummary, UpdateRecipe},
    shopping_list::ShoppingList,
    subscription::SubscriptionListQuery,
    tag::Tag,
    user::{NewUser, User, UserListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }
}

mock! {
    pub IngredientReader {}

    impl IngredientReader for IngredientReader {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
    }
}

// Stand-in for the full repository, used by services that span users,
// recipes and subscriptions.
mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }

    impl RecipeReader for Repository {
        fn get_recipe_by_id(&self, id: i32, viewer_id: Option<i32>) -> RepositoryResult<Option<Recipe>>;
        fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
        fn list_author_recipes(&self, author_id: i32, limit: Option<usize>) -> RepositoryResult<Vec<RecipeSummary>>;
        fn count_author_recipes(&self, author_id: i32) -> RepositoryResult<usize>;
    }

    impl RecipeWriter for Repository {
        fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
        fn update_recipe(&self, recipe_id: i32, author_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Option<Recipe>>;
        fn delete_recipe(&self, recipe_id: i32, author_id: i32) -> RepositoryResult<bool>;
    }

    impl RecipeMarkWriter for Repository {
        fn add_recipe_mark(&self, mark: RecipeMark, user_id: i32, recipe_id: i32) -> RepositoryResult<bool>;
        fn remove_recipe_mark(&self, mark: RecipeMark, user_id: i32, recipe_id: i32) -> RepositoryResult<bool>;
    }

    impl ShoppingListReader for Repository {
        fn get_shopping_list(&self, user_id: i32) -> RepositoryResult<ShoppingList>;
    }

    impl SubscriptionReader for Repository {
        fn subscribed_author_ids(&self, subscriber_id: i32, author_ids: &[i32]) -> RepositoryResult<HashSet<i32>>;
        fn list_subscriptions(&self, query: SubscriptionListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl SubscriptionWriter for Repository {
        fn subscribe(&self, subscriber_id: i32, author_id: i32) -> RepositoryResult<bool>;
        fn unsubscribe(&self, subscriber_id: i32, author_id: i32) -> RepositoryResult<bool>;
    }
}
