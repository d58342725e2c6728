use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::domain::recipe::{Recipe, RecipeListQuery, RecipeMark, RecipeSummary};
use crate::forms::recipes::RecipeForm;
use crate::repository::{
    RecipeMarkWriter, RecipeReader, RecipeWriter, ShoppingListReader, UserReader, UserWriter,
};
use crate::services::users::{require_user, viewer_id};
use crate::services::{
    Page, ServiceError, ServiceResult, ensure_page_exists, parse_flag, parse_page,
    parse_page_size,
};

/// Query parameters accepted by the recipe list. `tags` may repeat.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

const UNKNOWN_REFERENCE: &str = "Указан несуществующий ингредиент или тег.";

fn parse_author(raw: Option<&str>) -> ServiceResult<Option<i32>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ServiceError::Form("Некорректный идентификатор автора.".to_string())),
    }
}

/// Repository `NotFound` on a recipe write means a referenced ingredient or tag is missing.
fn reference_error(err: ServiceError) -> ServiceError {
    match err {
        ServiceError::NotFound => ServiceError::Form(UNKNOWN_REFERENCE.to_string()),
        other => other,
    }
}

fn mark_messages(mark: RecipeMark) -> (&'static str, &'static str) {
    match mark {
        RecipeMark::Favorite => (
            "Рецепт уже в избранном.",
            "Рецепт не был добавлен ранее в избранное.",
        ),
        RecipeMark::ShoppingCart => (
            "Вы уже добавили рецепт в список покупок.",
            "Рецепт не был добавлен в список покупок.",
        ),
    }
}

/// Recipes visible to the viewer, newest first.
pub fn list_recipes<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    query: RecipeQuery,
) -> ServiceResult<Page<Recipe>>
where
    R: RecipeReader + UserReader + UserWriter + ?Sized,
{
    let page = parse_page(query.page.as_deref())?;
    let per_page = parse_page_size(query.limit.as_deref());
    let author_id = parse_author(query.author.as_deref())?;
    let viewer_id = viewer_id(repo, identity)?;

    let mut list_query = RecipeListQuery::new(viewer_id);

    if let Some(author_id) = author_id {
        list_query = list_query.author(author_id);
    }

    let slugs: Vec<String> = query
        .tags
        .iter()
        .map(|slug| slug.trim())
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .collect();
    if !slugs.is_empty() {
        list_query = list_query.tags(slugs);
    }

    if parse_flag(query.is_favorited.as_deref()) {
        list_query = list_query.only_favorited();
    }

    if parse_flag(query.is_in_shopping_cart.as_deref()) {
        list_query = list_query.only_in_shopping_cart();
    }

    list_query = list_query.paginate(page, per_page);

    let (total, recipes) = repo.list_recipes(list_query)?;
    ensure_page_exists(page, per_page, total)?;

    Ok(Page::new(total, page, per_page, recipes))
}

pub fn get_recipe<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    recipe_id: i32,
) -> ServiceResult<Recipe>
where
    R: RecipeReader + UserReader + UserWriter + ?Sized,
{
    let viewer_id = viewer_id(repo, identity)?;

    repo.get_recipe_by_id(recipe_id, viewer_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_recipe<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    form: RecipeForm,
) -> ServiceResult<Recipe>
where
    R: RecipeWriter + UserReader + UserWriter + ?Sized,
{
    let user = require_user(repo, identity)?;

    let new_recipe = form
        .into_new_recipe(user.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_recipe(&new_recipe)
        .map_err(|err| reference_error(err.into()))
}

/// Load a recipe the user is about to change and check they wrote it.
fn owned_recipe<R>(repo: &R, user_id: i32, recipe_id: i32) -> ServiceResult<Recipe>
where
    R: RecipeReader + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id, Some(user_id))?
        .ok_or(ServiceError::NotFound)?;

    if recipe.author.user.id != user_id {
        return Err(ServiceError::Forbidden);
    }

    Ok(recipe)
}

/// Replace the recipe, its ingredients and tags. Only the author may do this.
pub fn update_recipe<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    recipe_id: i32,
    form: RecipeForm,
) -> ServiceResult<Recipe>
where
    R: RecipeReader + RecipeWriter + UserReader + UserWriter + ?Sized,
{
    let user = require_user(repo, identity)?;
    owned_recipe(repo, user.id, recipe_id)?;

    let update = form
        .into_update_recipe(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_recipe(recipe_id, user.id, &update)
        .map_err(|err| reference_error(err.into()))?
        .ok_or(ServiceError::Forbidden)
}

pub fn delete_recipe<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    recipe_id: i32,
) -> ServiceResult<()>
where
    R: RecipeReader + RecipeWriter + UserReader + UserWriter + ?Sized,
{
    let user = require_user(repo, identity)?;
    owned_recipe(repo, user.id, recipe_id)?;

    if !repo.delete_recipe(recipe_id, user.id)? {
        return Err(ServiceError::Forbidden);
    }

    Ok(())
}

/// Put the recipe into the user's favorites or shopping cart.
pub fn add_mark<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    recipe_id: i32,
    mark: RecipeMark,
) -> ServiceResult<RecipeSummary>
where
    R: RecipeReader + RecipeMarkWriter + UserReader + UserWriter + ?Sized,
{
    let user = require_user(repo, identity)?;
    let recipe = repo
        .get_recipe_by_id(recipe_id, Some(user.id))?
        .ok_or(ServiceError::NotFound)?;

    if !repo.add_recipe_mark(mark, user.id, recipe.id)? {
        let (already_marked, _) = mark_messages(mark);
        return Err(ServiceError::Form(already_marked.to_string()));
    }

    Ok(recipe.summary())
}

pub fn remove_mark<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    recipe_id: i32,
    mark: RecipeMark,
) -> ServiceResult<()>
where
    R: RecipeReader + RecipeMarkWriter + UserReader + UserWriter + ?Sized,
{
    let user = require_user(repo, identity)?;
    let recipe = repo
        .get_recipe_by_id(recipe_id, Some(user.id))?
        .ok_or(ServiceError::NotFound)?;

    if !repo.remove_recipe_mark(mark, user.id, recipe.id)? {
        let (_, not_marked) = mark_messages(mark);
        return Err(ServiceError::Form(not_marked.to_string()));
    }

    Ok(())
}

/// Plain-text shopping list for the user's cart.
pub fn download_shopping_list<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
) -> ServiceResult<String>
where
    R: ShoppingListReader + UserReader + UserWriter + ?Sized,
{
    let user = require_user(repo, identity)?;
    let list = repo.get_shopping_list(user.id)?;

    log::debug!("Shopping list for user {} has {} items", user.id, list.items.len());
    Ok(list.render())
}
