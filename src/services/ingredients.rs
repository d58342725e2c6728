use serde::Deserialize;

use crate::domain::ingredient::{Ingredient, IngredientListQuery};
use crate::repository::IngredientReader;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the ingredient list.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Name prefix to search for.
    pub name: Option<String>,
}

pub fn list_ingredients<R>(repo: &R, query: IngredientQuery) -> ServiceResult<Vec<Ingredient>>
where
    R: IngredientReader + ?Sized,
{
    let mut list_query = IngredientListQuery::new();

    if let Some(prefix) = query.name.as_deref().map(str::trim)
        && !prefix.is_empty()
    {
        list_query = list_query.name_prefix(prefix);
    }

    repo.list_ingredients(list_query)
        .map_err(ServiceError::from)
}

pub fn get_ingredient<R>(repo: &R, ingredient_id: i32) -> ServiceResult<Ingredient>
where
    R: IngredientReader + ?Sized,
{
    repo.get_ingredient_by_id(ingredient_id)?
        .ok_or(ServiceError::NotFound)
}
