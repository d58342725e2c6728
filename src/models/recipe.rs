use chrono::{Local, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::recipe::{
    IngredientAmount as DomainIngredientAmount, NewRecipe as DomainNewRecipe,
    RecipeIngredient as DomainRecipeIngredient, RecipeSummary as DomainRecipeSummary,
    UpdateRecipe as DomainUpdateRecipe,
};

use super::ingredient::Ingredient;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(belongs_to(super::user::User, foreign_key = author_id))]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub description: String,
    pub cooking_time: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub description: &'a str,
    pub cooking_time: i32,
    pub updated_at: NaiveDateTime,
}

/// Changeset for the recipe row itself. `image: None` leaves the column untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct UpdateRecipe<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub description: &'a str,
    pub cooking_time: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::recipe_ingredients,
    belongs_to(Recipe, foreign_key = recipe_id),
    belongs_to(Ingredient, foreign_key = ingredient_id)
)]
pub struct RecipeIngredient {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

impl From<Recipe> for DomainRecipeSummary {
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            name: value.name,
            image: value.image,
            cooking_time: value.cooking_time,
        }
    }
}

impl From<(RecipeIngredient, Ingredient)> for DomainRecipeIngredient {
    fn from((line, ingredient): (RecipeIngredient, Ingredient)) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

impl<'a> From<&'a DomainNewRecipe> for NewRecipe<'a> {
    fn from(value: &'a DomainNewRecipe) -> Self {
        Self {
            author_id: value.author_id,
            name: value.name.as_str(),
            image: value.image.as_deref(),
            description: value.description.as_str(),
            cooking_time: value.cooking_time,
            updated_at: Local::now().naive_utc(),
        }
    }
}

impl<'a> From<&'a DomainUpdateRecipe> for UpdateRecipe<'a> {
    fn from(value: &'a DomainUpdateRecipe) -> Self {
        Self {
            name: value.name.as_str(),
            image: value.image.as_deref(),
            description: value.description.as_str(),
            cooking_time: value.cooking_time,
            updated_at: value.updated_at,
        }
    }
}

impl NewRecipeIngredient {
    pub fn from_domain(recipe_id: i32, value: &DomainIngredientAmount) -> Self {
        Self {
            recipe_id,
            ingredient_id: value.ingredient_id,
            amount: value.amount,
        }
    }
}

impl NewRecipeTag {
    pub fn new(recipe_id: i32, tag_id: i32) -> Self {
        Self { recipe_id, tag_id }
    }
}
