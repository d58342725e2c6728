use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::recipe::{IngredientAmount, NewRecipe, UpdateRecipe};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a recipe name.
pub const NAME_MAX_LEN: usize = 200;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the recipe form helpers.
pub type RecipeFormResult<T> = Result<T, RecipeFormError>;

/// Errors that can occur while processing a recipe payload.
#[derive(Debug, Error)]
pub enum RecipeFormError {
    /// Validation failures from the `validator` crate.
    #[error("Некорректные данные: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Название рецепта не может быть пустым.")]
    EmptyName,
    #[error("Описание рецепта не может быть пустым.")]
    EmptyText,
    #[error("Поле ingredients обязательно.")]
    MissingIngredients,
    #[error("Поле tags обязательно.")]
    MissingTags,
    #[error("Нужен хотя бы один ингредиент.")]
    NoIngredients,
    #[error("Нужен хотя бы один тег.")]
    NoTags,
    #[error("Ингредиент {0} указан несколько раз.")]
    DuplicateIngredient(i32),
    #[error("Тег {0} указан несколько раз.")]
    DuplicateTag(i32),
    #[error("Количество ингредиента {0} не может быть отрицательным.")]
    NegativeAmount(i32),
}

/// One `{id, amount}` entry of the `ingredients` list.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RecipeIngredientForm {
    pub id: i32,
    pub amount: i32,
}

/// JSON body accepted by recipe create and update.
#[derive(Debug, Deserialize, Validate)]
pub struct RecipeForm {
    pub ingredients: Option<Vec<RecipeIngredientForm>>,
    pub tags: Option<Vec<i32>>,
    /// Opaque image reference stored as is.
    pub image: Option<String>,
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    /// Cooking time in minutes.
    #[validate(range(min = 1))]
    pub cooking_time: i32,
}

/// Validated and sanitized recipe fields shared by create and update.
struct CleanRecipe {
    name: String,
    image: Option<String>,
    description: String,
    cooking_time: i32,
    ingredients: Vec<IngredientAmount>,
    tag_ids: Vec<i32>,
}

impl RecipeForm {
    /// Validates the payload into a domain `NewRecipe` owned by `author_id`.
    pub fn into_new_recipe(self, author_id: i32) -> RecipeFormResult<NewRecipe> {
        let clean = self.clean()?;

        Ok(NewRecipe {
            author_id,
            name: clean.name,
            image: clean.image,
            description: clean.description,
            cooking_time: clean.cooking_time,
            ingredients: clean.ingredients,
            tag_ids: clean.tag_ids,
        })
    }

    /// Validates the payload into a full replacement of an existing recipe.
    pub fn into_update_recipe(self, updated_at: NaiveDateTime) -> RecipeFormResult<UpdateRecipe> {
        let clean = self.clean()?;

        Ok(UpdateRecipe {
            name: clean.name,
            image: clean.image,
            description: clean.description,
            cooking_time: clean.cooking_time,
            ingredients: clean.ingredients,
            tag_ids: clean.tag_ids,
            updated_at,
        })
    }

    fn clean(self) -> RecipeFormResult<CleanRecipe> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(RecipeFormError::EmptyName);
        }

        let description = sanitize_multiline_text(&self.text);
        if description.is_empty() {
            return Err(RecipeFormError::EmptyText);
        }

        let ingredients = self.ingredients.ok_or(RecipeFormError::MissingIngredients)?;
        if ingredients.is_empty() {
            return Err(RecipeFormError::NoIngredients);
        }

        let mut seen = HashSet::with_capacity(ingredients.len());
        let mut amounts = Vec::with_capacity(ingredients.len());
        for entry in ingredients {
            if !seen.insert(entry.id) {
                return Err(RecipeFormError::DuplicateIngredient(entry.id));
            }
            if entry.amount < 0 {
                return Err(RecipeFormError::NegativeAmount(entry.id));
            }
            amounts.push(IngredientAmount::new(entry.id, entry.amount));
        }

        let tag_ids = self.tags.ok_or(RecipeFormError::MissingTags)?;
        if tag_ids.is_empty() {
            return Err(RecipeFormError::NoTags);
        }

        let mut seen = HashSet::with_capacity(tag_ids.len());
        for tag_id in &tag_ids {
            if !seen.insert(*tag_id) {
                return Err(RecipeFormError::DuplicateTag(*tag_id));
            }
        }

        let image = self
            .image
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(CleanRecipe {
            name,
            image,
            description,
            cooking_time: self.cooking_time,
            ingredients: amounts,
            tag_ids,
        })
    }
}
