use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::tag::Tag;
use crate::domain::user::UserProfile;

/// Ingredient line of a recipe: the ingredient itself plus the quantity used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Identifier of the referenced ingredient.
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Recipe annotated for a particular viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredient>,
    pub name: String,
    pub image: Option<String>,
    #[serde(rename = "text")]
    pub description: String,
    /// Cooking time in minutes.
    pub cooking_time: i32,
    /// Whether the viewer has the recipe in favorites.
    pub is_favorited: bool,
    /// Whether the viewer has the recipe in the shopping cart.
    pub is_in_shopping_cart: bool,
    #[serde(skip)]
    pub created_at: NaiveDateTime,
}

impl Recipe {
    /// Short representation used in favorites, cart and subscription responses.
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Short representation of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

/// Quantity of an ingredient requested for a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

impl IngredientAmount {
    pub fn new(ingredient_id: i32, amount: i32) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// Payload required to insert a recipe together with its ingredients and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub author_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub description: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
    pub tag_ids: Vec<i32>,
}

/// Full replacement of a recipe. Ingredients and tags replace the stored sets
/// entirely; `image` keeps the stored value when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecipe {
    pub name: String,
    pub image: Option<String>,
    pub description: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
    pub tag_ids: Vec<i32>,
    pub updated_at: NaiveDateTime,
}

/// Per-user marker a recipe can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeMark {
    Favorite,
    ShoppingCart,
}

/// Query definition used to list recipes for a viewer.
#[derive(Debug, Clone, Default)]
pub struct RecipeListQuery {
    /// Viewer the favorite/cart/subscription flags are computed for.
    pub viewer_id: Option<i32>,
    pub author_id: Option<i32>,
    /// Recipes carrying at least one of these tag slugs.
    pub tag_slugs: Vec<String>,
    pub only_favorited: bool,
    pub only_in_shopping_cart: bool,
    pub pagination: Option<Pagination>,
}

impl RecipeListQuery {
    /// Construct a query over all recipes as seen by `viewer_id`.
    pub fn new(viewer_id: Option<i32>) -> Self {
        Self {
            viewer_id,
            ..Self::default()
        }
    }

    pub fn author(mut self, author_id: i32) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn tags<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_slugs = slugs.into_iter().map(Into::into).collect();
        self
    }

    pub fn only_favorited(mut self) -> Self {
        self.only_favorited = true;
        self
    }

    pub fn only_in_shopping_cart(mut self) -> Self {
        self.only_in_shopping_cart = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
