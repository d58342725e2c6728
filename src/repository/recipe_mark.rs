use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::recipe::RecipeMark;
use crate::models::recipe_mark::{NewFavorite, NewShoppingCartItem};
use crate::repository::{DieselRepository, RecipeMarkWriter};

impl RecipeMarkWriter for DieselRepository {
    fn add_recipe_mark(
        &self,
        mark: RecipeMark,
        user_id: i32,
        recipe_id: i32,
    ) -> RepositoryResult<bool> {
        use crate::schema::{favorites, shopping_carts};

        let mut conn = self.conn()?;

        // The unique (user_id, recipe_id) index turns a duplicate into a no-op.
        let inserted = match mark {
            RecipeMark::Favorite => diesel::insert_or_ignore_into(favorites::table)
                .values(&NewFavorite { user_id, recipe_id })
                .execute(&mut conn)?,
            RecipeMark::ShoppingCart => diesel::insert_or_ignore_into(shopping_carts::table)
                .values(&NewShoppingCartItem { user_id, recipe_id })
                .execute(&mut conn)?,
        };

        Ok(inserted > 0)
    }

    fn remove_recipe_mark(
        &self,
        mark: RecipeMark,
        user_id: i32,
        recipe_id: i32,
    ) -> RepositoryResult<bool> {
        use crate::schema::{favorites, shopping_carts};

        let mut conn = self.conn()?;

        let deleted = match mark {
            RecipeMark::Favorite => diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            )
            .execute(&mut conn)?,
            RecipeMark::ShoppingCart => diesel::delete(
                shopping_carts::table
                    .filter(shopping_carts::user_id.eq(user_id))
                    .filter(shopping_carts::recipe_id.eq(recipe_id)),
            )
            .execute(&mut conn)?,
        };

        Ok(deleted > 0)
    }
}
