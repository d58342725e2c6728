use diesel::dsl::sum;
use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::shopping_list::{ShoppingList, ShoppingListItem};
use crate::repository::{DieselRepository, ShoppingListReader};

impl ShoppingListReader for DieselRepository {
    fn get_shopping_list(&self, user_id: i32) -> RepositoryResult<ShoppingList> {
        use crate::schema::{ingredients, recipe_ingredients, shopping_carts};

        let mut conn = self.conn()?;

        let cart_recipes = shopping_carts::table
            .filter(shopping_carts::user_id.eq(user_id))
            .select(shopping_carts::recipe_id);

        let rows = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(cart_recipes))
            .group_by((ingredients::name, ingredients::measurement_unit))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                sum(recipe_ingredients::amount),
            ))
            .order((sum(recipe_ingredients::amount).desc(), ingredients::name.asc()))
            .load::<(String, String, Option<i64>)>(&mut conn)?;

        let items = rows
            .into_iter()
            .map(|(name, measurement_unit, total)| {
                ShoppingListItem::new(name, measurement_unit, total.unwrap_or_default())
            })
            .collect();

        Ok(ShoppingList::new(items))
    }
}
