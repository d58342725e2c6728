use diesel::prelude::*;
use diesel::sql_types::Text;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::ingredient::{
    Ingredient as DomainIngredient, IngredientListQuery, NewIngredient as DomainNewIngredient,
};
use crate::models::ingredient::{Ingredient as DbIngredient, NewIngredient as DbNewIngredient};
use crate::repository::{DieselRepository, IngredientReader, IngredientWriter};

// SQLite `GLOB` is case-sensitive, unlike `LIKE`.
diesel::infix_operator!(Glob, " GLOB ");

impl IngredientReader for DieselRepository {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<DomainIngredient>> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let ingredient = ingredients::table
            .filter(ingredients::id.eq(id))
            .first::<DbIngredient>(&mut conn)
            .optional()?;

        Ok(ingredient.map(Into::into))
    }

    fn list_ingredients(
        &self,
        query: IngredientListQuery,
    ) -> RepositoryResult<Vec<DomainIngredient>> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;

        let mut items = ingredients::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(prefix) = query.name_prefix.as_ref() {
            let pattern = format!("{}*", escape_glob(prefix));
            items = items.filter(Glob::new(ingredients::name, pattern.into_sql::<Text>()));
        }

        let db_ingredients = items
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .load::<DbIngredient>(&mut conn)?;

        Ok(db_ingredients.into_iter().map(Into::into).collect())
    }
}

impl IngredientWriter for DieselRepository {
    fn create_ingredients(
        &self,
        new_ingredients: &[DomainNewIngredient],
    ) -> RepositoryResult<usize> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut inserted = 0;

            for new_ingredient in new_ingredients {
                let insertable = DbNewIngredient::from(new_ingredient);
                inserted += diesel::insert_or_ignore_into(ingredients::table)
                    .values(&insertable)
                    .execute(conn)?;
            }

            Ok(inserted)
        })
    }
}

/// Escape `LIKE` wildcards so user input is matched literally.
/// Wrap glob metacharacters in brackets so they match literally.
fn escape_glob(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(ch);
                escaped.push(']');
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}
