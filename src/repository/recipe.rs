use std::collections::{HashMap, HashSet};

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Integer};
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::pagination::Pagination;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::recipe::{
        IngredientAmount, NewRecipe as DomainNewRecipe, Recipe as DomainRecipe,
        RecipeIngredient as DomainRecipeIngredient, RecipeListQuery, RecipeMark,
        RecipeSummary as DomainRecipeSummary, UpdateRecipe as DomainUpdateRecipe,
    },
    domain::tag::Tag as DomainTag,
    domain::user::UserProfile,
    models::ingredient::Ingredient as DbIngredient,
    models::recipe::{
        NewRecipe as DbNewRecipe, NewRecipeIngredient as DbNewRecipeIngredient,
        NewRecipeTag as DbNewRecipeTag, Recipe as DbRecipe,
        RecipeIngredient as DbRecipeIngredient, UpdateRecipe as DbUpdateRecipe,
    },
    models::tag::Tag as DbTag,
    models::user::User as DbUser,
    repository::{DieselRepository, RecipeReader, RecipeWriter, page_window},
    schema::recipes,
};

/// Boolean column computed per recipe row.
type RecipeFlag = Box<dyn BoxableExpression<recipes::table, Sqlite, SqlType = Bool>>;

fn mark_table(mark: RecipeMark) -> &'static str {
    match mark {
        RecipeMark::Favorite => "favorites",
        RecipeMark::ShoppingCart => "shopping_carts",
    }
}

/// Correlated `EXISTS` over the mark table for the current `recipes` row.
/// Anonymous viewers get a constant `false`.
fn mark_flag(mark: RecipeMark, viewer_id: Option<i32>) -> RecipeFlag {
    let Some(user_id) = viewer_id else {
        return Box::new(false.into_sql::<Bool>());
    };

    Box::new(
        sql::<Bool>("EXISTS (SELECT 1 FROM ")
            .sql(mark_table(mark))
            .sql(" AS mark WHERE mark.recipe_id = recipes.id AND mark.user_id = ")
            .bind::<Integer, _>(user_id)
            .sql(")"),
    )
}

fn filtered_recipes(query: &RecipeListQuery) -> recipes::BoxedQuery<'static, Sqlite> {
    use crate::schema::{recipe_tags, tags};

    let mut items = recipes::table.into_boxed::<Sqlite>();

    if let Some(author_id) = query.author_id {
        items = items.filter(recipes::author_id.eq(author_id));
    }

    if !query.tag_slugs.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(query.tag_slugs.clone()))
            .select(recipe_tags::recipe_id);
        items = items.filter(recipes::id.eq_any(tagged));
    }

    if query.only_favorited {
        items = items.filter(mark_flag(RecipeMark::Favorite, query.viewer_id));
    }

    if query.only_in_shopping_cart {
        items = items.filter(mark_flag(RecipeMark::ShoppingCart, query.viewer_id));
    }

    items
}

/// Load recipe rows with their viewer flags and attach authors, tags and ingredients.
fn load_recipes(
    conn: &mut SqliteConnection,
    items: recipes::BoxedQuery<'static, Sqlite>,
    viewer_id: Option<i32>,
    pagination: Option<&Pagination>,
) -> RepositoryResult<Vec<DomainRecipe>> {
    let mut annotated = items
        .select((
            DbRecipe::as_select(),
            mark_flag(RecipeMark::Favorite, viewer_id),
            mark_flag(RecipeMark::ShoppingCart, viewer_id),
        ))
        .order((recipes::created_at.desc(), recipes::id.desc()));

    if let Some(pagination) = pagination {
        let (offset, limit) = page_window(pagination);
        annotated = annotated.offset(offset).limit(limit);
    }

    let rows = annotated.load::<(DbRecipe, bool, bool)>(conn)?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = rows.iter().map(|(recipe, _, _)| recipe.id).collect();
    let author_ids: Vec<i32> = rows
        .iter()
        .map(|(recipe, _, _)| recipe.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let authors = load_authors(conn, &author_ids, viewer_id)?;
    let mut tags = load_tags_for_recipes(conn, &recipe_ids)?;
    let mut ingredients = load_ingredients_for_recipes(conn, &recipe_ids)?;

    let mut recipes = Vec::with_capacity(rows.len());
    for (recipe, is_favorited, is_in_shopping_cart) in rows {
        let author = authors
            .get(&recipe.author_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        recipes.push(DomainRecipe {
            id: recipe.id,
            tags: tags.remove(&recipe.id).unwrap_or_default(),
            author,
            ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
            name: recipe.name,
            image: recipe.image,
            description: recipe.description,
            cooking_time: recipe.cooking_time,
            is_favorited,
            is_in_shopping_cart,
            created_at: recipe.created_at,
        });
    }

    Ok(recipes)
}

fn load_authors(
    conn: &mut SqliteConnection,
    author_ids: &[i32],
    viewer_id: Option<i32>,
) -> RepositoryResult<HashMap<i32, UserProfile>> {
    use crate::schema::{subscriptions, users};

    let db_users = users::table
        .filter(users::id.eq_any(author_ids))
        .load::<DbUser>(conn)?;

    let followed: HashSet<i32> = match viewer_id {
        Some(viewer_id) => subscriptions::table
            .filter(subscriptions::subscriber_id.eq(viewer_id))
            .filter(subscriptions::author_id.eq_any(author_ids))
            .select(subscriptions::author_id)
            .load::<i32>(conn)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    Ok(db_users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            (user.id, UserProfile::new(user.into(), is_subscribed))
        })
        .collect())
}

fn load_tags_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{recipe_tags, tags};

    let rows = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order(recipe_tags::id.asc())
        .select((recipe_tags::recipe_id, DbTag::as_select()))
        .load::<(i32, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (recipe_id, tag) in rows {
        map.entry(recipe_id).or_default().push(tag.into());
    }

    Ok(map)
}

fn load_ingredients_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainRecipeIngredient>>> {
    use crate::schema::{ingredients, recipe_ingredients};

    let rows = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order(recipe_ingredients::id.asc())
        .select((DbRecipeIngredient::as_select(), DbIngredient::as_select()))
        .load::<(DbRecipeIngredient, DbIngredient)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainRecipeIngredient>> = HashMap::new();
    for (line, ingredient) in rows {
        map.entry(line.recipe_id)
            .or_default()
            .push((line, ingredient).into());
    }

    Ok(map)
}

fn load_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    viewer_id: Option<i32>,
) -> RepositoryResult<Option<DomainRecipe>> {
    let items = recipes::table
        .filter(recipes::id.eq(recipe_id))
        .into_boxed::<Sqlite>();

    Ok(load_recipes(conn, items, viewer_id, None)?.pop())
}

fn stored_author_id(conn: &mut SqliteConnection, recipe_id: i32) -> RepositoryResult<i32> {
    recipes::table
        .filter(recipes::id.eq(recipe_id))
        .select(recipes::author_id)
        .first::<i32>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)
}

/// Fails with `NotFound` unless every ingredient and tag id exists.
fn ensure_references_exist(
    conn: &mut SqliteConnection,
    ingredients: &[IngredientAmount],
    tag_ids: &[i32],
) -> RepositoryResult<()> {
    use crate::schema::{ingredients as ingredients_table, tags};

    let ingredient_ids: HashSet<i32> = ingredients.iter().map(|i| i.ingredient_id).collect();
    if !ingredient_ids.is_empty() {
        let ids: Vec<i32> = ingredient_ids.into_iter().collect();
        let found = ingredients_table::table
            .filter(ingredients_table::id.eq_any(&ids))
            .count()
            .get_result::<i64>(conn)? as usize;
        if found != ids.len() {
            return Err(RepositoryError::NotFound);
        }
    }

    let unique_tags: HashSet<i32> = tag_ids.iter().copied().collect();
    if !unique_tags.is_empty() {
        let ids: Vec<i32> = unique_tags.into_iter().collect();
        let found = tags::table
            .filter(tags::id.eq_any(&ids))
            .count()
            .get_result::<i64>(conn)? as usize;
        if found != ids.len() {
            return Err(RepositoryError::NotFound);
        }
    }

    Ok(())
}

fn insert_associations(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    ingredients: &[IngredientAmount],
    tag_ids: &[i32],
) -> RepositoryResult<()> {
    use crate::schema::{recipe_ingredients, recipe_tags};

    if !tag_ids.is_empty() {
        let payload: Vec<DbNewRecipeTag> = tag_ids
            .iter()
            .map(|tag_id| DbNewRecipeTag::new(recipe_id, *tag_id))
            .collect();

        diesel::insert_into(recipe_tags::table)
            .values(&payload)
            .execute(conn)?;
    }

    if !ingredients.is_empty() {
        let payload: Vec<DbNewRecipeIngredient> = ingredients
            .iter()
            .map(|amount| DbNewRecipeIngredient::from_domain(recipe_id, amount))
            .collect();

        diesel::insert_into(recipe_ingredients::table)
            .values(&payload)
            .execute(conn)?;
    }

    Ok(())
}

impl RecipeReader for DieselRepository {
    fn get_recipe_by_id(
        &self,
        id: i32,
        viewer_id: Option<i32>,
    ) -> RepositoryResult<Option<DomainRecipe>> {
        let mut conn = self.conn()?;
        load_recipe(&mut conn, id, viewer_id)
    }

    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<DomainRecipe>)> {
        let mut conn = self.conn()?;

        let total = filtered_recipes(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let recipes = load_recipes(
            &mut conn,
            filtered_recipes(&query),
            query.viewer_id,
            query.pagination.as_ref(),
        )?;

        Ok((total, recipes))
    }

    fn list_author_recipes(
        &self,
        author_id: i32,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<DomainRecipeSummary>> {
        let mut conn = self.conn()?;

        let mut items = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .into_boxed::<Sqlite>();

        if let Some(limit) = limit {
            items = items.limit(limit as i64);
        }

        let db_recipes = items.load::<DbRecipe>(&mut conn)?;

        Ok(db_recipes.into_iter().map(Into::into).collect())
    }

    fn count_author_recipes(&self, author_id: i32) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let total = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }
}

impl RecipeWriter for DieselRepository {
    fn create_recipe(&self, new_recipe: &DomainNewRecipe) -> RepositoryResult<DomainRecipe> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            ensure_references_exist(conn, &new_recipe.ingredients, &new_recipe.tag_ids)?;

            let db_new = DbNewRecipe::from(new_recipe);
            let created = diesel::insert_into(recipes::table)
                .values(&db_new)
                .get_result::<DbRecipe>(conn)?;

            insert_associations(
                conn,
                created.id,
                &new_recipe.ingredients,
                &new_recipe.tag_ids,
            )?;

            load_recipe(conn, created.id, Some(created.author_id))?
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn update_recipe(
        &self,
        recipe_id: i32,
        author_id: i32,
        updates: &DomainUpdateRecipe,
    ) -> RepositoryResult<Option<DomainRecipe>> {
        use crate::schema::{recipe_ingredients, recipe_tags};

        let mut conn = self.conn()?;

        conn.transaction::<Option<DomainRecipe>, RepositoryError, _>(|conn| {
            if stored_author_id(conn, recipe_id)? != author_id {
                return Ok(None);
            }

            ensure_references_exist(conn, &updates.ingredients, &updates.tag_ids)?;

            let db_updates = DbUpdateRecipe::from(updates);
            diesel::update(recipes::table.filter(recipes::id.eq(recipe_id)))
                .set(&db_updates)
                .execute(conn)?;

            // Associations are replaced wholesale, never merged.
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;

            insert_associations(conn, recipe_id, &updates.ingredients, &updates.tag_ids)?;

            load_recipe(conn, recipe_id, Some(author_id))?
                .map(Some)
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn delete_recipe(&self, recipe_id: i32, author_id: i32) -> RepositoryResult<bool> {
        use crate::schema::{favorites, recipe_ingredients, recipe_tags, shopping_carts};

        let mut conn = self.conn()?;

        conn.transaction::<bool, RepositoryError, _>(|conn| {
            if stored_author_id(conn, recipe_id)? != author_id {
                return Ok(false);
            }

            diesel::delete(favorites::table.filter(favorites::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(shopping_carts::table.filter(shopping_carts::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(recipes::table.filter(recipes::id.eq(recipe_id)))
                .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(true)
        })
    }
}
