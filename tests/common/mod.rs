//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use foodgram::domain::ingredient::{IngredientListQuery, NewIngredient};
use foodgram::domain::recipe::{IngredientAmount, NewRecipe};
use foodgram::domain::tag::NewTag;
use foodgram::domain::user::{NewUser, User};
use foodgram::repository::{
    DieselRepository, IngredientReader, IngredientWriter, TagReader, TagWriter, UserWriter,
};
use pushkind_common::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary migrated database, removed together with its directory on drop.
pub struct TestDb {
    pool: DbPool,
    path: String,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir.");
        let path = dir.path().join(filename).to_string_lossy().into_owned();

        let pool =
            establish_connection_pool(&path).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        TestDb {
            pool,
            path,
            _dir: dir,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

pub fn create_user(repo: &DieselRepository, username: &str) -> User {
    repo.create_user(&NewUser::new(
        format!("{username}@example.com"),
        username,
        username,
        "",
    ))
    .expect("create user")
}

/// Seeds `мука (г)`, `яйца (шт)`, `молоко (мл)` and the tags `breakfast`, `lunch`.
/// Returns `(ingredient ids, tag ids)` in that order.
pub fn seed_catalog(repo: &DieselRepository) -> (Vec<i32>, Vec<i32>) {
    repo.create_ingredients(&[
        NewIngredient::new("мука", "г"),
        NewIngredient::new("яйца", "шт"),
        NewIngredient::new("молоко", "мл"),
    ])
    .expect("create ingredients");
    repo.create_tags(&[
        NewTag::new("Завтрак", "#E26C2D", "breakfast"),
        NewTag::new("Обед", "#49B64E", "lunch"),
    ])
    .expect("create tags");

    let ingredients = repo
        .list_ingredients(IngredientListQuery::new())
        .expect("list ingredients");
    let id_of = |name: &str| {
        ingredients
            .iter()
            .find(|ingredient| ingredient.name == name)
            .map(|ingredient| ingredient.id)
            .expect("seeded ingredient")
    };
    let ingredient_ids = vec![id_of("мука"), id_of("яйца"), id_of("молоко")];

    let tags = repo.list_tags().expect("list tags");
    let slug_of = |slug: &str| {
        tags.iter()
            .find(|tag| tag.slug == slug)
            .map(|tag| tag.id)
            .expect("seeded tag")
    };
    let tag_ids = vec![slug_of("breakfast"), slug_of("lunch")];

    (ingredient_ids, tag_ids)
}

pub fn new_recipe(
    author_id: i32,
    name: &str,
    ingredients: &[(i32, i32)],
    tag_ids: &[i32],
) -> NewRecipe {
    NewRecipe {
        author_id,
        name: name.to_string(),
        image: None,
        description: format!("Как приготовить {name}."),
        cooking_time: 10,
        ingredients: ingredients
            .iter()
            .map(|(id, amount)| IngredientAmount::new(*id, *amount))
            .collect(),
        tag_ids: tag_ids.to_vec(),
    }
}
