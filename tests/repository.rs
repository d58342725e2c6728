use chrono::Utc;
use pushkind_common::repository::errors::RepositoryError;

use foodgram::domain::ingredient::{IngredientListQuery, NewIngredient};
use foodgram::domain::recipe::{IngredientAmount, RecipeListQuery, RecipeMark, UpdateRecipe};
use foodgram::domain::subscription::SubscriptionListQuery;
use foodgram::domain::tag::NewTag;
use foodgram::domain::user::{NewUser, UserListQuery};
use foodgram::repository::{
    DieselRepository, IngredientReader, IngredientWriter, RecipeMarkWriter, RecipeReader,
    RecipeWriter, ShoppingListReader, SubscriptionReader, SubscriptionWriter, TagReader,
    TagWriter, UserReader, UserWriter,
};

mod common;

#[test]
fn test_user_repository_provisioning() {
    let test_db = common::TestDb::new("test_user_repository_provisioning.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .create_user(&NewUser::new("Cook@Example.com", "cook", "Иван", "Петров"))
        .unwrap();
    let again = repo
        .create_user(&NewUser::new("cook@example.com", "other", "", ""))
        .unwrap();

    assert_eq!(first.id, again.id);
    assert_eq!(again.username, "cook");
    assert_eq!(
        repo.get_user_by_email("COOK@example.com").unwrap().map(|u| u.id),
        Some(first.id)
    );

    common::create_user(&repo, "anna");
    let (total, page) = repo
        .list_users(UserListQuery::new().paginate(2, 1))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].username, "anna");

    let (total, page) = repo
        .list_users(UserListQuery::new().paginate(usize::MAX, usize::MAX))
        .unwrap();
    assert_eq!(total, 2);
    assert!(page.is_empty());
}

#[test]
fn test_catalog_skips_duplicates_and_searches_by_prefix() {
    let test_db = common::TestDb::new("test_catalog.db");
    let repo = DieselRepository::new(test_db.pool());

    let inserted = repo
        .create_ingredients(&[
            NewIngredient::new("мука", "г"),
            NewIngredient::new("мука", "кг"),
            NewIngredient::new("масло", "г"),
            NewIngredient::new("100% сок", "мл"),
            NewIngredient::new("Salt", "g"),
        ])
        .unwrap();
    assert_eq!(inserted, 5);

    let inserted = repo
        .create_ingredients(&[NewIngredient::new("мука", "г"), NewIngredient::new("соль", "г")])
        .unwrap();
    assert_eq!(inserted, 1);

    let found = repo
        .list_ingredients(IngredientListQuery::new().name_prefix("му"))
        .unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|ingredient| ingredient.name == "мука"));

    let escaped = repo
        .list_ingredients(IngredientListQuery::new().name_prefix("100%"))
        .unwrap();
    assert_eq!(escaped.len(), 1);
    for wildcard in ["%", "*", "?"] {
        let found = repo
            .list_ingredients(IngredientListQuery::new().name_prefix(wildcard))
            .unwrap();
        assert!(found.is_empty(), "{wildcard} acted as a wildcard");
    }

    let exact_case = repo
        .list_ingredients(IngredientListQuery::new().name_prefix("Sa"))
        .unwrap();
    assert_eq!(exact_case.len(), 1);
    let other_case = repo
        .list_ingredients(IngredientListQuery::new().name_prefix("sa"))
        .unwrap();
    assert!(other_case.is_empty());

    assert_eq!(
        repo.create_tags(&[
            NewTag::new("Ужин", "#8775d2", "dinner"),
            NewTag::new("Ужин поздний", "#8775d2", "dinner"),
        ])
        .unwrap(),
        1
    );
    let tags = repo.list_tags().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].color, "#8775D2");
    assert!(repo.get_tag_by_id(tags[0].id).unwrap().is_some());
}

#[test]
fn test_recipe_round_trip() {
    let test_db = common::TestDb::new("test_recipe_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = common::create_user(&repo, "chef");
    let (ingredients, tags) = common::seed_catalog(&repo);

    let created = repo
        .create_recipe(&common::new_recipe(
            author.id,
            "Блины",
            &[(ingredients[0], 200), (ingredients[1], 2), (ingredients[2], 500)],
            &[tags[0]],
        ))
        .unwrap();

    let loaded = repo
        .get_recipe_by_id(created.id, None)
        .unwrap()
        .expect("recipe exists");

    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "Блины");
    assert_eq!(loaded.cooking_time, 10);
    assert_eq!(loaded.author.user.id, author.id);
    assert_eq!(loaded.ingredients.len(), 3);
    assert_eq!(loaded.ingredients[0].id, ingredients[0]);
    assert_eq!(loaded.ingredients[0].measurement_unit, "г");
    assert_eq!(loaded.ingredients[0].amount, 200);
    assert_eq!(loaded.tags.len(), 1);
    assert_eq!(loaded.tags[0].slug, "breakfast");

    assert_eq!(repo.count_author_recipes(author.id).unwrap(), 1);
}

#[test]
fn test_recipe_update_replaces_associations() {
    let test_db = common::TestDb::new("test_recipe_update.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = common::create_user(&repo, "chef");
    let (ingredients, tags) = common::seed_catalog(&repo);

    let created = repo
        .create_recipe(&common::new_recipe(
            author.id,
            "Блины",
            &[(ingredients[0], 200), (ingredients[1], 2)],
            &[tags[0]],
        ))
        .unwrap();

    let update = UpdateRecipe {
        name: "Оладьи".to_string(),
        image: None,
        description: "Жарить.".to_string(),
        cooking_time: 25,
        ingredients: vec![IngredientAmount::new(ingredients[2], 250)],
        tag_ids: vec![tags[1], tags[0]],
        updated_at: Utc::now().naive_utc(),
    };
    let stranger = common::create_user(&repo, "stranger");
    assert!(repo
        .update_recipe(created.id, stranger.id, &update)
        .unwrap()
        .is_none());
    let untouched = repo.get_recipe_by_id(created.id, None).unwrap().unwrap();
    assert_eq!(untouched.name, "Блины");
    assert_eq!(untouched.ingredients.len(), 2);

    let updated = repo
        .update_recipe(created.id, author.id, &update)
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Оладьи");
    assert_eq!(updated.cooking_time, 25);
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].id, ingredients[2]);
    assert_eq!(updated.ingredients[0].amount, 250);
    assert_eq!(updated.tags.len(), 2);

    let err = repo
        .update_recipe(created.id + 100, author.id, &update)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_recipe_write_with_unknown_ingredient_rolls_back() {
    let test_db = common::TestDb::new("test_recipe_rollback.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = common::create_user(&repo, "chef");
    let (ingredients, tags) = common::seed_catalog(&repo);

    let err = repo
        .create_recipe(&common::new_recipe(
            author.id,
            "Призрак",
            &[(ingredients[0], 1), (9999, 1)],
            &[tags[0]],
        ))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let err = repo
        .create_recipe(&common::new_recipe(
            author.id,
            "Призрак",
            &[(ingredients[0], 1)],
            &[9999],
        ))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let (total, _) = repo.list_recipes(RecipeListQuery::new(None)).unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_recipe_annotations_follow_viewer() {
    let test_db = common::TestDb::new("test_recipe_annotations.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = common::create_user(&repo, "chef");
    let viewer = common::create_user(&repo, "guest");
    let (ingredients, tags) = common::seed_catalog(&repo);

    let first = repo
        .create_recipe(&common::new_recipe(author.id, "Каша", &[(ingredients[2], 200)], &[tags[0]]))
        .unwrap();
    let second = repo
        .create_recipe(&common::new_recipe(author.id, "Суп", &[(ingredients[0], 20)], &[tags[1]]))
        .unwrap();

    assert!(repo.add_recipe_mark(RecipeMark::Favorite, viewer.id, first.id).unwrap());
    assert!(repo.add_recipe_mark(RecipeMark::ShoppingCart, viewer.id, second.id).unwrap());
    assert!(repo.subscribe(viewer.id, author.id).unwrap());

    let (total, recipes) = repo.list_recipes(RecipeListQuery::new(Some(viewer.id))).unwrap();
    assert_eq!(total, 2);
    let soup = recipes.iter().find(|r| r.id == second.id).expect("soup listed");
    let porridge = recipes.iter().find(|r| r.id == first.id).expect("porridge listed");
    assert!(porridge.is_favorited && !porridge.is_in_shopping_cart);
    assert!(!soup.is_favorited && soup.is_in_shopping_cart);
    assert!(soup.author.is_subscribed);

    let (_, anonymous) = repo.list_recipes(RecipeListQuery::new(None)).unwrap();
    assert!(anonymous
        .iter()
        .all(|r| !r.is_favorited && !r.is_in_shopping_cart && !r.author.is_subscribed));

    let as_author = repo
        .get_recipe_by_id(first.id, Some(author.id))
        .unwrap()
        .expect("recipe exists");
    assert!(!as_author.is_favorited);
    assert!(!as_author.author.is_subscribed);
}

#[test]
fn test_recipe_list_filters_and_pagination() {
    let test_db = common::TestDb::new("test_recipe_filters.db");
    let repo = DieselRepository::new(test_db.pool());
    let chef = common::create_user(&repo, "chef");
    let cook = common::create_user(&repo, "cook");
    let (ingredients, tags) = common::seed_catalog(&repo);

    let mut ids = Vec::new();
    for (author, name, tag) in [
        (chef.id, "Омлет", tags[0]),
        (chef.id, "Борщ", tags[1]),
        (cook.id, "Сырники", tags[0]),
    ] {
        let recipe = repo
            .create_recipe(&common::new_recipe(author, name, &[(ingredients[1], 2)], &[tag]))
            .unwrap();
        ids.push(recipe.id);
    }

    let (total, _) = repo
        .list_recipes(RecipeListQuery::new(None).author(chef.id))
        .unwrap();
    assert_eq!(total, 2);

    let (total, breakfast) = repo
        .list_recipes(RecipeListQuery::new(None).tags(["breakfast"]))
        .unwrap();
    assert_eq!(total, 2);
    assert!(breakfast.iter().all(|r| r.tags[0].slug == "breakfast"));

    let (total, _) = repo
        .list_recipes(RecipeListQuery::new(None).tags(["breakfast", "lunch"]))
        .unwrap();
    assert_eq!(total, 3);

    repo.add_recipe_mark(RecipeMark::Favorite, cook.id, ids[1]).unwrap();
    let (total, favorites) = repo
        .list_recipes(RecipeListQuery::new(Some(cook.id)).only_favorited())
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(favorites[0].id, ids[1]);

    let (total, _) = repo
        .list_recipes(RecipeListQuery::new(None).only_favorited())
        .unwrap();
    assert_eq!(total, 0);

    let (total, page) = repo
        .list_recipes(RecipeListQuery::new(None).paginate(2, 2))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, ids[0]);

    let (total, page) = repo
        .list_recipes(RecipeListQuery::new(None).paginate(usize::MAX, 6))
        .unwrap();
    assert_eq!(total, 3);
    assert!(page.is_empty());

    let summaries = repo.list_author_recipes(chef.id, Some(1)).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, ids[1]);
}

#[test]
fn test_recipe_delete_removes_marks() {
    let test_db = common::TestDb::new("test_recipe_delete.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = common::create_user(&repo, "chef");
    let viewer = common::create_user(&repo, "guest");
    let (ingredients, tags) = common::seed_catalog(&repo);

    let recipe = repo
        .create_recipe(&common::new_recipe(author.id, "Пирог", &[(ingredients[0], 300)], &[tags[0]]))
        .unwrap();
    repo.add_recipe_mark(RecipeMark::ShoppingCart, viewer.id, recipe.id)
        .unwrap();

    assert!(!repo.delete_recipe(recipe.id, viewer.id).unwrap());
    assert!(repo.get_recipe_by_id(recipe.id, None).unwrap().is_some());

    assert!(repo.delete_recipe(recipe.id, author.id).unwrap());

    assert!(repo.get_recipe_by_id(recipe.id, None).unwrap().is_none());
    assert!(repo.get_shopping_list(viewer.id).unwrap().is_empty());
    assert!(matches!(
        repo.delete_recipe(recipe.id, author.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_recipe_marks_are_toggles() {
    let test_db = common::TestDb::new("test_recipe_marks.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = common::create_user(&repo, "chef");
    let (ingredients, tags) = common::seed_catalog(&repo);
    let recipe = repo
        .create_recipe(&common::new_recipe(author.id, "Чай", &[(ingredients[2], 50)], &[tags[0]]))
        .unwrap();

    for mark in [RecipeMark::Favorite, RecipeMark::ShoppingCart] {
        assert!(repo.add_recipe_mark(mark, author.id, recipe.id).unwrap());
        assert!(!repo.add_recipe_mark(mark, author.id, recipe.id).unwrap());
        assert!(repo.remove_recipe_mark(mark, author.id, recipe.id).unwrap());
        assert!(!repo.remove_recipe_mark(mark, author.id, recipe.id).unwrap());
    }
}

#[test]
fn test_shopping_list_sums_by_ingredient() {
    let test_db = common::TestDb::new("test_shopping_list.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = common::create_user(&repo, "chef");
    let buyer = common::create_user(&repo, "buyer");
    let (ingredients, tags) = common::seed_catalog(&repo);
    let (flour, eggs, milk) = (ingredients[0], ingredients[1], ingredients[2]);

    let a = repo
        .create_recipe(&common::new_recipe(author.id, "A", &[(flour, 100), (eggs, 2)], &[tags[0]]))
        .unwrap();
    let b = repo
        .create_recipe(&common::new_recipe(author.id, "B", &[(flour, 50)], &[tags[0]]))
        .unwrap();
    let c = repo
        .create_recipe(&common::new_recipe(author.id, "C", &[(milk, 1000)], &[tags[0]]))
        .unwrap();

    assert!(repo.get_shopping_list(buyer.id).unwrap().is_empty());

    repo.add_recipe_mark(RecipeMark::ShoppingCart, buyer.id, a.id).unwrap();
    repo.add_recipe_mark(RecipeMark::ShoppingCart, buyer.id, b.id).unwrap();
    // Other users' carts do not leak in.
    repo.add_recipe_mark(RecipeMark::ShoppingCart, author.id, c.id).unwrap();

    let list = repo.get_shopping_list(buyer.id).unwrap();

    assert_eq!(list.render(), "мука: 150 г\nяйца: 2 шт");
}

#[test]
fn test_subscriptions() {
    let test_db = common::TestDb::new("test_subscriptions.db");
    let repo = DieselRepository::new(test_db.pool());
    let reader = common::create_user(&repo, "reader");
    let boris = common::create_user(&repo, "boris");
    let anna = common::create_user(&repo, "anna");

    assert!(repo.subscribe(reader.id, boris.id).unwrap());
    assert!(repo.subscribe(reader.id, anna.id).unwrap());
    assert!(!repo.subscribe(reader.id, anna.id).unwrap());
    // The CHECK constraint turns a self-subscription into a no-op.
    assert!(!repo.subscribe(reader.id, reader.id).unwrap());

    let followed = repo
        .subscribed_author_ids(reader.id, &[boris.id, anna.id, reader.id])
        .unwrap();
    assert_eq!(followed.len(), 2);
    assert!(!followed.contains(&reader.id));

    let (total, authors) = repo
        .list_subscriptions(SubscriptionListQuery::new(reader.id))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(authors[0].username, "anna");
    assert_eq!(authors[1].username, "boris");

    assert!(repo.unsubscribe(reader.id, anna.id).unwrap());
    assert!(!repo.unsubscribe(reader.id, anna.id).unwrap());

    let (total, _) = repo
        .list_subscriptions(SubscriptionListQuery::new(reader.id).paginate(1, 6))
        .unwrap();
    assert_eq!(total, 1);
}
