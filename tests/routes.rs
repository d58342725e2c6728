use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use pushkind_common::models::config::CommonServerConfig;
use serde_json::Value;

use foodgram::repository::{DieselRepository, RecipeWriter};
use foodgram::routes::{api_scope, json_error_handler};

mod common;

macro_rules! app {
    ($repo:expr) => {
        test::init_service(
            App::new()
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($repo))
                .app_data(web::Data::new(CommonServerConfig {
                    secret: String::new(),
                    auth_service_url: "http://auth.test".to_string(),
                }))
                .service(api_scope()),
        )
        .await
    };
}

/// Two recipes by `chef` over the seeded catalog.
fn seeded_repo(test_db: &common::TestDb) -> DieselRepository {
    let repo = DieselRepository::new(test_db.pool());
    let chef = common::create_user(&repo, "chef");
    let (ingredients, tags) = common::seed_catalog(&repo);

    repo.create_recipe(&common::new_recipe(chef.id, "Омлет", &[(ingredients[1], 3)], &[tags[0]]))
        .expect("create recipe");
    repo.create_recipe(&common::new_recipe(chef.id, "Блины", &[(ingredients[0], 200)], &[tags[0]]))
        .expect("create recipe");

    repo
}

#[actix_web::test]
async fn test_catalog_endpoints_are_public() {
    let test_db = common::TestDb::new("test_routes_catalog.db");
    let app = app!(seeded_repo(&test_db));

    let req = test::TestRequest::get().uri("/api/tags/").to_request();
    let tags: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tags.as_array().map(Vec::len), Some(2));
    assert!(tags[0].get("color").is_some());

    let req = test::TestRequest::get()
        .uri("/api/ingredients/?name=%D0%BC%D1%83")
        .to_request();
    let ingredients: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ingredients.as_array().map(Vec::len), Some(1));
    assert_eq!(ingredients[0]["name"], "мука");

    let req = test::TestRequest::get().uri("/api/tags/999/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_anonymous_recipe_list_is_paginated() {
    let test_db = common::TestDb::new("test_routes_recipe_list.db");
    let app = app!(seeded_repo(&test_db));

    let req = test::TestRequest::get()
        .uri("/api/recipes/?limit=1&tags=breakfast")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["count"], 2);
    assert!(body["previous"].is_null());
    let next = body["next"].as_str().expect("next link");
    assert!(next.ends_with("/api/recipes/?limit=1&tags=breakfast&page=2"));

    let recipe = &body["results"][0];
    assert_eq!(recipe["is_favorited"], false);
    assert_eq!(recipe["is_in_shopping_cart"], false);
    assert_eq!(recipe["author"]["is_subscribed"], false);
    assert!(recipe.get("text").is_some());
    assert!(recipe["ingredients"][0]["measurement_unit"].is_string());
}

#[actix_web::test]
async fn test_recipe_list_rejects_bad_page() {
    let test_db = common::TestDb::new("test_routes_bad_page.db");
    let app = app!(seeded_repo(&test_db));

    let req = test::TestRequest::get().uri("/api/recipes/?page=first").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"].is_string());

    let req = test::TestRequest::get().uri("/api/recipes/?page=9").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_missing_recipe_is_not_found() {
    let test_db = common::TestDb::new("test_routes_missing_recipe.db");
    let app = app!(seeded_repo(&test_db));

    let req = test::TestRequest::get().uri("/api/recipes/999/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Страница не найдена.");
}

#[actix_web::test]
async fn test_anonymous_writes_are_unauthorized() {
    let test_db = common::TestDb::new("test_routes_anonymous_writes.db");
    let app = app!(seeded_repo(&test_db));

    let req = test::TestRequest::post()
        .uri("/api/recipes/")
        .set_json(serde_json::json!({
            "ingredients": [{"id": 1, "amount": 1}],
            "tags": [1],
            "name": "Чай",
            "text": "Заварить.",
            "cooking_time": 5
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/recipes/download_shopping_cart/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post().uri("/api/recipes/1/favorite/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/users/me/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_malformed_json_is_a_form_error() {
    let test_db = common::TestDb::new("test_routes_malformed_json.db");
    let app = app!(seeded_repo(&test_db));

    let req = test::TestRequest::post()
        .uri("/api/recipes/")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"].is_string());
}

#[actix_web::test]
async fn test_users_are_listed_anonymously() {
    let test_db = common::TestDb::new("test_routes_users.db");
    let app = app!(seeded_repo(&test_db));

    let req = test::TestRequest::get().uri("/api/users/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["username"], "chef");
    assert_eq!(body["results"][0]["is_subscribed"], false);
}
