use actix_web::http::header::{ContentDisposition, ContentType};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::recipe::RecipeMark;
use crate::domain::shopping_list::SHOPPING_LIST_FILENAME;
use crate::forms::recipes::RecipeForm;
use crate::repository::DieselRepository;
use crate::routes::{paginated, parse_query, service_error_response};
use crate::services::recipes::{
    RecipeQuery, add_mark, create_recipe as create_recipe_service,
    delete_recipe as delete_recipe_service, download_shopping_list, get_recipe,
    list_recipes as list_recipes_service, remove_mark, update_recipe as update_recipe_service,
};

#[get("/recipes/")]
/// Paginated recipes, filterable by author, tags, favorites and cart.
pub async fn list_recipes(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query::<RecipeQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match list_recipes_service(repo.get_ref(), user.as_ref(), query) {
        Ok(page) => paginated(&req, page),
        Err(err) => service_error_response(err, "list recipes"),
    }
}

#[post("/recipes/")]
pub async fn create_recipe(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    form: web::Json<RecipeForm>,
) -> impl Responder {
    match create_recipe_service(repo.get_ref(), user.as_ref(), form.into_inner()) {
        Ok(recipe) => {
            log::info!("Recipe {} created by user {}", recipe.id, recipe.author.user.id);
            HttpResponse::Created().json(recipe)
        }
        Err(err) => service_error_response(err, "create recipe"),
    }
}

#[get("/recipes/download_shopping_cart/")]
/// The user's shopping list as a `text/plain` attachment.
pub async fn download_shopping_cart(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match download_shopping_list(repo.get_ref(), user.as_ref()) {
        Ok(text) => shopping_list_response(text),
        Err(err) => service_error_response(err, "build shopping list"),
    }
}

fn shopping_list_response(text: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .insert_header(ContentDisposition::attachment(SHOPPING_LIST_FILENAME))
        .body(text)
}

#[get("/recipes/{recipe_id}/")]
pub async fn show_recipe(
    recipe_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_recipe(repo.get_ref(), user.as_ref(), recipe_id.into_inner()) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => service_error_response(err, "load recipe"),
    }
}

#[patch("/recipes/{recipe_id}/")]
/// Replace a recipe. Only its author may do this.
pub async fn update_recipe(
    recipe_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    form: web::Json<RecipeForm>,
) -> impl Responder {
    match update_recipe_service(
        repo.get_ref(),
        user.as_ref(),
        recipe_id.into_inner(),
        form.into_inner(),
    ) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => service_error_response(err, "update recipe"),
    }
}

#[delete("/recipes/{recipe_id}/")]
pub async fn delete_recipe(
    recipe_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let recipe_id = recipe_id.into_inner();
    match delete_recipe_service(repo.get_ref(), user.as_ref(), recipe_id) {
        Ok(()) => {
            log::info!("Recipe {recipe_id} deleted");
            HttpResponse::NoContent().finish()
        }
        Err(err) => service_error_response(err, "delete recipe"),
    }
}

fn mark_recipe(
    repo: &DieselRepository,
    user: Option<&AuthenticatedUser>,
    recipe_id: i32,
    mark: RecipeMark,
) -> HttpResponse {
    match add_mark(repo, user, recipe_id, mark) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(err) => service_error_response(err, "mark recipe"),
    }
}

fn unmark_recipe(
    repo: &DieselRepository,
    user: Option<&AuthenticatedUser>,
    recipe_id: i32,
    mark: RecipeMark,
) -> HttpResponse {
    match remove_mark(repo, user, recipe_id, mark) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err, "unmark recipe"),
    }
}

#[post("/recipes/{recipe_id}/favorite/")]
pub async fn add_favorite(
    recipe_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    mark_recipe(
        repo.get_ref(),
        user.as_ref(),
        recipe_id.into_inner(),
        RecipeMark::Favorite,
    )
}

#[delete("/recipes/{recipe_id}/favorite/")]
pub async fn remove_favorite(
    recipe_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    unmark_recipe(
        repo.get_ref(),
        user.as_ref(),
        recipe_id.into_inner(),
        RecipeMark::Favorite,
    )
}

#[post("/recipes/{recipe_id}/shopping_cart/")]
pub async fn add_to_shopping_cart(
    recipe_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    mark_recipe(
        repo.get_ref(),
        user.as_ref(),
        recipe_id.into_inner(),
        RecipeMark::ShoppingCart,
    )
}

#[delete("/recipes/{recipe_id}/shopping_cart/")]
pub async fn remove_from_shopping_cart(
    recipe_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    unmark_recipe(
        repo.get_ref(),
        user.as_ref(),
        recipe_id.into_inner(),
        RecipeMark::ShoppingCart,
    )
}
