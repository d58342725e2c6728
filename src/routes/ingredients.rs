use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::{parse_query, service_error_response};
use crate::services::ingredients::{
    IngredientQuery, get_ingredient, list_ingredients as list_ingredients_service,
};

#[get("/ingredients/")]
/// All ingredients, or those whose name starts with `?name=`.
pub async fn list_ingredients(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query::<IngredientQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match list_ingredients_service(repo.get_ref(), query) {
        Ok(ingredients) => HttpResponse::Ok().json(ingredients),
        Err(err) => service_error_response(err, "list ingredients"),
    }
}

#[get("/ingredients/{ingredient_id}/")]
pub async fn show_ingredient(
    ingredient_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_ingredient(repo.get_ref(), ingredient_id.into_inner()) {
        Ok(ingredient) => HttpResponse::Ok().json(ingredient),
        Err(err) => service_error_response(err, "load ingredient"),
    }
}
