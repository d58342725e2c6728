use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, Scope, web};
use pushkind_common::routes::logout;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::services::{Page, ServiceError};

pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

/// Every JSON endpoint, mounted under `/api`.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(tags::list_tags)
        .service(tags::show_tag)
        .service(ingredients::list_ingredients)
        .service(ingredients::show_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        // Literal segments must precede `{id}` patterns.
        .service(recipes::download_shopping_cart)
        .service(recipes::show_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::add_favorite)
        .service(recipes::remove_favorite)
        .service(recipes::add_to_shopping_cart)
        .service(recipes::remove_from_shopping_cart)
        .service(users::list_users)
        .service(users::show_me)
        .service(users::list_subscriptions)
        .service(users::show_user)
        .service(users::subscribe)
        .service(users::unsubscribe)
        .service(web::scope("/auth").service(logout))
}

const NOT_FOUND_DETAIL: &str = "Страница не найдена.";
const UNAUTHORIZED_DETAIL: &str = "Учетные данные не были предоставлены.";
const FORBIDDEN_DETAIL: &str = "У вас недостаточно прав для выполнения данного действия.";

/// `{"errors": message}` with status 400.
pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "errors": message.into() }))
}

/// Map a service failure to its HTTP response. Unexpected failures are logged
/// with `action` as context.
pub fn service_error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Form(message) => bad_request(message),
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "detail": NOT_FOUND_DETAIL })),
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(json!({ "detail": UNAUTHORIZED_DETAIL }))
        }
        ServiceError::Forbidden => HttpResponse::Forbidden().json(json!({ "detail": FORBIDDEN_DETAIL })),
        ServiceError::Repository(err) => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Decode the query string with support for repeated keys.
pub fn parse_query<T: DeserializeOwned>(req: &HttpRequest) -> Result<T, HttpResponse> {
    serde_html_form::from_str(req.query_string()).map_err(|err| {
        log::debug!("Rejected query string `{}`: {err}", req.query_string());
        bad_request("Некорректные параметры запроса.")
    })
}

/// Renders malformed JSON bodies as `{"errors": ...}` instead of plain text.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

#[derive(Serialize)]
struct PageEnvelope<T> {
    count: usize,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<T>,
}

/// Absolute URL of the current request with `page` replaced. Page 1 drops the
/// parameter altogether.
fn page_link(req: &HttpRequest, page: usize) -> String {
    let mut params: Vec<(String, String)> =
        serde_html_form::from_str(req.query_string()).unwrap_or_default();
    params.retain(|(key, _)| key != "page");
    if page > 1 {
        params.push(("page".to_string(), page.to_string()));
    }

    let info = req.connection_info();
    let base = format!("{}://{}{}", info.scheme(), info.host(), req.path());

    match serde_html_form::to_string(&params) {
        Ok(query) if !query.is_empty() => format!("{base}?{query}"),
        _ => base,
    }
}

/// `{count, next, previous, results}` response for one page.
pub fn paginated<T: Serialize>(req: &HttpRequest, page: Page<T>) -> HttpResponse {
    let next = page.has_next().then(|| page_link(req, page.page + 1));
    let previous = page.has_previous().then(|| page_link(req, page.page - 1));

    HttpResponse::Ok().json(PageEnvelope {
        count: page.count,
        next,
        previous,
        results: page.results,
    })
}
