use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::DieselRepository;
use crate::routes::{paginated, parse_query, service_error_response};
use crate::services::users::{
    SubscriptionQuery, UserQuery, get_user, list_subscriptions as list_subscriptions_service,
    list_users as list_users_service, me, subscribe as subscribe_service,
    unsubscribe as unsubscribe_service,
};

#[get("/users/")]
pub async fn list_users(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query::<UserQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match list_users_service(repo.get_ref(), user.as_ref(), query) {
        Ok(page) => paginated(&req, page),
        Err(err) => service_error_response(err, "list users"),
    }
}

#[get("/users/me/")]
pub async fn show_me(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match me(repo.get_ref(), user.as_ref()) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(err) => service_error_response(err, "load current user"),
    }
}

#[get("/users/subscriptions/")]
/// Authors the user follows, each with their latest recipes.
pub async fn list_subscriptions(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query::<SubscriptionQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match list_subscriptions_service(repo.get_ref(), user.as_ref(), query) {
        Ok(page) => paginated(&req, page),
        Err(err) => service_error_response(err, "list subscriptions"),
    }
}

#[get("/users/{user_id}/")]
pub async fn show_user(
    user_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_user(repo.get_ref(), user.as_ref(), user_id.into_inner()) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(err) => service_error_response(err, "load user"),
    }
}

#[post("/users/{user_id}/subscribe/")]
pub async fn subscribe(
    req: HttpRequest,
    user_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query::<SubscriptionQuery>(&req) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match subscribe_service(repo.get_ref(), user.as_ref(), user_id.into_inner(), query) {
        Ok(card) => HttpResponse::Created().json(card),
        Err(err) => service_error_response(err, "subscribe"),
    }
}

#[delete("/users/{user_id}/subscribe/")]
pub async fn unsubscribe(
    user_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match unsubscribe_service(repo.get_ref(), user.as_ref(), user_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err, "unsubscribe"),
    }
}
