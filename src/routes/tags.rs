use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::tags::{get_tag, list_tags as list_tags_service};

#[get("/tags/")]
pub async fn list_tags(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_tags_service(repo.get_ref()) {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(err) => service_error_response(err, "list tags"),
    }
}

#[get("/tags/{tag_id}/")]
pub async fn show_tag(
    tag_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_tag(repo.get_ref(), tag_id.into_inner()) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => service_error_response(err, "load tag"),
    }
}
