use actix_web::{get, post, web, HttpMessage, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::{AddFood, AddUser};
use crate::query;

pub(crate) const FOOD_ADDED: &str = "Food item added successfully";
pub(crate) const USER_CREATED: &str = "You have created a user! Welcome to our site!";

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(add_food)
        .service(get_all_food)
        .service(get_food_by_menu_type)
        .service(add_user)
        .service(get_user);
}

/// Parses a JSON body, refusing anything not labelled `application/json`.
fn json_body<T: DeserializeOwned>(req: &HttpRequest, body: &[u8]) -> Result<T, AppError> {
    if req.content_type() != "application/json" {
        return Err(AppError::UnsupportedContentType);
    }
    Ok(serde_json::from_slice(body)?)
}

#[post("/food/add")]
async fn add_food(
    req: HttpRequest,
    body: web::Bytes,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let payload: AddFood = json_body(&req, &body)?;
    //fail before taking a connection
    payload.validate()?;

    web::block(move || {
        let conn = pool.get()?;
        let new_food = payload.validate()?;
        query::create_food(&conn, &new_food)
    })
    .await??;

    Ok(HttpResponse::Created().json(FOOD_ADDED))
}

#[get("/food/get")]
async fn get_all_food(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let foods = web::block(move || {
        let conn = pool.get()?;
        query::find_all_foods(&conn)
    })
    .await??;
    Ok(HttpResponse::Ok().json(foods))
}

#[get("/food/get/{menu_type}")]
async fn get_food_by_menu_type(
    menu_type: web::Path<String>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let foods = web::block(move || {
        let conn = pool.get()?;
        query::find_foods_by_menu_type(&conn, &menu_type)
    })
    .await??;
    Ok(HttpResponse::Ok().json(foods))
}

#[post("/user/add")]
async fn add_user(
    req: HttpRequest,
    body: web::Bytes,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let payload: AddUser = json_body(&req, &body)?;
    payload.validate()?;

    web::block(move || {
        let conn = pool.get()?;
        let (username, password) = payload.validate()?;
        query::create_user(&conn, username, password)
    })
    .await??;

    Ok(HttpResponse::Created().json(USER_CREATED))
}

#[get("/user/get/{id}")]
async fn get_user(
    user_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = user_id.into_inner();
    let user = web::block(move || {
        let conn = pool.get()?;
        query::find_user(&conn, user_id)
    })
    .await??;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::UserNotFound(user_id)),
    }
}
