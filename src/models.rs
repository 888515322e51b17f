use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::schema::{food, users};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub(crate) struct Food {
    pub id: i32,
    pub title: String,
    pub price: String, //kept verbatim, never parsed
    pub menu_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fk: Option<i32>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[table_name = "food"]
pub(crate) struct NewFood<'a> {
    pub title: &'a str,
    pub price: &'a str,
    pub menu_type: &'a str,
    pub user_fk: Option<i32>,
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[table_name = "users"]
pub(crate) struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A user as sent to clients, with owned food nested as `meal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct UserDetail {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub meal: Vec<Food>,
}

impl UserDetail {
    pub(crate) fn new(user: User, meal: Vec<Food>) -> Self {
        UserDetail {
            id: user.id,
            username: user.username,
            password: user.password,
            meal,
        }
    }
}

/// Body of `POST /food/add`. Keys are optional here so that a missing one
/// surfaces as a validation error instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AddFood {
    pub title: Option<String>,
    pub price: Option<String>,
    #[serde(rename = "menu-type")]
    pub menu_type: Option<String>,
    pub user_fk: Option<i32>,
}

impl AddFood {
    pub(crate) fn validate(&self) -> Result<NewFood<'_>, AppError> {
        let title = self.title.as_deref().ok_or(AppError::Validation("title"))?;
        let price = self.price.as_deref().ok_or(AppError::Validation("price"))?;
        let menu_type = self
            .menu_type
            .as_deref()
            .ok_or(AppError::Validation("menu-type"))?;

        Ok(NewFood {
            title,
            price,
            menu_type,
            user_fk: self.user_fk,
        })
    }
}

/// Body of `POST /user/add`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AddUser {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AddUser {
    pub(crate) fn validate(&self) -> Result<(&str, &str), AppError> {
        let username = self
            .username
            .as_deref()
            .ok_or(AppError::Validation("username"))?;
        let password = self
            .password
            .as_deref()
            .ok_or(AppError::Validation("password"))?;
        Ok((username, password))
    }
}
