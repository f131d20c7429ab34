use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::envelope::ApiResponse;
use crate::errors::ApiError;
use crate::establish_connection;
use crate::helpers::requests::validation_error;
use crate::helpers::tokens::issue_token;
use crate::models::{NewUser, SafeUser, User};
use crate::schema::users::columns::email;
use crate::schema::users::dsl::users;

#[derive(Deserialize, Validate)]
pub struct SignupInfo {
    #[validate(email(message = "Invalid email format"))]
    email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: String,
}

#[derive(Serialize)]
struct AuthData {
    user: SafeUser,
    token: String,
}

#[post("/signup")]
pub async fn signup(data: web::Json<SignupInfo>) -> Result<HttpResponse, ApiError> {
    data.validate().map_err(|e| validation_error(&e))?;

    let mut db = establish_connection()?;

    let existing = users
        .filter(email.eq(&data.email))
        .first::<User>(&mut db)
        .optional()?;

    if existing.is_some() {
        return Err(ApiError::Conflict(String::from(
            "User with this email already exists",
        )));
    }

    let password_hash = hash(&data.password, 4)?;

    let new_user = NewUser {
        email: &data.email,
        password_hash: &password_hash,
        role: "USER",
    };

    let user: User = diesel::insert_into(users)
        .values(&new_user)
        .get_result(&mut db)?;

    let token = issue_token(&user)?;

    Ok(HttpResponse::Created().json(ApiResponse::data(AuthData {
        user: SafeUser::from(&user),
        token,
    })))
}

#[derive(Deserialize)]
pub struct LoginInfo {
    email: String,
    password: String,
}

#[post("/login")]
pub async fn login(data: web::Json<LoginInfo>) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let user = users
        .filter(email.eq(&data.email))
        .first::<User>(&mut db)
        .optional()?
        .ok_or_else(|| ApiError::Unauthorized(String::from("Invalid email or password")))?;

    let valid = match verify(&data.password, &user.password_hash) {
        Ok(v) => v,
        Err(_) => false,
    };

    if !valid {
        return Err(ApiError::Unauthorized(String::from(
            "Invalid email or password",
        )));
    }

    let token = issue_token(&user)?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(AuthData {
        user: SafeUser::from(&user),
        token,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected() {
        let body = SignupInfo {
            email: String::from("bob@x.com"),
            password: String::from("abc"),
        };
        let err = validation_error(&body.validate().unwrap_err());
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn malformed_email_is_rejected() {
        let body = SignupInfo {
            email: String::from("not-an-email"),
            password: String::from("secret1"),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn valid_signup_input_passes() {
        let body = SignupInfo {
            email: String::from("bob@x.com"),
            password: String::from("secret1"),
        };
        assert!(body.validate().is_ok());
    }
}
