use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::errors::ApiError;
use crate::establish_connection;
use crate::helpers::tokens::decode_token;
use crate::helpers::users::get_user_by_id;

/// The authenticated caller. The token only proves identity; the user row is
/// reloaded so the effective role and existence are the stored ones.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: String,
}

fn extract_bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let token = extract_bearer_token(req)
        .ok_or_else(|| ApiError::Unauthorized(String::from("No token provided")))?;

    let claim = decode_token(token)?;

    let mut db = establish_connection()?;
    let user = get_user_by_id(&mut db, claim.id)?
        .ok_or_else(|| ApiError::Unauthorized(String::from("User not found")))?;

    Ok(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
    })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// An authenticated caller whose stored role is "ADMIN".
pub struct AdminUser(pub AuthUser);

fn require_admin(user: AuthUser) -> Result<AdminUser, ApiError> {
    if user.role == "ADMIN" {
        Ok(AdminUser(user))
    } else {
        Err(ApiError::Forbidden(String::from(
            "Forbidden: Insufficient permissions",
        )))
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(require_admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::ResponseError;

    #[test]
    fn bearer_token_is_extracted() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_malformed_header_yields_none() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Token abc"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), None);
    }

    #[test]
    fn non_admin_roles_are_forbidden() {
        for role in ["USER", "CREATOR"] {
            let user = AuthUser {
                id: 1,
                email: String::from("a@b.co"),
                role: String::from(role),
            };
            let err = require_admin(user).err().unwrap();
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn admin_role_passes() {
        let user = AuthUser {
            id: 1,
            email: String::from("a@b.co"),
            role: String::from("ADMIN"),
        };
        assert!(require_admin(user).is_ok());
    }
}
