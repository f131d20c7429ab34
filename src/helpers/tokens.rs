use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::user::UserClaim;
use crate::errors::ApiError;
use crate::models::User;

const TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| String::from("dev-secret-change-in-production"))
}

/// Signs a bearer token carrying the user's identity snapshot. Role changes
/// after issuance are not reflected until the user logs in again.
pub fn issue_token(user: &User) -> Result<String, ApiError> {
    let claim = UserClaim {
        id: user.id,
        email: user.email.clone(),
        role: user.role.clone(),
        exp: Utc::now().timestamp() + TOKEN_LIFETIME_SECS,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to sign token");
        ApiError::Internal
    })
}

/// Checks signature and expiry; bad signature, malformed payload and expiry
/// all surface as `Unauthorized`.
pub fn decode_token(token: &str) -> Result<UserClaim, ApiError> {
    let data = decode::<UserClaim>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn test_user() -> User {
        User {
            id: 7,
            email: String::from("bob@x.com"),
            password_hash: String::from("$2b$04$irrelevant"),
            role: String::from("USER"),
            is_verified: false,
            created_at: NaiveDateTime::from_timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let user = test_user();
        let token = issue_token(&user).unwrap();
        let claim = decode_token(&token).unwrap();

        assert_eq!(claim.id, user.id);
        assert_eq!(claim.email, user.email);
        assert_eq!(claim.role, user.role);
        assert!(claim.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claim = UserClaim {
            id: 7,
            email: String::from("bob@x.com"),
            role: String::from("USER"),
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claim,
            &EncodingKey::from_secret(jwt_secret().as_bytes()),
        )
        .unwrap();

        assert!(decode_token(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(&test_user()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();

        assert!(decode_token(&tampered).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_token("not-a-token").is_err());
    }
}
