use actix_web::{post, web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use validator::Validate;

use crate::envelope::ApiResponse;
use crate::errors::ApiError;
use crate::establish_connection;
use crate::helpers::requests::validation_error;
use crate::models::{NewWaitlistEntry, WaitlistEntry};
use crate::schema::waitlist_entries::dsl::waitlist_entries;

#[derive(Deserialize, Validate)]
pub struct WaitlistBody {
    #[validate(email(message = "Invalid email format"))]
    user_email: String,
    #[validate(length(min = 1, message = "Email and interest type are required"))]
    interested_in: String,
    note: Option<String>,
}

// Repeated submissions from the same email create independent records.
#[post("")]
pub async fn join_waitlist(data: web::Json<WaitlistBody>) -> Result<HttpResponse, ApiError> {
    data.validate().map_err(|e| validation_error(&e))?;

    let mut db = establish_connection()?;

    let entry: WaitlistEntry = diesel::insert_into(waitlist_entries)
        .values(&NewWaitlistEntry {
            user_email: &data.user_email,
            interested_in: &data.interested_in,
            note: data.note.as_deref(),
        })
        .get_result(&mut db)?;

    Ok(HttpResponse::Created().json(ApiResponse::data_with_message(
        entry,
        "Successfully added to waitlist",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(user_email: &str, interested_in: &str) -> WaitlistBody {
        WaitlistBody {
            user_email: String::from(user_email),
            interested_in: String::from(interested_in),
            note: None,
        }
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = validation_error(&body("not-an-email", "USER").validate().unwrap_err());
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[test]
    fn missing_interest_kind_is_rejected() {
        assert!(body("a@b.co", "").validate().is_err());
    }

    #[test]
    fn valid_submission_passes() {
        assert!(body("a@b.co", "USER").validate().is_ok());
    }
}
