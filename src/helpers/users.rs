use diesel::prelude::*;

use crate::errors::ApiError;
use crate::models::User;
use crate::schema::users::dsl::users;

pub fn get_user_by_id(db: &mut PgConnection, user_id: i32) -> Result<Option<User>, ApiError> {
    let user = users.find(user_id).first::<User>(db).optional()?;
    Ok(user)
}
