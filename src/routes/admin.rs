use actix_web::{get, patch, web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;

use crate::envelope::ApiResponse;
use crate::errors::ApiError;
use crate::establish_connection;
use crate::extractors::auth::AdminUser;
use crate::models::{get_safe_user_fields, CreatorProfile, ProfileWithUser, SafeUser, User};
use crate::schema::creator_profiles::columns::approved_by_admin;
use crate::schema::creator_profiles::dsl::creator_profiles;
use crate::schema::users::dsl::users;

#[get("/creators/pending")]
pub async fn pending_creators(_admin: AdminUser) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let pending: Vec<ProfileWithUser> = creator_profiles
        .inner_join(users)
        .select((
            crate::schema::creator_profiles::id,
            crate::schema::creator_profiles::user_id,
            crate::schema::creator_profiles::bio,
            crate::schema::creator_profiles::platform_links,
            crate::schema::creator_profiles::audience_size,
            crate::schema::creator_profiles::category,
            crate::schema::creator_profiles::approved_by_admin,
            crate::schema::creator_profiles::created_at,
            get_safe_user_fields(),
        ))
        .filter(approved_by_admin.eq(false))
        .order(crate::schema::creator_profiles::created_at.desc())
        .load::<ProfileWithUser>(&mut db)?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(pending)))
}

#[derive(Deserialize)]
pub struct ApproveParams {
    pub profile_id: i32,
}

// The approved flag only moves false -> true; a second approval is an error,
// never a silent no-op.
fn ensure_not_yet_approved(profile: &CreatorProfile) -> Result<(), ApiError> {
    if profile.approved_by_admin {
        Err(ApiError::AlreadyApproved)
    } else {
        Ok(())
    }
}

#[patch("/creators/{profile_id}/approve")]
pub async fn approve_creator(
    _admin: AdminUser,
    params: web::Path<ApproveParams>,
) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let profile = creator_profiles
        .find(params.profile_id)
        .first::<CreatorProfile>(&mut db)
        .optional()?
        .ok_or_else(|| ApiError::NotFound(String::from("Creator profile not found")))?;

    ensure_not_yet_approved(&profile)?;

    let updated: CreatorProfile = diesel::update(creator_profiles.find(params.profile_id))
        .set(approved_by_admin.eq(true))
        .get_result(&mut db)?;

    diesel::update(users.find(profile.user_id))
        .set(crate::schema::users::is_verified.eq(true))
        .execute(&mut db)?;

    let owner: User = users.find(profile.user_id).first(&mut db)?;

    Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(
        ProfileWithUser::new(updated, SafeUser::from(&owner)),
        "Creator approved successfully",
    )))
}
