diesel::table! {
    analytics_events (id) {
        id -> Int4,
        video_id -> Int4,
        viewer_ip -> Varchar,
        created_at -> Timestamp,
    }
}

diesel::table! {
    creator_profiles (id) {
        id -> Int4,
        user_id -> Int4,
        bio -> Nullable<Text>,
        platform_links -> Nullable<Text>,
        audience_size -> Int4,
        category -> Nullable<Varchar>,
        approved_by_admin -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        email -> Varchar,
        password_hash -> Varchar,
        role -> Varchar,
        is_verified -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    videos (id) {
        id -> Int4,
        creator_id -> Int4,
        title -> Varchar,
        description -> Nullable<Text>,
        video_url -> Varchar,
        thumbnail_url -> Nullable<Varchar>,
        tags -> Array<Text>,
        category -> Nullable<Varchar>,
        status -> Varchar,
        views -> Int4,
        created_at -> Timestamp,
    }
}

diesel::table! {
    waitlist_entries (id) {
        id -> Int4,
        user_email -> Varchar,
        interested_in -> Varchar,
        note -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::joinable!(creator_profiles -> users (user_id));
diesel::joinable!(videos -> users (creator_id));

diesel::allow_tables_to_appear_in_same_query!(
    analytics_events,
    creator_profiles,
    users,
    videos,
    waitlist_entries,
);
