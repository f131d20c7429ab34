use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct UserClaim {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub exp: i64,
}
