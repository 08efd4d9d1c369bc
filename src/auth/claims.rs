use serde::{Deserialize, Serialize};

/// Account role; gates admin-only routes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// JWT payload. Produced by `JwtKeys::validate` and carried in request
/// extensions by the `protect` middleware.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub email: String,  // subject
    pub role: Role,
    pub exp: usize,     // expires at (unix timestamp)
}
