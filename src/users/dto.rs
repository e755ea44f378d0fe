use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::Account;

/// Request body for registration. Missing fields are reported as validation
/// errors by the service rather than rejected by the JSON extractor.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Accepted only so it can be logged; never honored.
    #[serde(default, alias = "isAdmin")]
    pub admin: Option<bool>,
}

/// Request body for `PUT /user/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public part of an account returned to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub is_admin: bool,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            is_admin: a.is_admin,
        }
    }
}
