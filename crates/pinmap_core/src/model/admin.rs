//! Admin account model.
//!
//! Credential-bearing record used for login lookup and admin-account CRUD.
//! It shares persistence mechanics with pins and nothing else.
//!
//! The password is stored and compared as plaintext because the credential
//! lookup contract is a simultaneous exact match on both fields. This is a
//! known defect of the modeled system; see DESIGN.md.

use crate::sanitize::sanitize;
use serde::{Deserialize, Serialize};

/// Storage-assigned surrogate key for admin accounts.
pub type AdminId = i64;

/// One administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Unset until the first insert commits.
    pub id: Option<AdminId>,
    pub username: String,
    pub password: String,
}

impl Admin {
    /// Creates an account from raw request parameters, sanitizing both
    /// credentials.
    pub fn new(username: Option<&str>, password: Option<&str>) -> Self {
        Self {
            id: None,
            username: sanitize(username),
            password: sanitize(password),
        }
    }
}
