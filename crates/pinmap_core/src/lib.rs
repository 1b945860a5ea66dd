//! Core domain logic for PinMap.
//! This crate is the single source of truth for pin/admin business invariants.

pub mod address;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sanitize;
pub mod service;

pub use address::{decompose, AddressParts};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::admin::{Admin, AdminId};
pub use model::pin::{event_icon, Pin, PinId, PinKind, PinRecord, PinValidationError};
pub use repo::admin_repo::{AdminRepository, SqliteAdminRepository};
pub use repo::pin_repo::{PinRepository, SqlitePinRepository};
pub use repo::{RepoError, RepoResult};
pub use sanitize::sanitize;
pub use service::store_service::StoreService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
