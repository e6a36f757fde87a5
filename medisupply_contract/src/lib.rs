//! # MediSupply Contract
//!
//! Typed contract layer shared by the MediSupply pharmacy and supplier apps:
//! entity shapes with field-level validation, the registry of logical
//! operations, and path-template building.
//!
//! ```
//! use medisupply_contract::{build_path, validate, ContractRegistry, EntityKind};
//! use serde_json::json;
//!
//! let medicine = json!({ "id": "M1", "name": "Ibuprofen", "dosage": "200mg", "form": "tablet" });
//! assert!(validate(EntityKind::Medicine, &medicine).is_ok());
//!
//! let listing = ContractRegistry::standard()
//!     .describe_operation("entities.supplierMedicines", "listBySupplier")
//!     .unwrap();
//! assert_eq!(
//!     build_path(listing.path, [("supplierId", "S1")]),
//!     "/api/suppliers/S1/medicines"
//! );
//! ```

pub mod config;
pub mod errors;
pub mod routes;
pub mod schema;
pub mod snapshot;
pub mod types;

pub use config::ValidationConfig;
pub use errors::{error_shape, ContractError, ErrorKind, ErrorPayload, FieldIssue, IssueKind};
pub use routes::{build_path, ContractRegistry, Method, OperationDescriptor, PathMatch};
pub use schema::{EntityKind, FieldSpec, ObjectShape, Shape};
pub use snapshot::{load_snapshot, STATE_VERSION};
pub use types::{parse, Entity};

use schema::validation::{validate_object, ShapeValidator};
use serde_json::Value;

/// Validate a value as the given entity kind with the default configuration
///
/// Returns the accepted value unchanged.
pub fn validate(kind: EntityKind, value: &Value) -> Result<Value, ContractError> {
    validate_with(kind, value, &ValidationConfig::default())
}

pub fn validate_with(
    kind: EntityKind,
    value: &Value,
    config: &ValidationConfig,
) -> Result<Value, ContractError> {
    let shape = kind.shape();

    if kind == EntityKind::RegisterRequest {
        let mut validator = ShapeValidator::new(config);
        validator.check_object(&shape, value, "");
        for issue in types::requests::check_registration(value) {
            validator.push(issue);
        }
        validator.finish()?;
    } else {
        validate_object(&shape, value, config)?;
    }

    log::debug!("Accepted {} value", kind);
    Ok(value.clone())
}

/// Look up an operation in the standard registry
pub fn describe_operation(
    group: &str,
    name: &str,
) -> Result<std::sync::Arc<OperationDescriptor>, ContractError> {
    ContractRegistry::standard().describe_operation(group, name)
}

pub mod prelude {
    pub use crate::config::ValidationConfig;
    pub use crate::errors::{error_shape, ContractError, ErrorKind, ErrorPayload};
    pub use crate::routes::{build_path, ContractRegistry, Method, OperationDescriptor};
    pub use crate::schema::{EntityKind, Shape};
    pub use crate::snapshot::{load_snapshot, STATE_VERSION};
    pub use crate::types::{
        parse, AppState, CurrentUser, Entity, Medicine, Notification, Order, OrderItem,
        OrderStatus, Pharmacy, Role, Supplier, SupplierMedicine,
    };
    pub use crate::{describe_operation, validate, validate_with};
}
