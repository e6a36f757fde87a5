//! Typed records for validated values
//!
//! Every record implements [`Entity`], tying it to the [`EntityKind`] whose
//! shape it mirrors. Serde attributes follow the wire format: camelCase
//! field names and absent optionals skipped. Unknown fields are the
//! validator's concern, so records deserialize only after a shape check.

pub mod numbers;
pub mod queries;
pub mod records;
pub mod requests;

pub use queries::{
    NotificationQuery, OrderQuery, SortBy, SortDir, SupplierMedicineQuery, SupplierSearch,
};
pub use records::{
    AppState, CurrentUser, HealthStatus, Medicine, Notification, Order, OrderItem, OrderStatus,
    Pharmacy, PublicPharmacy, PublicSupplier, Role, Supplier, SupplierMedicine,
    SupplierMedicineListing,
};
pub use requests::{
    CreateOrderLine, CreateOrderRequest, CreateSupplierMedicineRequest, DecideOrderRequest,
    Decision, LoginRequest, RegisterRequest, UpdateSupplierMedicineRequest,
};

use crate::config::ValidationConfig;
use crate::errors::ContractError;
use crate::schema::EntityKind;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed record backed by a registered shape
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: EntityKind;
}

/// Validate a value against `T`'s shape and deserialize it
pub fn parse<T: Entity>(value: &serde_json::Value) -> Result<T, ContractError> {
    parse_with::<T>(value, &ValidationConfig::default())
}

pub fn parse_with<T: Entity>(
    value: &serde_json::Value,
    config: &ValidationConfig,
) -> Result<T, ContractError> {
    crate::validate_with(T::KIND, value, config)?;
    serde_json::from_value(value.clone()).map_err(ContractError::from_serde)
}

/// Serialize a record and check the result against its own shape
pub fn to_value<T: Entity>(record: &T) -> Result<serde_json::Value, ContractError> {
    let value = serde_json::to_value(record)
        .map_err(|e| ContractError::internal(format!("Failed to serialize {}: {}", T::KIND, e)))?;
    crate::validate(T::KIND, &value)
}
