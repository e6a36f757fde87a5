//! Entity shapes for the MediSupply domain
//!
//! One constructor per record. Derived shapes (public projections, joined
//! listings, request payloads) are composed from the base shapes so a field
//! rule is only ever declared once.

use super::{FieldSpec, ObjectShape, Shape};
use crate::errors::ContractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ROLE_VALUES: &[&str] = &["pharmacy", "supplier"];
pub const ORDER_STATUS_VALUES: &[&str] = &["pending", "approved", "rejected"];
pub const DECISION_STATUS_VALUES: &[&str] = &["approved", "rejected"];
pub const SORT_BY_VALUES: &[&str] = &["name", "price", "stock"];
pub const SORT_DIR_VALUES: &[&str] = &["asc", "desc"];

/// Every shape the registry can validate by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Medicine,
    Supplier,
    Pharmacy,
    SupplierMedicine,
    OrderItem,
    Order,
    CurrentUser,
    Notification,
    AppState,
    PublicSupplier,
    PublicPharmacy,
    SupplierMedicineListing,
    HealthStatus,
    RegisterRequest,
    LoginRequest,
    CreateSupplierMedicineRequest,
    UpdateSupplierMedicineRequest,
    CreateOrderRequest,
    DecideOrderRequest,
}

impl EntityKind {
    pub const ALL: [EntityKind; 19] = [
        EntityKind::Medicine,
        EntityKind::Supplier,
        EntityKind::Pharmacy,
        EntityKind::SupplierMedicine,
        EntityKind::OrderItem,
        EntityKind::Order,
        EntityKind::CurrentUser,
        EntityKind::Notification,
        EntityKind::AppState,
        EntityKind::PublicSupplier,
        EntityKind::PublicPharmacy,
        EntityKind::SupplierMedicineListing,
        EntityKind::HealthStatus,
        EntityKind::RegisterRequest,
        EntityKind::LoginRequest,
        EntityKind::CreateSupplierMedicineRequest,
        EntityKind::UpdateSupplierMedicineRequest,
        EntityKind::CreateOrderRequest,
        EntityKind::DecideOrderRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Medicine => "medicine",
            EntityKind::Supplier => "supplier",
            EntityKind::Pharmacy => "pharmacy",
            EntityKind::SupplierMedicine => "supplierMedicine",
            EntityKind::OrderItem => "orderItem",
            EntityKind::Order => "order",
            EntityKind::CurrentUser => "currentUser",
            EntityKind::Notification => "notification",
            EntityKind::AppState => "appState",
            EntityKind::PublicSupplier => "publicSupplier",
            EntityKind::PublicPharmacy => "publicPharmacy",
            EntityKind::SupplierMedicineListing => "supplierMedicineListing",
            EntityKind::HealthStatus => "healthStatus",
            EntityKind::RegisterRequest => "registerRequest",
            EntityKind::LoginRequest => "loginRequest",
            EntityKind::CreateSupplierMedicineRequest => "createSupplierMedicineRequest",
            EntityKind::UpdateSupplierMedicineRequest => "updateSupplierMedicineRequest",
            EntityKind::CreateOrderRequest => "createOrderRequest",
            EntityKind::DecideOrderRequest => "decideOrderRequest",
        }
    }

    /// Object shape declared for this kind
    pub fn shape(&self) -> ObjectShape {
        match self {
            EntityKind::Medicine => medicine_shape(),
            EntityKind::Supplier => supplier_shape(),
            EntityKind::Pharmacy => pharmacy_shape(),
            EntityKind::SupplierMedicine => supplier_medicine_shape(),
            EntityKind::OrderItem => order_item_shape(),
            EntityKind::Order => order_shape(),
            EntityKind::CurrentUser => current_user_shape(),
            EntityKind::Notification => notification_shape(),
            EntityKind::AppState => app_state_shape(),
            EntityKind::PublicSupplier => public_supplier_shape(),
            EntityKind::PublicPharmacy => public_pharmacy_shape(),
            EntityKind::SupplierMedicineListing => supplier_medicine_listing_shape(),
            EntityKind::HealthStatus => health_status_shape(),
            EntityKind::RegisterRequest => register_request_shape(),
            EntityKind::LoginRequest => login_request_shape(),
            EntityKind::CreateSupplierMedicineRequest => create_supplier_medicine_shape(),
            EntityKind::UpdateSupplierMedicineRequest => update_supplier_medicine_shape(),
            EntityKind::CreateOrderRequest => create_order_shape(),
            EntityKind::DecideOrderRequest => decide_order_shape(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ContractError::not_found(format!("Unknown entity kind: {}", s)))
    }
}

// ============================================================================
// Base records
// ============================================================================

pub fn medicine_shape() -> ObjectShape {
    ObjectShape::new("Medicine")
        .field(FieldSpec::required("id", Shape::string()))
        .field(FieldSpec::required("name", Shape::non_empty_string()))
        .field(FieldSpec::required("dosage", Shape::non_empty_string()))
        .field(FieldSpec::required("form", Shape::non_empty_string()))
}

pub fn supplier_shape() -> ObjectShape {
    ObjectShape::new("Supplier")
        .field(FieldSpec::required("id", Shape::string()))
        .field(FieldSpec::required("name", Shape::non_empty_string()))
        .field(FieldSpec::required("email", Shape::email()))
        .field(FieldSpec::required("password", Shape::string_min(4)))
        .field(FieldSpec::required("phone", Shape::non_empty_string()))
        .field(FieldSpec::required("locationName", Shape::non_empty_string()))
        .field(FieldSpec::required("lat", Shape::number()))
        .field(FieldSpec::required("lng", Shape::number()))
}

pub fn pharmacy_shape() -> ObjectShape {
    ObjectShape::new("Pharmacy")
        .field(FieldSpec::required("id", Shape::string()))
        .field(FieldSpec::required("name", Shape::non_empty_string()))
        .field(FieldSpec::required("email", Shape::email()))
        .field(FieldSpec::required("password", Shape::string_min(4)))
        .field(FieldSpec::required("phone", Shape::non_empty_string()))
        .field(FieldSpec::required("address", Shape::non_empty_string()))
}

pub fn supplier_medicine_shape() -> ObjectShape {
    ObjectShape::new("SupplierMedicine")
        .field(FieldSpec::required("id", Shape::string()))
        .field(FieldSpec::required("supplierId", Shape::string()))
        .field(FieldSpec::required("medicineId", Shape::string()))
        .field(FieldSpec::required("price", Shape::non_negative()))
        .field(FieldSpec::required("stock", Shape::non_negative_integer()))
        .field(FieldSpec::required("available", Shape::boolean()))
}

pub fn order_item_shape() -> ObjectShape {
    ObjectShape::new("OrderItem")
        .field(FieldSpec::required("id", Shape::string()))
        .field(FieldSpec::required("supplierMedicineId", Shape::string()))
        .field(FieldSpec::required("quantity", Shape::positive_integer()))
        .field(FieldSpec::required("unitPrice", Shape::non_negative()))
}

pub fn order_shape() -> ObjectShape {
    ObjectShape::new("Order")
        .field(FieldSpec::required("id", Shape::string()))
        .field(FieldSpec::required("supplierId", Shape::string()))
        .field(FieldSpec::required("pharmacyId", Shape::string()))
        .field(FieldSpec::required("status", Shape::one_of(ORDER_STATUS_VALUES)))
        .field(FieldSpec::required("createdAt", Shape::string()))
        .field(FieldSpec::required(
            "items",
            Shape::non_empty_array(order_item_shape().into()),
        ))
        .field(FieldSpec::optional("note", Shape::string()))
        .field(FieldSpec::optional("decisionNote", Shape::string()))
}

pub fn current_user_shape() -> ObjectShape {
    ObjectShape::new("CurrentUser")
        .field(FieldSpec::required("role", Shape::one_of(ROLE_VALUES)))
        .field(FieldSpec::required("userId", Shape::string()))
}

pub fn notification_shape() -> ObjectShape {
    ObjectShape::new("Notification")
        .field(FieldSpec::required("id", Shape::string()))
        .field(FieldSpec::required("createdAt", Shape::string()))
        .field(FieldSpec::required("title", Shape::non_empty_string()))
        .field(FieldSpec::required("message", Shape::non_empty_string()))
        .field(FieldSpec::required("read", Shape::boolean()))
        .field(FieldSpec::optional("user", current_user_shape()))
}

/// Whole persisted store
pub fn app_state_shape() -> ObjectShape {
    ObjectShape::new("AppState")
        .field(FieldSpec::required("version", Shape::number()))
        .field(FieldSpec::required("medicines", Shape::array(medicine_shape().into())))
        .field(FieldSpec::required("suppliers", Shape::array(supplier_shape().into())))
        .field(FieldSpec::required("pharmacies", Shape::array(pharmacy_shape().into())))
        .field(FieldSpec::required(
            "supplierMedicines",
            Shape::array(supplier_medicine_shape().into()),
        ))
        .field(FieldSpec::required("orders", Shape::array(order_shape().into())))
        .field(FieldSpec::required(
            "notifications",
            Shape::array(notification_shape().into()),
        ))
}

// ============================================================================
// Derived response shapes
// ============================================================================

pub fn public_supplier_shape() -> ObjectShape {
    supplier_shape().omit("PublicSupplier", &["password"])
}

pub fn public_pharmacy_shape() -> ObjectShape {
    pharmacy_shape().omit("PublicPharmacy", &["password"])
}

/// Supplier medicine joined with its medicine and supplier
pub fn supplier_medicine_listing_shape() -> ObjectShape {
    supplier_medicine_shape().extend(
        "SupplierMedicineListing",
        vec![
            FieldSpec::required("medicine", medicine_shape()),
            FieldSpec::required("supplier", public_supplier_shape()),
        ],
    )
}

pub fn health_status_shape() -> ObjectShape {
    ObjectShape::new("HealthStatus").field(FieldSpec::required("ok", Shape::literal(true)))
}

// ============================================================================
// Request payloads
// ============================================================================

/// Registration form; role-specific fields are checked separately
pub fn register_request_shape() -> ObjectShape {
    ObjectShape::new("RegisterRequest")
        .field(FieldSpec::required("role", Shape::one_of(ROLE_VALUES)))
        .field(FieldSpec::required("name", Shape::non_empty_string()))
        .field(FieldSpec::required("email", Shape::email()))
        .field(FieldSpec::required("password", Shape::string_min(4)))
        .field(FieldSpec::required("phone", Shape::non_empty_string()))
        .field(FieldSpec::optional("address", Shape::non_empty_string()))
        .field(FieldSpec::optional("locationName", Shape::non_empty_string()))
        .field(FieldSpec::optional("lat", Shape::number()))
        .field(FieldSpec::optional("lng", Shape::number()))
}

pub fn login_request_shape() -> ObjectShape {
    ObjectShape::new("LoginRequest")
        .field(FieldSpec::required("role", Shape::one_of(ROLE_VALUES)))
        .field(FieldSpec::required("email", Shape::email()))
        .field(FieldSpec::required("password", Shape::string_min(4)))
}

pub fn create_supplier_medicine_shape() -> ObjectShape {
    supplier_medicine_shape().omit("CreateSupplierMedicineRequest", &["id"])
}

pub fn update_supplier_medicine_shape() -> ObjectShape {
    supplier_medicine_shape()
        .omit(
            "UpdateSupplierMedicineRequest",
            &["id", "supplierId", "medicineId"],
        )
        .partial("UpdateSupplierMedicineRequest")
}

pub fn create_order_shape() -> ObjectShape {
    let line = ObjectShape::new("CreateOrderLine")
        .field(FieldSpec::required("supplierMedicineId", Shape::string()))
        .field(FieldSpec::required("quantity", Shape::positive_integer()));

    ObjectShape::new("CreateOrderRequest")
        .field(FieldSpec::required("supplierId", Shape::string()))
        .field(FieldSpec::required("pharmacyId", Shape::string()))
        .field(FieldSpec::required("items", Shape::non_empty_array(line.into())))
        .field(FieldSpec::optional("note", Shape::string()))
}

pub fn decide_order_shape() -> ObjectShape {
    ObjectShape::new("DecideOrderRequest")
        .field(FieldSpec::required(
            "status",
            Shape::one_of(DECISION_STATUS_VALUES),
        ))
        .field(FieldSpec::optional("decisionNote", Shape::string()))
}
