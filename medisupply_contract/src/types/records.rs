use super::{numbers, Entity};
use crate::errors::{ContractError, FieldIssue, IssueKind};
use crate::schema::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the marketplace a user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pharmacy,
    Supplier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pharmacy => "pharmacy",
            Role::Supplier => "supplier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// Only a pending order can be decided, and only once
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Approved)
                | (OrderStatus::Pending, OrderStatus::Rejected)
        )
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `createdAt` value as an RFC 3339 timestamp
pub(crate) fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, ContractError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ContractError::from_issues(vec![FieldIssue::new(
                "createdAt",
                IssueKind::InvalidTimestamp,
            )])
        })
}

// ============================================================================
// Catalog records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub form: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location_name: String,
    #[serde(with = "numbers::real")]
    pub lat: f64,
    #[serde(with = "numbers::real")]
    pub lng: f64,
}

impl Supplier {
    pub fn to_public(&self) -> PublicSupplier {
        PublicSupplier {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            location_name: self.location_name.clone(),
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

impl Pharmacy {
    pub fn to_public(&self) -> PublicPharmacy {
        PublicPharmacy {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

/// A supplier's offer for one medicine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierMedicine {
    pub id: String,
    pub supplier_id: String,
    pub medicine_id: String,
    #[serde(with = "numbers::real")]
    pub price: f64,
    #[serde(with = "numbers::count")]
    pub stock: u64,
    pub available: bool,
}

// ============================================================================
// Orders and notifications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub supplier_medicine_id: String,
    #[serde(with = "numbers::count")]
    pub quantity: u64,
    #[serde(with = "numbers::real")]
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub supplier_id: String,
    pub pharmacy_id: String,
    pub status: OrderStatus,
    pub created_at: String,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_note: Option<String>,
}

impl Order {
    pub fn created_at_utc(&self) -> Result<DateTime<Utc>, ContractError> {
        parse_created_at(&self.created_at)
    }

    /// Sum of quantity times unit price over all items
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.quantity as f64 * item.unit_price)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub role: Role,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CurrentUser>,
}

impl Notification {
    pub fn created_at_utc(&self) -> Result<DateTime<Utc>, ContractError> {
        parse_created_at(&self.created_at)
    }

    /// Untargeted notifications are visible to everyone
    pub fn is_visible_to(&self, user: &CurrentUser) -> bool {
        self.user.as_ref().map_or(true, |target| target == user)
    }
}

/// Snapshot of the whole persisted store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Schema generation; compared against `STATE_VERSION` when loading
    #[serde(with = "numbers::real")]
    pub version: f64,
    pub medicines: Vec<Medicine>,
    pub suppliers: Vec<Supplier>,
    pub pharmacies: Vec<Pharmacy>,
    pub supplier_medicines: Vec<SupplierMedicine>,
    pub orders: Vec<Order>,
    pub notifications: Vec<Notification>,
}

impl AppState {
    /// Empty store at the given schema generation
    pub fn empty(version: u32) -> Self {
        Self {
            version: f64::from(version),
            medicines: Vec::new(),
            suppliers: Vec::new(),
            pharmacies: Vec::new(),
            supplier_medicines: Vec::new(),
            orders: Vec::new(),
            notifications: Vec::new(),
        }
    }
}

// ============================================================================
// Response projections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSupplier {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location_name: String,
    #[serde(with = "numbers::real")]
    pub lat: f64,
    #[serde(with = "numbers::real")]
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicPharmacy {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierMedicineListing {
    #[serde(flatten)]
    pub offer: SupplierMedicine,
    pub medicine: Medicine,
    pub supplier: PublicSupplier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self { ok: true }
    }
}

macro_rules! impl_entity {
    ($($record:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Entity for $record {
                const KIND: EntityKind = EntityKind::$kind;
            }
        )+
    };
}

impl_entity! {
    Medicine => Medicine,
    Supplier => Supplier,
    Pharmacy => Pharmacy,
    SupplierMedicine => SupplierMedicine,
    OrderItem => OrderItem,
    Order => Order,
    CurrentUser => CurrentUser,
    Notification => Notification,
    AppState => AppState,
    PublicSupplier => PublicSupplier,
    PublicPharmacy => PublicPharmacy,
    SupplierMedicineListing => SupplierMedicineListing,
    HealthStatus => HealthStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse, to_value};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn order_json() -> serde_json::Value {
        json!({
            "id": "O1",
            "supplierId": "S1",
            "pharmacyId": "P1",
            "status": "pending",
            "createdAt": "2024-03-01T10:15:00Z",
            "items": [
                { "id": "I1", "supplierMedicineId": "SM1", "quantity": 2, "unitPrice": 3.5 },
                { "id": "I2", "supplierMedicineId": "SM2", "quantity": 1, "unitPrice": 10 }
            ],
            "note": "Deliver before noon"
        })
    }

    #[test]
    fn test_parse_order() {
        let order: Order = parse(&order_json()).expect("order parses");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.note.as_deref(), Some("Deliver before noon"));
        assert_eq!(order.decision_note, None);
        assert!((order.total() - 17.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_round_trip_is_lossless() {
        let original = order_json();
        let order: Order = parse(&original).expect("order parses");
        let value = to_value(&order).expect("order serializes");
        assert_eq!(value, original);
    }

    #[test]
    fn test_integral_numbers_round_trip_unchanged() {
        let offer = json!({
            "id": "SM1",
            "supplierId": "S1",
            "medicineId": "M1",
            "price": 4,
            "stock": 5_000_000_000u64,
            "available": true
        });
        let parsed: SupplierMedicine = parse(&offer).expect("offer parses");
        assert_eq!(parsed.stock, 5_000_000_000);
        assert_eq!(to_value(&parsed).expect("offer serializes"), offer);

        let supplier = json!({
            "id": "S1",
            "name": "North Pharma Supply",
            "email": "north@supply.example",
            "password": "secret",
            "phone": "555-0100",
            "locationName": "Warehouse 4",
            "lat": 40,
            "lng": -74
        });
        let parsed: Supplier = parse(&supplier).expect("supplier parses");
        assert_eq!(to_value(&parsed).expect("supplier serializes"), supplier);
    }

    #[test]
    fn test_integral_floats_parse_as_counts() {
        let mut offer = json!({
            "id": "SM1",
            "supplierId": "S1",
            "medicineId": "M1",
            "price": 4.0,
            "stock": 2.0,
            "available": true
        });
        let parsed: SupplierMedicine = parse(&offer).expect("integral floats parse");
        assert_eq!(parsed.stock, 2);

        // Same numbers by value, written the way the web client writes them
        let back = to_value(&parsed).expect("offer serializes");
        assert_eq!(back["stock"], json!(2));
        assert_eq!(back["price"], json!(4));
        assert_eq!(back["price"].as_f64(), offer["price"].as_f64());

        offer["stock"] = json!(1e17);
        assert_matches!(
            parse::<SupplierMedicine>(&offer),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "stock"
        );
    }

    #[test]
    fn test_parse_rejects_invalid_shape_before_serde() {
        let mut value = order_json();
        value["items"] = json!([]);
        assert_matches!(
            parse::<Order>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "items"
        );
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Approved));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Approved.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Rejected.can_transition_to(OrderStatus::Approved));
        assert!(OrderStatus::Approved.is_final());
    }

    #[test]
    fn test_created_at_parsing() {
        let order: Order = parse(&order_json()).expect("order parses");
        let at = order.created_at_utc().expect("timestamp parses");
        assert_eq!(at.to_rfc3339(), "2024-03-01T10:15:00+00:00");

        let mut bad = order;
        bad.created_at = "yesterday".to_string();
        let err = bad.created_at_utc().unwrap_err();
        assert_eq!(err.field(), Some("createdAt"));
    }

    #[test]
    fn test_public_projection_validates() {
        let supplier = Supplier {
            id: "S1".to_string(),
            name: "North Pharma Supply".to_string(),
            email: "north@supply.example".to_string(),
            password: "secret".to_string(),
            phone: "+1 555 0100".to_string(),
            location_name: "Warehouse 4".to_string(),
            lat: 40.7,
            lng: -74.0,
        };

        let public = to_value(&supplier.to_public()).expect("public supplier validates");
        assert!(public.get("password").is_none());
        assert_eq!(public["locationName"], "Warehouse 4");
    }

    #[test]
    fn test_notification_visibility() {
        let pharmacy = CurrentUser {
            role: Role::Pharmacy,
            user_id: "P1".to_string(),
        };
        let supplier = CurrentUser {
            role: Role::Supplier,
            user_id: "P1".to_string(),
        };
        let targeted = Notification {
            id: "N1".to_string(),
            created_at: "2024-03-01T10:15:00Z".to_string(),
            title: "Order approved".to_string(),
            message: "Your order O1 was approved".to_string(),
            read: false,
            user: Some(pharmacy.clone()),
        };

        assert!(targeted.is_visible_to(&pharmacy));
        assert!(!targeted.is_visible_to(&supplier));

        let broadcast = Notification {
            user: None,
            ..targeted
        };
        assert!(broadcast.is_visible_to(&supplier));
    }

    #[test]
    fn test_listing_flattens_offer() {
        let value = json!({
            "id": "SM1",
            "supplierId": "S1",
            "medicineId": "M1",
            "price": 4.25,
            "stock": 120,
            "available": true,
            "medicine": { "id": "M1", "name": "Amoxicillin", "dosage": "500mg", "form": "capsule" },
            "supplier": {
                "id": "S1",
                "name": "North Pharma Supply",
                "email": "north@supply.example",
                "phone": "+1 555 0100",
                "locationName": "Warehouse 4",
                "lat": 40.7,
                "lng": -74
            }
        });

        let listing: SupplierMedicineListing = parse(&value).expect("listing parses");
        assert_eq!(listing.offer.stock, 120);
        assert_eq!(listing.medicine.name, "Amoxicillin");
        assert_eq!(to_value(&listing).expect("listing serializes"), value);
    }
}
