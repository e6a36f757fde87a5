//! Request payloads accepted by the store adapter

use super::records::{OrderStatus, Role, SupplierMedicine};
use super::{numbers, Entity};
use crate::errors::{ContractError, FieldIssue, IssueKind};
use crate::schema::EntityKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "numbers::real_opt")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "numbers::real_opt")]
    pub lng: Option<f64>,
}

/// Fields a registration must carry for the given role
pub fn registration_fields_for(role: &str) -> &'static [&'static str] {
    match role {
        "pharmacy" => &["address"],
        "supplier" => &["locationName", "lat", "lng"],
        _ => &[],
    }
}

/// Role-dependent presence check on a raw registration payload
pub(crate) fn check_registration(value: &serde_json::Value) -> Vec<FieldIssue> {
    let Some(role) = value.get("role").and_then(|r| r.as_str()) else {
        return Vec::new();
    };
    registration_fields_for(role)
        .iter()
        .filter(|field| value.get(**field).is_none())
        .map(|field| FieldIssue::new(*field, IssueKind::MissingField))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub role: Role,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierMedicineRequest {
    pub supplier_id: String,
    pub medicine_id: String,
    #[serde(with = "numbers::real")]
    pub price: f64,
    #[serde(with = "numbers::count")]
    pub stock: u64,
    pub available: bool,
}

impl CreateSupplierMedicineRequest {
    pub fn into_record(self, id: impl Into<String>) -> SupplierMedicine {
        SupplierMedicine {
            id: id.into(),
            supplier_id: self.supplier_id,
            medicine_id: self.medicine_id,
            price: self.price,
            stock: self.stock,
            available: self.available,
        }
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSupplierMedicineRequest {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "numbers::real_opt")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "numbers::count_opt")]
    pub stock: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl UpdateSupplierMedicineRequest {
    pub fn apply_to(&self, record: &SupplierMedicine) -> SupplierMedicine {
        SupplierMedicine {
            price: self.price.unwrap_or(record.price),
            stock: self.stock.unwrap_or(record.stock),
            available: self.available.unwrap_or(record.available),
            ..record.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.stock.is_none() && self.available.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderLine {
    pub supplier_medicine_id: String,
    #[serde(with = "numbers::count")]
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub supplier_id: String,
    pub pharmacy_id: String,
    pub items: Vec<CreateOrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome a supplier can give a pending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for OrderStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => OrderStatus::Approved,
            Decision::Rejected => OrderStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideOrderRequest {
    pub status: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_note: Option<String>,
}

impl DecideOrderRequest {
    /// Target status, provided the order is still pending
    pub fn next_status(&self, current: OrderStatus) -> Result<OrderStatus, ContractError> {
        let next = OrderStatus::from(self.status);
        if current.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ContractError::validation(
                "status",
                format!("Order is already {} and cannot become {}", current, next),
            ))
        }
    }
}

impl Entity for RegisterRequest {
    const KIND: EntityKind = EntityKind::RegisterRequest;
}

impl Entity for LoginRequest {
    const KIND: EntityKind = EntityKind::LoginRequest;
}

impl Entity for CreateSupplierMedicineRequest {
    const KIND: EntityKind = EntityKind::CreateSupplierMedicineRequest;
}

impl Entity for UpdateSupplierMedicineRequest {
    const KIND: EntityKind = EntityKind::UpdateSupplierMedicineRequest;
}

impl Entity for CreateOrderRequest {
    const KIND: EntityKind = EntityKind::CreateOrderRequest;
}

impl Entity for DecideOrderRequest {
    const KIND: EntityKind = EntityKind::DecideOrderRequest;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_pharmacy_registration_needs_address() {
        let value = json!({
            "role": "pharmacy",
            "name": "Corner Pharmacy",
            "email": "corner@pharmacy.example",
            "password": "hunter2",
            "phone": "555-0101"
        });
        assert_matches!(
            parse::<RegisterRequest>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "address"
        );

        let mut complete = value;
        complete["address"] = json!("12 Main St");
        let request: RegisterRequest = parse(&complete).expect("registration parses");
        assert_eq!(request.role, Role::Pharmacy);
    }

    #[test]
    fn test_supplier_registration_needs_location() {
        let value = json!({
            "role": "supplier",
            "name": "North Pharma Supply",
            "email": "north@supply.example",
            "password": "hunter2",
            "phone": "555-0102",
            "locationName": "Warehouse 4",
            "lat": 40.7
        });
        assert_matches!(
            parse::<RegisterRequest>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "lng"
        );
    }

    #[test]
    fn test_login_password_length() {
        let value = json!({ "role": "supplier", "email": "a@b.co", "password": "abc" });
        assert_matches!(
            parse::<LoginRequest>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "password"
        );
    }

    #[test]
    fn test_create_order_requires_items() {
        let value = json!({ "supplierId": "S1", "pharmacyId": "P1", "items": [] });
        assert_matches!(
            parse::<CreateOrderRequest>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "items"
        );

        let value = json!({
            "supplierId": "S1",
            "pharmacyId": "P1",
            "items": [{ "supplierMedicineId": "SM1", "quantity": 0 }]
        });
        assert_matches!(
            parse::<CreateOrderRequest>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "items[0].quantity"
        );
    }

    #[test]
    fn test_decision_cannot_be_pending() {
        let value = json!({ "status": "pending" });
        assert_matches!(
            parse::<DecideOrderRequest>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "status"
        );
    }

    #[test]
    fn test_decision_next_status() {
        let request: DecideOrderRequest =
            parse(&json!({ "status": "approved", "decisionNote": "Ships Monday" }))
                .expect("decision parses");

        assert_eq!(
            request.next_status(OrderStatus::Pending),
            Ok(OrderStatus::Approved)
        );
        assert_matches!(
            request.next_status(OrderStatus::Rejected),
            Err(ContractError::Validation { .. })
        );
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let record = SupplierMedicine {
            id: "SM1".to_string(),
            supplier_id: "S1".to_string(),
            medicine_id: "M1".to_string(),
            price: 4.0,
            stock: 10,
            available: true,
        };
        let update: UpdateSupplierMedicineRequest =
            parse(&json!({ "stock": 0, "available": false })).expect("update parses");

        let updated = update.apply_to(&record);
        assert_eq!(updated.price, 4.0);
        assert_eq!(updated.stock, 0);
        assert!(!updated.available);
        assert!(!update.is_empty());
        assert!(UpdateSupplierMedicineRequest::default().is_empty());
    }

    #[test]
    fn test_create_supplier_medicine_rejects_id() {
        let value = json!({
            "id": "SM9",
            "supplierId": "S1",
            "medicineId": "M1",
            "price": 1.5,
            "stock": 3,
            "available": true
        });
        assert_matches!(
            parse::<CreateSupplierMedicineRequest>(&value),
            Err(ContractError::Validation { field: Some(f), .. }) if f == "id"
        );
    }

    #[test]
    fn test_create_supplier_medicine_into_record() {
        let value = json!({
            "supplierId": "S1",
            "medicineId": "M1",
            "price": 12,
            "stock": 40.0,
            "available": true
        });
        let request: CreateSupplierMedicineRequest = parse(&value).expect("request parses");
        let record = request.into_record("SM9");

        assert_eq!(record.id, "SM9");
        assert_eq!(record.stock, 40);
        let stored = crate::types::to_value(&record).expect("record validates");
        assert_eq!(stored["price"], json!(12));
        assert_eq!(stored["stock"], json!(40));
    }

    #[test]
    fn test_order_line_quantity_accepts_integral_float() {
        let value = json!({
            "supplierId": "S1",
            "pharmacyId": "P1",
            "items": [{ "supplierMedicineId": "SM1", "quantity": 3.0 }]
        });
        let request: CreateOrderRequest = parse(&value).expect("order request parses");
        assert_eq!(request.items[0].quantity, 3);
    }
}
