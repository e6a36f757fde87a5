//! The application's registered operations

use super::{Method, OperationDescriptor};
use crate::errors::{error_shape, ErrorKind};
use crate::schema::entities::{
    app_state_shape, current_user_shape, health_status_shape, medicine_shape,
    notification_shape, order_shape, public_pharmacy_shape, public_supplier_shape,
    supplier_medicine_listing_shape, ORDER_STATUS_VALUES, ROLE_VALUES, SORT_BY_VALUES,
    SORT_DIR_VALUES,
};
use crate::schema::{FieldSpec, ObjectShape, Shape};

pub fn supplier_search_shape() -> ObjectShape {
    ObjectShape::new("SupplierSearch").field(FieldSpec::optional("search", Shape::string()))
}

pub fn supplier_medicine_query_shape() -> ObjectShape {
    ObjectShape::new("SupplierMedicineQuery")
        .field(FieldSpec::optional("search", Shape::string()))
        .field(FieldSpec::optional("sortBy", Shape::one_of(SORT_BY_VALUES)))
        .field(FieldSpec::optional("sortDir", Shape::one_of(SORT_DIR_VALUES)))
        .field(FieldSpec::optional("onlyAvailable", Shape::boolean()))
}

pub fn order_query_shape() -> ObjectShape {
    ObjectShape::new("OrderQuery")
        .field(FieldSpec::required("role", Shape::one_of(ROLE_VALUES)))
        .field(FieldSpec::required("userId", Shape::string()))
        .field(FieldSpec::optional("status", Shape::one_of(ORDER_STATUS_VALUES)))
}

pub fn notification_query_shape() -> ObjectShape {
    ObjectShape::new("NotificationQuery")
        .field(FieldSpec::required("role", Shape::one_of(ROLE_VALUES)))
        .field(FieldSpec::required("userId", Shape::string()))
}

/// Every operation the application recognizes
pub fn standard_operations() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::new("app", "health", Method::Get, "/api/health")
            .respond(200, health_status_shape()),
        OperationDescriptor::new("auth", "me", Method::Get, "/api/me")
            .respond(200, Shape::from(current_user_shape()).nullable()),
        OperationDescriptor::new("state", "get", Method::Get, "/api/state")
            .respond(200, app_state_shape()),
        OperationDescriptor::new("entities.medicines", "list", Method::Get, "/api/medicines")
            .respond(200, Shape::array(medicine_shape().into())),
        OperationDescriptor::new("entities.suppliers", "list", Method::Get, "/api/suppliers")
            .with_input(supplier_search_shape())
            .respond(200, Shape::array(public_supplier_shape().into())),
        OperationDescriptor::new(
            "entities.pharmacies",
            "list",
            Method::Get,
            "/api/pharmacies",
        )
        .respond(200, Shape::array(public_pharmacy_shape().into())),
        OperationDescriptor::new(
            "entities.supplierMedicines",
            "listBySupplier",
            Method::Get,
            "/api/suppliers/:supplierId/medicines",
        )
        .with_input(supplier_medicine_query_shape())
        .respond(200, Shape::array(supplier_medicine_listing_shape().into()))
        .respond(404, error_shape(ErrorKind::NotFound)),
        OperationDescriptor::new("entities.orders", "list", Method::Get, "/api/orders")
            .with_input(order_query_shape())
            .respond(200, Shape::array(order_shape().into())),
        OperationDescriptor::new(
            "entities.notifications",
            "list",
            Method::Get,
            "/api/notifications",
        )
        .with_input(notification_query_shape())
        .respond(200, Shape::array(notification_shape().into())),
    ]
}
