//! Operation registry
//!
//! Each logical operation is an [`OperationDescriptor`]: a method, a path
//! template, an optional input shape and response shapes keyed by status
//! code. Descriptors are looked up by their `(group, name)` pair through a
//! [`ContractRegistry`]; the standard registry is built once and shared.

pub mod catalog;
pub mod path;

pub use path::{build_path, match_template, placeholders};

use crate::config::ValidationConfig;
use crate::errors::ContractError;
use crate::schema::{validate_shape, ObjectShape, Shape};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

static STANDARD_REGISTRY: OnceLock<ContractRegistry> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ContractError::validation(
                "method",
                format!("Unsupported method: {}", s),
            )),
        }
    }
}

/// Registered description of one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    pub group: &'static str,
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    /// Input is always optional as a whole; its fields follow the shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<ObjectShape>,
    pub responses: BTreeMap<u16, Shape>,
}

impl OperationDescriptor {
    pub fn new(
        group: &'static str,
        name: &'static str,
        method: Method,
        path: &'static str,
    ) -> Self {
        Self {
            group,
            name,
            method,
            path,
            input: None,
            responses: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, input: ObjectShape) -> Self {
        self.input = Some(input);
        self
    }

    pub fn respond(mut self, status: u16, shape: impl Into<Shape>) -> Self {
        self.responses.insert(status, shape.into());
        self
    }

    /// `group.name` identifier
    pub fn id(&self) -> String {
        operation_key(self.group, self.name)
    }

    pub fn response_shape(&self, status: u16) -> Option<&Shape> {
        self.responses.get(&status)
    }

    /// Concrete path for this operation
    pub fn build_path<I, K, V>(&self, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        build_path(self.path, params)
    }

    /// Check an input payload; absent or null input is always accepted
    pub fn validate_input(
        &self,
        input: Option<&serde_json::Value>,
        config: &ValidationConfig,
    ) -> Result<(), ContractError> {
        let Some(value) = input.filter(|v| !v.is_null()) else {
            return Ok(());
        };
        match &self.input {
            Some(shape) => validate_shape(&Shape::Object(shape.clone()), value, config),
            None => Err(ContractError::validation(
                "input",
                format!("Operation {} does not take input", self.id()),
            )),
        }
    }

    /// Validate and deserialize an input payload
    pub fn parse_input<T: DeserializeOwned>(
        &self,
        input: Option<&serde_json::Value>,
        config: &ValidationConfig,
    ) -> Result<Option<T>, ContractError> {
        self.validate_input(input, config)?;
        match input.filter(|v| !v.is_null()) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(ContractError::from_serde),
            None => Ok(None),
        }
    }

    /// Check a response payload against the shape registered for `status`
    pub fn validate_response(
        &self,
        status: u16,
        value: &serde_json::Value,
        config: &ValidationConfig,
    ) -> Result<(), ContractError> {
        let shape = self.response_shape(status).ok_or_else(|| {
            ContractError::not_found(format!(
                "Operation {} has no response registered for status {}",
                self.id(),
                status
            ))
        })?;
        validate_shape(shape, value, config)
    }
}

/// A concrete path resolved to its operation
#[derive(Debug, Clone)]
pub struct PathMatch {
    pub descriptor: Arc<OperationDescriptor>,
    pub params: BTreeMap<String, String>,
}

fn operation_key(group: &str, name: &str) -> String {
    format!("{}.{}", group, name)
}

/// Immutable map of operations keyed by `group.name`
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    operations: BTreeMap<String, Arc<OperationDescriptor>>,
}

impl ContractRegistry {
    /// Shared registry of the application's operations
    pub fn standard() -> &'static ContractRegistry {
        STANDARD_REGISTRY.get_or_init(|| {
            match RegistryBuilder::new().with_standard_operations() {
                Ok(builder) => {
                    let registry = builder.build();
                    log::debug!(
                        "Standard contract registry built with {} operations",
                        registry.len()
                    );
                    registry
                }
                Err(err) => {
                    log::error!("Standard operation catalog rejected: {}", err);
                    ContractRegistry::default()
                }
            }
        })
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up an operation by group and name
    pub fn describe_operation(
        &self,
        group: &str,
        name: &str,
    ) -> Result<Arc<OperationDescriptor>, ContractError> {
        let key = operation_key(group, name);
        match self.operations.get(&key) {
            Some(descriptor) => {
                log::debug!("Resolved operation {}", key);
                Ok(Arc::clone(descriptor))
            }
            None => {
                log::debug!("Operation {} is not registered", key);
                Err(ContractError::not_found(format!(
                    "Operation '{}' is not registered in group '{}'",
                    name, group
                )))
            }
        }
    }

    pub fn has_operation(&self, group: &str, name: &str) -> bool {
        self.operations.contains_key(&operation_key(group, name))
    }

    /// All operations in `group.name` order
    pub fn operations(&self) -> impl Iterator<Item = &Arc<OperationDescriptor>> {
        self.operations.values()
    }

    /// Distinct group names in order
    pub fn groups(&self) -> Vec<&'static str> {
        let mut groups: Vec<&'static str> = self.operations.values().map(|d| d.group).collect();
        groups.sort_unstable();
        groups.dedup();
        groups
    }

    /// Resolve a concrete path to the operation whose template matches it
    pub fn find_by_path(&self, method: Method, path: &str) -> Result<PathMatch, ContractError> {
        // Literal templates win over templates with placeholders
        let mut candidates: Vec<&Arc<OperationDescriptor>> = self
            .operations
            .values()
            .filter(|d| d.method == method)
            .collect();
        candidates.sort_by_key(|d| placeholders(d.path).len());

        candidates
            .into_iter()
            .find_map(|descriptor| {
                match_template(descriptor.path, path).map(|params| PathMatch {
                    descriptor: Arc::clone(descriptor),
                    params,
                })
            })
            .ok_or_else(|| {
                ContractError::not_found(format!("No operation matches {} {}", method, path))
            })
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Builder that checks each descriptor before it is registered
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: ContractRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the standard operations
    pub fn with_standard_operations(self) -> Result<Self, ContractError> {
        catalog::standard_operations()
            .into_iter()
            .try_fold(self, |builder, descriptor| builder.register(descriptor))
    }

    pub fn register(mut self, descriptor: OperationDescriptor) -> Result<Self, ContractError> {
        let key = descriptor.id();

        if self.registry.operations.contains_key(&key) {
            return Err(ContractError::internal(format!(
                "Duplicate operation registration: {}",
                key
            )));
        }

        if !path::is_well_formed(descriptor.path) {
            return Err(ContractError::internal(format!(
                "Operation {} has a malformed path template: {}",
                key, descriptor.path
            )));
        }

        if descriptor.responses.is_empty() {
            return Err(ContractError::internal(format!(
                "Operation {} declares no responses",
                key
            )));
        }

        let clash = self.registry.operations.values().find(|existing| {
            existing.method == descriptor.method && existing.path == descriptor.path
        });
        if let Some(existing) = clash {
            return Err(ContractError::internal(format!(
                "Operations {} and {} share {} {}",
                existing.id(),
                key,
                descriptor.method,
                descriptor.path
            )));
        }

        self.registry.operations.insert(key, Arc::new(descriptor));
        Ok(self)
    }

    pub fn build(self) -> ContractRegistry {
        self.registry
    }
}
