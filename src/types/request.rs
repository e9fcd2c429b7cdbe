//! Request Descriptor
//!
//! A single call: method, target, query, body and optional organization.

use serde_json::Value;
use std::collections::BTreeMap;

use super::fields::{parse_json_field, parse_query_pairs};
use crate::core::HttpMethod;
use crate::endpoint::Product;
use crate::error::ValidationError;

/// Query parameters. Order is irrelevant to the server; a sorted map keeps
/// generated URLs deterministic.
pub type Query = BTreeMap<String, String>;

/// Where a request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// Path relative to the product's regional base URL.
    Product { product: Product, path: String },
    /// Fully-qualified URL, used as-is.
    Url(String),
}

/// Descriptor for one authenticated call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub target: RequestTarget,
    pub query: Query,
    pub body: Option<Value>,
    /// Organization id for subscription-style endpoints.
    pub organization_id: Option<String>,
}

impl RequestDescriptor {
    /// Create a descriptor for a product path.
    pub fn new(method: HttpMethod, product: Product, path: impl Into<String>) -> Self {
        Self {
            method,
            target: RequestTarget::Product {
                product,
                path: path.into(),
            },
            query: Query::new(),
            body: None,
            organization_id: None,
        }
    }

    /// Create a descriptor for a fully-qualified URL.
    pub fn url(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            target: RequestTarget::Url(url.into()),
            query: Query::new(),
            body: None,
            organization_id: None,
        }
    }

    pub fn get(product: Product, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, product, path)
    }

    pub fn post(product: Product, path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, product, path).with_body(body)
    }

    pub fn put(product: Product, path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, product, path).with_body(body)
    }

    pub fn patch(product: Product, path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, product, path).with_body(body)
    }

    pub fn delete(product: Product, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, product, path)
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Replace all query parameters.
    pub fn with_query_map(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the body from a caller-supplied JSON string.
    pub fn with_json_body(mut self, field: &str, raw: &str) -> Result<Self, ValidationError> {
        self.body = Some(parse_json_field(field, raw)?);
        Ok(self)
    }

    /// Merge query parameters given as a JSON object of scalars.
    pub fn with_json_query(mut self, value: &Value) -> Result<Self, ValidationError> {
        self.query.extend(parse_query_pairs(value)?);
        Ok(self)
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Product the request targets, if any.
    pub fn product(&self) -> Option<Product> {
        match &self.target {
            RequestTarget::Product { product, .. } => Some(*product),
            RequestTarget::Url(_) => None,
        }
    }
}
