//! Request model and path routing.
//!
//! # Invariants
//! - Path ids are positive integers that fit in `i64`; anything else does
//!   not match a route.
//! - Routing is pure: no storage access happens here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static USER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/users/([1-9][0-9]*)$").expect("valid user route regex"));
static PRODUCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/products/([1-9][0-9]*)$").expect("valid product route regex"));
static ORDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/orders/([1-9][0-9]*)$").expect("valid order route regex"));
static ORDER_ADD_PRODUCT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/orders/([1-9][0-9]*)/add_product/([1-9][0-9]*)$")
        .expect("valid add_product route regex")
});

/// Request methods understood by the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unsupported method `{other}`")),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// One inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Parsed JSON body; `None` when the request carried no body.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Resource addressed by a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Users,
    User(i64),
    Products,
    Product(i64),
    Orders,
    Order(i64),
    OrderAddProduct { order_id: i64, product_id: i64 },
}

impl Route {
    /// Methods accepted on this route.
    pub fn allowed_methods(self) -> &'static [Method] {
        match self {
            Self::Home | Self::Order(_) => &[Method::Get],
            Self::Users | Self::Products => &[Method::Get, Method::Post],
            Self::User(_) | Self::Product(_) => &[Method::Get, Method::Put, Method::Delete],
            Self::Orders => &[Method::Post],
            Self::OrderAddProduct { .. } => &[Method::Put],
        }
    }
}

/// Resolves a request path to a route.
///
/// A query string and a single trailing slash are ignored.
pub fn match_route(path: &str) -> Option<Route> {
    let path = path.split('?').next().unwrap_or_default();
    let path = match path.strip_suffix('/') {
        Some("") | None => path,
        Some(stripped) => stripped,
    };

    match path {
        "/" => return Some(Route::Home),
        "/users" => return Some(Route::Users),
        "/products" => return Some(Route::Products),
        "/orders" => return Some(Route::Orders),
        _ => {}
    }

    if let Some(id) = capture_id(&USER_RE, path) {
        return Some(Route::User(id));
    }
    if let Some(id) = capture_id(&PRODUCT_RE, path) {
        return Some(Route::Product(id));
    }
    if let Some(id) = capture_id(&ORDER_RE, path) {
        return Some(Route::Order(id));
    }

    let caps = ORDER_ADD_PRODUCT_RE.captures(path)?;
    Some(Route::OrderAddProduct {
        order_id: caps[1].parse().ok()?,
        product_id: caps[2].parse().ok()?,
    })
}

fn capture_id(pattern: &Regex, path: &str) -> Option<i64> {
    pattern.captures(path)?[1].parse().ok()
}
