//! Request payloads and the parse-and-validate step in front of the stores
//!
//! Form clients send `price` and `stock` as strings, JSON clients send numbers.
//! Both shapes are accepted here and turned into typed fields, anything else is
//! rejected before a store is touched.

use serde::{Deserialize, Serialize};

use super::model::{Attribute, NewItem, NewProduct};

/// A scalar that may arrive as a JSON number or as text typed into a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(serde_json::Number),
    Text(String),
}

impl FormValue {
    fn raw(&self) -> String {
        match self {
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(FormValue::Number)
            .unwrap_or_else(|| FormValue::Text(value.to_string()))
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Number(value.into())
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

/// Body of `POST /api/items` and `PUT /api/items/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<FormValue>,
    pub stock: Option<FormValue>,
}

/// Body of `POST /api/products` and `PUT /api/products/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<FormValue>,
    pub stock: Option<FormValue>,
    pub attributes: Option<Vec<Attribute>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Field {0} must not be negative")]
    Negative(&'static str),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl TryFrom<ItemPayload> for NewItem {
    type Error = ValidationError;

    fn try_from(payload: ItemPayload) -> Result<Self, Self::Error> {
        Ok(NewItem {
            name: parse_name(payload.name)?,
            description: payload.description,
            price: parse_price(payload.price.as_ref())?,
            // NOT NULL column, absent stock is stored as zero
            stock: parse_stock(payload.stock.as_ref())?.unwrap_or(0),
        })
    }
}

impl TryFrom<ProductPayload> for NewProduct {
    type Error = ValidationError;

    fn try_from(payload: ProductPayload) -> Result<Self, Self::Error> {
        Ok(NewProduct {
            name: parse_name(payload.name)?,
            description: payload.description,
            price: parse_price(payload.price.as_ref())?,
            stock: parse_stock(payload.stock.as_ref())?,
            attributes: payload.attributes.unwrap_or_default(),
        })
    }
}

fn parse_name(name: Option<String>) -> Result<String, ValidationError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ValidationError::MissingField("name")),
    }
}

/// Price is required and must be a finite, non-negative decimal
pub fn parse_price(value: Option<&FormValue>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField("price"))?;
    let invalid = || ValidationError::InvalidNumber {
        field: "price",
        value: value.raw(),
    };

    let price = match value {
        FormValue::Number(n) => n.as_f64().ok_or_else(invalid)?,
        FormValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(ValidationError::MissingField("price"));
            }
            s.parse::<f64>().map_err(|_| invalid())?
        }
    };

    if !price.is_finite() {
        return Err(invalid());
    }
    if price < 0.0 {
        return Err(ValidationError::Negative("price"));
    }
    Ok(price)
}

/// Stock is optional; blank text counts as absent
pub fn parse_stock(value: Option<&FormValue>) -> Result<Option<i64>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let invalid = || ValidationError::InvalidNumber {
        field: "stock",
        value: value.raw(),
    };

    let stock = match value {
        FormValue::Number(n) => match n.as_i64() {
            Some(v) => v,
            None => {
                // 5.0 is still a whole number
                let f = n.as_f64().ok_or_else(invalid)?;
                // i64::MAX as f64 rounds up to 2^63, itself out of range
                if f.fract() != 0.0 || f.abs() >= i64::MAX as f64 {
                    return Err(invalid());
                }
                f as i64
            }
        },
        FormValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>().map_err(|_| invalid())?
        }
    };

    if stock < 0 {
        return Err(ValidationError::Negative("stock"));
    }
    Ok(Some(stock))
}
