//! Catalog records as stored and as returned over the wire

use serde::{Deserialize, Serialize};

/// Row of the relational `items` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
}

/// Validated fields for inserting or fully replacing an [`Item`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
}

/// Free-text key/value pair attached to a [`Product`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Document of the products collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: Option<i64>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Validated fields for inserting or fully replacing a [`Product`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: Option<i64>,
    pub attributes: Vec<Attribute>,
}

impl NewProduct {
    /// Attach a store-assigned identifier
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_serializes_identifier_as_underscore_id() {
        let product = NewProduct {
            name: "Gadget".to_string(),
            description: None,
            price: 3.0,
            stock: None,
            attributes: vec![Attribute::new("color", "red")],
        }
        .into_product("abc".to_string());

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["_id"], "abc");
        assert!(json.get("id").is_none());
        assert_eq!(json["attributes"][0]["key"], "color");
        assert!(json["stock"].is_null());
    }

    #[test]
    fn attribute_fields_default_to_empty() {
        let attr: Attribute = serde_json::from_str(r#"{"key":"size"}"#).unwrap();
        assert_eq!(attr, Attribute::new("size", ""));
    }
}
