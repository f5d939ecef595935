//! Form drafts as typed by a user

use serde::{Deserialize, Serialize};

use crate::catalog::{Attribute, Item, Product};

/// Draft of a relational item; numbers stay text until the server parses them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemForm {
    pub name: String,
    #[serde(with = "blank_as_null")]
    pub description: String,
    pub price: String,
    pub stock: String,
}

impl From<&Item> for ItemForm {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            price: item.price.to_string(),
            stock: item.stock.to_string(),
        }
    }
}

/// Draft of a document product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(with = "blank_as_null")]
    pub description: String,
    pub price: String,
    pub stock: String,
    pub attributes: Vec<Attribute>,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            stock: product.stock.map(|s| s.to_string()).unwrap_or_default(),
            attributes: product.attributes.clone(),
        }
    }
}

/// An empty description input is sent as `null`
mod blank_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}
