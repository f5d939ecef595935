//! Catalog data model and request validation shared by both stores

pub mod model;
pub mod validation;

pub use model::{Attribute, Item, NewItem, NewProduct, Product};
pub use validation::{FormValue, ItemPayload, ProductPayload, ValidationError};
