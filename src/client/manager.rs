//! Form + list state for the two catalog screens
//!
//! Every mutation is followed by a full re-fetch of the list; nothing is
//! patched locally. Failures surface as a fixed notice, the detail only goes
//! to the log.

use tracing::warn;

use super::api::{ItemsApi, ProductsApi};
use super::form::{ItemForm, ProductForm};
use crate::catalog::{Attribute, Item, Product};

pub const FETCH_ERROR: &str = "Error fetching items.";
pub const SUBMIT_ERROR: &str = "Error submitting the form.";
pub const DELETE_ERROR: &str = "Error deleting the item.";

/// Screen state for relational items
pub struct ItemManager<A> {
    api: A,
    items: Vec<Item>,
    form: ItemForm,
    editing_id: Option<i64>,
    error: Option<String>,
}

impl<A: ItemsApi> ItemManager<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            items: Vec::new(),
            form: ItemForm::default(),
            editing_id: None,
            error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ItemForm {
        &mut self.form
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing_id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Initial load of the list
    pub async fn mount(&mut self) {
        self.error = None;
        self.refresh().await;
    }

    async fn refresh(&mut self) {
        match self.api.list_items().await {
            Ok(items) => self.items = items,
            Err(e) => {
                warn!(error = %e, "Fetching items failed");
                self.error = Some(FETCH_ERROR.to_string());
            }
        }
    }

    /// Create or update depending on edit mode, then reset and re-fetch
    pub async fn submit(&mut self) {
        self.error = None;

        let result = match self.editing_id {
            Some(id) => self.api.update_item(id, &self.form).await.map(|_| ()),
            None => self.api.create_item(&self.form).await.map(|_| ()),
        };
        if let Err(e) = result {
            warn!(error = %e, "Submitting item failed");
            self.error = Some(SUBMIT_ERROR.to_string());
        }

        self.form = ItemForm::default();
        self.editing_id = None;
        self.refresh().await;
    }

    /// Load an item into the form and switch to edit mode
    pub fn edit(&mut self, item: &Item) {
        self.form = ItemForm::from(item);
        self.editing_id = Some(item.id);
    }

    pub async fn delete(&mut self, id: i64) {
        self.error = None;

        match self.api.delete_item(id).await {
            Ok(()) => self.refresh().await,
            Err(e) => {
                warn!(error = %e, id, "Deleting item failed");
                self.error = Some(DELETE_ERROR.to_string());
            }
        }
    }
}

/// Screen state for document products, with editable attribute rows
pub struct ProductManager<A> {
    api: A,
    items: Vec<Product>,
    form: ProductForm,
    editing_id: Option<String>,
    error: Option<String>,
}

impl<A: ProductsApi> ProductManager<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            items: Vec::new(),
            form: ProductForm::default(),
            editing_id: None,
            error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn mount(&mut self) {
        self.error = None;
        self.refresh().await;
    }

    async fn refresh(&mut self) {
        match self.api.list_products().await {
            Ok(items) => self.items = items,
            Err(e) => {
                warn!(error = %e, "Fetching products failed");
                self.error = Some(FETCH_ERROR.to_string());
            }
        }
    }

    pub async fn submit(&mut self) {
        self.error = None;

        let result = match &self.editing_id {
            Some(id) => self.api.update_product(id, &self.form).await.map(|_| ()),
            None => self.api.create_product(&self.form).await.map(|_| ()),
        };
        if let Err(e) = result {
            warn!(error = %e, "Submitting product failed");
            self.error = Some(SUBMIT_ERROR.to_string());
        }

        self.form = ProductForm::default();
        self.editing_id = None;
        self.refresh().await;
    }

    pub fn edit(&mut self, product: &Product) {
        self.form = ProductForm::from(product);
        self.editing_id = Some(product.id.clone());
    }

    pub async fn delete(&mut self, id: &str) {
        self.error = None;

        match self.api.delete_product(id).await {
            Ok(()) => self.refresh().await,
            Err(e) => {
                warn!(error = %e, id, "Deleting product failed");
                self.error = Some(DELETE_ERROR.to_string());
            }
        }
    }

    /// Append a blank attribute row to the draft
    pub fn add_attribute(&mut self) {
        self.form.attributes.push(Attribute::default());
    }

    /// Returns false when there is no row at `index`
    pub fn set_attribute_key(&mut self, index: usize, key: impl Into<String>) -> bool {
        match self.form.attributes.get_mut(index) {
            Some(attr) => {
                attr.key = key.into();
                true
            }
            None => false,
        }
    }

    /// Returns false when there is no row at `index`
    pub fn set_attribute_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.form.attributes.get_mut(index) {
            Some(attr) => {
                attr.value = value.into();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::api::{ClientError, ClientResult};

    fn api_error() -> ClientError {
        ClientError::Api {
            status: 500,
            body: "boom".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeItems {
        items: Mutex<Vec<Item>>,
        next_id: Mutex<i64>,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl FakeItems {
        fn item_from(id: i64, form: &ItemForm) -> Item {
            Item {
                id,
                name: form.name.clone(),
                description: Some(form.description.clone()).filter(|d| !d.is_empty()),
                price: form.price.parse().unwrap_or_default(),
                stock: form.stock.parse().unwrap_or_default(),
            }
        }
    }

    #[async_trait]
    impl ItemsApi for FakeItems {
        async fn list_items(&self) -> ClientResult<Vec<Item>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(api_error());
            }
            Ok(self.items.lock().unwrap().clone())
        }

        async fn create_item(&self, form: &ItemForm) -> ClientResult<Item> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(api_error());
            }
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let item = Self::item_from(*next_id, form);
            self.items.lock().unwrap().push(item.clone());
            Ok(item)
        }

        async fn update_item(&self, id: i64, form: &ItemForm) -> ClientResult<Item> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(api_error());
            }
            let mut items = self.items.lock().unwrap();
            let slot = items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(api_error)?;
            *slot = Self::item_from(id, form);
            Ok(slot.clone())
        }

        async fn delete_item(&self, id: i64) -> ClientResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(api_error());
            }
            self.items.lock().unwrap().retain(|i| i.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeProducts {
        products: Mutex<Vec<Product>>,
        submitted: Mutex<Vec<ProductForm>>,
    }

    #[async_trait]
    impl ProductsApi for FakeProducts {
        async fn list_products(&self) -> ClientResult<Vec<Product>> {
            Ok(self.products.lock().unwrap().clone())
        }

        async fn create_product(&self, form: &ProductForm) -> ClientResult<Product> {
            self.submitted.lock().unwrap().push(form.clone());
            let mut products = self.products.lock().unwrap();
            let product = Product {
                id: format!("doc{}", products.len()),
                name: form.name.clone(),
                description: None,
                price: form.price.parse().unwrap_or_default(),
                stock: None,
                attributes: form.attributes.clone(),
            };
            products.push(product.clone());
            Ok(product)
        }

        async fn update_product(&self, id: &str, form: &ProductForm) -> ClientResult<Product> {
            self.submitted.lock().unwrap().push(form.clone());
            let mut products = self.products.lock().unwrap();
            let slot = products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(api_error)?;
            slot.name = form.name.clone();
            slot.attributes = form.attributes.clone();
            Ok(slot.clone())
        }

        async fn delete_product(&self, id: &str) -> ClientResult<()> {
            self.products.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }
    }

    fn fill(form: &mut ItemForm, name: &str, price: &str) {
        form.name = name.to_string();
        form.price = price.to_string();
    }

    #[tokio::test]
    async fn submit_creates_then_refetches_and_resets() {
        let mut manager = ItemManager::new(FakeItems::default());
        manager.mount().await;
        assert!(manager.items().is_empty());

        fill(manager.form_mut(), "Widget", "9.99");
        manager.form_mut().stock = "5".to_string();
        manager.submit().await;

        assert_eq!(manager.items().len(), 1);
        assert_eq!(manager.items()[0].name, "Widget");
        assert_eq!(manager.form(), &ItemForm::default());
        assert_eq!(manager.editing_id(), None);
        assert_eq!(manager.error(), None);
    }

    #[tokio::test]
    async fn edit_loads_item_and_submit_updates_it() {
        let mut manager = ItemManager::new(FakeItems::default());
        fill(manager.form_mut(), "Widget", "9.99");
        manager.submit().await;

        let item = manager.items()[0].clone();
        manager.edit(&item);
        assert_eq!(manager.editing_id(), Some(item.id));
        assert_eq!(manager.form().name, "Widget");
        assert_eq!(manager.form().price, "9.99");

        manager.form_mut().name = "Gizmo".to_string();
        manager.submit().await;

        assert_eq!(manager.items().len(), 1);
        assert_eq!(manager.items()[0].id, item.id);
        assert_eq!(manager.items()[0].name, "Gizmo");
        assert_eq!(manager.editing_id(), None);
    }

    #[tokio::test]
    async fn failed_submit_shows_notice_and_still_resets() {
        let mut manager = ItemManager::new(FakeItems::default());
        manager.api().fail_writes.store(true, Ordering::SeqCst);

        fill(manager.form_mut(), "Widget", "9.99");
        manager.submit().await;

        assert_eq!(manager.error(), Some(SUBMIT_ERROR));
        assert_eq!(manager.form(), &ItemForm::default());
        assert!(manager.items().is_empty());
    }

    #[tokio::test]
    async fn delete_refetches_and_failure_keeps_list() {
        let mut manager = ItemManager::new(FakeItems::default());
        fill(manager.form_mut(), "A", "1");
        manager.submit().await;
        fill(manager.form_mut(), "B", "2");
        manager.submit().await;
        assert_eq!(manager.items().len(), 2);

        let first = manager.items()[0].id;
        manager.delete(first).await;
        assert_eq!(manager.items().len(), 1);
        assert_eq!(manager.items()[0].name, "B");

        manager.api().fail_writes.store(true, Ordering::SeqCst);
        let second = manager.items()[0].id;
        manager.delete(second).await;
        assert_eq!(manager.error(), Some(DELETE_ERROR));
        assert_eq!(manager.items().len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_sets_notice_and_next_action_clears_it() {
        let mut manager = ItemManager::new(FakeItems::default());
        manager.api().fail_reads.store(true, Ordering::SeqCst);
        manager.mount().await;
        assert_eq!(manager.error(), Some(FETCH_ERROR));

        manager.api().fail_reads.store(false, Ordering::SeqCst);
        manager.mount().await;
        assert_eq!(manager.error(), None);
    }

    #[tokio::test]
    async fn attribute_rows_are_edited_independently() {
        let mut manager = ProductManager::new(FakeProducts::default());
        manager.form_mut().name = "Gadget".to_string();
        manager.form_mut().price = "3".to_string();

        manager.add_attribute();
        manager.add_attribute();
        assert!(manager.set_attribute_key(0, "color"));
        assert!(manager.set_attribute_value(0, "red"));
        assert!(manager.set_attribute_value(1, "large"));
        assert!(!manager.set_attribute_key(2, "missing"));

        assert_eq!(
            manager.form().attributes,
            vec![Attribute::new("color", "red"), Attribute::new("", "large")]
        );

        manager.submit().await;
        assert_eq!(manager.items().len(), 1);
        assert_eq!(manager.items()[0].attributes.len(), 2);
        assert!(manager.form().attributes.is_empty());
    }

    #[tokio::test]
    async fn product_edit_submits_full_attribute_list() {
        let mut manager = ProductManager::new(FakeProducts::default());
        manager.form_mut().name = "Gadget".to_string();
        manager.add_attribute();
        manager.set_attribute_key(0, "color");
        manager.submit().await;

        let product = manager.items()[0].clone();
        manager.edit(&product);
        assert_eq!(manager.editing_id(), Some(product.id.as_str()));
        manager.form_mut().attributes.clear();
        manager.submit().await;

        assert!(manager.items()[0].attributes.is_empty());
        let submitted = manager.api().submitted.lock().unwrap();
        assert_eq!(submitted.len(), 2);
        assert!(submitted[1].attributes.is_empty());
    }
}
