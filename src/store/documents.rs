//! Embedded document store for products
//!
//! Documents live in memory in insertion order and are persisted to an
//! append-only datafile of newline-delimited JSON:
//!
//! ```text
//! {"_id":"a1B2c3D4e5F6g7H8","name":"Gadget","price":3.0,...}   insert
//! {"_id":"a1B2c3D4e5F6g7H8","name":"Gadget","price":4.0,...}   full replace
//! {"_id":"a1B2c3D4e5F6g7H8","$$deleted":true}                  delete
//! ```
//!
//! Opening the store replays the file (later lines win) and rewrites it with
//! only the live documents. Every mutation is appended to the datafile before
//! the in-memory collection changes, so a failed write leaves both untouched.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::error::{StoreError, StoreResult};
use super::ProductStore;
use crate::catalog::{NewProduct, Product};

/// Length of generated document ids
pub const ID_LENGTH: usize = 16;

/// Share of unreadable datafile lines tolerated on open
pub const CORRUPT_ALERT_THRESHOLD: f64 = 0.1;

const DELETED_MARKER: &str = "$$deleted";

#[derive(Serialize)]
struct Tombstone<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
    #[serde(rename = "$$deleted")]
    deleted: bool,
}

struct Collection {
    docs: Vec<Product>,
    datafile: Option<PathBuf>,
}

impl Collection {
    fn position(&self, id: &str) -> Option<usize> {
        self.docs.iter().position(|doc| doc.id == id)
    }

    fn generate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(ID_LENGTH)
                .map(char::from)
                .collect();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    async fn append<T: Serialize>(&self, record: &T) -> StoreResult<()> {
        let Some(path) = &self.datafile else {
            return Ok(());
        };

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .await?;

        // a line left without its newline must not swallow this record
        let prev_len = file.metadata().await?.len();
        if prev_len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(prev_len - 1)).await?;
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                warn!(path = %path.display(), "Datafile ends mid-line, starting a new one");
                line.insert(0, '\n');
            }
        }

        let written = async {
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            if let Err(truncate) = file.set_len(prev_len).await {
                error!(error = %truncate, path = %path.display(), "Failed to roll back partial append");
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Rewrite the datafile with only the live documents
    async fn compact(&self) -> StoreResult<()> {
        let Some(path) = &self.datafile else {
            return Ok(());
        };

        let mut contents = String::new();
        for doc in &self.docs {
            contents.push_str(&serde_json::to_string(doc)?);
            contents.push('\n');
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), documents = self.docs.len(), "Compacted datafile");
        Ok(())
    }
}

/// Products collection
pub struct DocumentStore {
    inner: Mutex<Collection>,
}

impl DocumentStore {
    /// Load the collection from `path`, creating the datafile if missing
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), "Opening document store");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let collection = Collection {
            docs: replay(&raw)?,
            datafile: Some(path),
        };
        collection.compact().await?;

        info!(documents = collection.docs.len(), "Document store is ready");
        Ok(Self {
            inner: Mutex::new(collection),
        })
    }

    /// Collection without a datafile
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Collection {
                docs: Vec::new(),
                datafile: None,
            }),
        }
    }

    /// Compact the datafile before shutdown
    pub async fn close(&self) -> StoreResult<()> {
        let collection = self.inner.lock().await;
        collection.compact().await?;
        info!("Document store closed");
        Ok(())
    }
}

/// Rebuild the live documents from datafile contents
fn replay(raw: &str) -> StoreResult<Vec<Product>> {
    let mut docs: Vec<Product> = Vec::new();
    let mut total = 0usize;
    let mut corrupt = 0usize;

    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        total += 1;

        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable datafile line");
                corrupt += 1;
                continue;
            }
        };

        if value.get(DELETED_MARKER).and_then(|v| v.as_bool()) == Some(true) {
            if let Some(id) = value.get("_id").and_then(|v| v.as_str()) {
                docs.retain(|doc| doc.id != id);
            }
            continue;
        }

        match serde_json::from_value::<Product>(value) {
            Ok(doc) => match docs.iter_mut().find(|d| d.id == doc.id) {
                Some(existing) => *existing = doc,
                None => docs.push(doc),
            },
            Err(e) => {
                warn!(error = %e, "Skipping malformed document");
                corrupt += 1;
            }
        }
    }

    if total > 0 && corrupt as f64 / total as f64 > CORRUPT_ALERT_THRESHOLD {
        return Err(StoreError::Corrupt { corrupt, total });
    }

    Ok(docs)
}

#[async_trait]
impl ProductStore for DocumentStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let collection = self.inner.lock().await;
        debug!(count = collection.docs.len(), "Listed products");
        Ok(collection.docs.clone())
    }

    async fn create(&self, product: NewProduct) -> StoreResult<Product> {
        let mut collection = self.inner.lock().await;

        let product = product.into_product(collection.generate_id());
        collection.append(&product).await?;
        collection.docs.push(product.clone());

        debug!(id = %product.id, attributes = product.attributes.len(), "Inserted product");
        Ok(product)
    }

    async fn update(&self, id: &str, product: NewProduct) -> StoreResult<Product> {
        let mut collection = self.inner.lock().await;

        let index = collection
            .position(id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        let product = product.into_product(id.to_string());
        collection.append(&product).await?;
        collection.docs[index] = product.clone();

        debug!(id, attributes = product.attributes.len(), "Replaced product");
        Ok(product)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut collection = self.inner.lock().await;

        let index = collection
            .position(id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        collection.append(&Tombstone { id, deleted: true }).await?;
        collection.docs.remove(index);

        debug!(id, "Deleted product");
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.lock().await.docs.len() as u64)
    }
}
