//! External collaborators
//!
//! Catalog loading and order delivery are the only suspension points. The
//! stores never call these directly; the session (or the host) awaits them and
//! feeds the results back in as new events.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::{ProductRecord, RawCategory};
use tracing::{debug, info};

use crate::error::{DeskError, DeskResult};

pub const GROUPS_FILE: &str = "groups.json";
pub const ITEMS_FILE: &str = "items.json";

/// Where the category tree and the product list come from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_categories(&self) -> DeskResult<Vec<RawCategory>>;

    async fn load_products(&self) -> DeskResult<Vec<ProductRecord>>;
}

/// Where finished order texts go
#[async_trait]
pub trait OrderDelivery: Send + Sync {
    /// Deliver `text`; returns a location the host can show the user
    async fn deliver(&self, text: &str, file_name: &str) -> DeskResult<String>;
}

/// `groups.json` and `items.json` in one directory
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_list<T: DeserializeOwned>(&self, file: &str) -> DeskResult<Vec<T>> {
        let path = self.dir.join(file);
        let content = tokio::fs::read_to_string(&path).await?;
        let list: Vec<T> = serde_json::from_str(&content)
            .map_err(|e| DeskError::MalformedSource(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), records = list.len(), "Catalog file read");
        Ok(list)
    }
}

#[async_trait]
impl CatalogSource for JsonDirSource {
    async fn load_categories(&self) -> DeskResult<Vec<RawCategory>> {
        self.read_list(GROUPS_FILE).await
    }

    async fn load_products(&self) -> DeskResult<Vec<ProductRecord>> {
        self.read_list(ITEMS_FILE).await
    }
}

/// Writes each order as a text file into a directory
#[derive(Debug, Clone)]
pub struct FileDelivery {
    dir: PathBuf,
}

impl FileDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl OrderDelivery for FileDelivery {
    async fn deliver(&self, text: &str, file_name: &str) -> DeskResult<String> {
        let path = self.dir.join(file_name);
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DeskError::Delivery(format!("{}: {}", self.dir.display(), e)))?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| DeskError::Delivery(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), bytes = text.len(), "Order delivered");
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) {
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[tokio::test]
    async fn test_json_dir_source_reads_both_files() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            GROUPS_FILE,
            r#"[{"id": 1, "code": "A", "name": "Tools", "children": [{"id": 2, "code": "A1", "name": "Drills"}]}]"#,
        );
        write(
            dir.path(),
            ITEMS_FILE,
            r#"[{"code": 1, "name": "Drill", "price": "1 000,50", "group_code": "A1"}]"#,
        );

        let source = JsonDirSource::new(dir.path());
        let groups = source.load_categories().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].children.as_ref().map(Vec::len), Some(1));

        let items = source.load_products().await.unwrap();
        assert_eq!(items[0].code, "1");
        assert_eq!(items[0].group_code, "A1");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let source = JsonDirSource::new(dir.path());
        assert!(matches!(
            source.load_products().await,
            Err(DeskError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ITEMS_FILE, r#"{"items": []}"#);
        let source = JsonDirSource::new(dir.path());
        assert!(matches!(
            source.load_products().await,
            Err(DeskError::MalformedSource(_))
        ));
    }

    #[tokio::test]
    async fn test_file_delivery_writes_text() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("orders");
        let delivery = FileDelivery::new(&out);

        let location = delivery.deliver("Order\n", "order.txt").await.unwrap();
        assert!(location.ends_with("order.txt"));
        assert_eq!(
            std::fs::read_to_string(out.join("order.txt")).unwrap(),
            "Order\n"
        );
    }

    #[tokio::test]
    async fn test_file_delivery_failure_is_delivery_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let delivery = FileDelivery::new(&blocker);
        assert!(matches!(
            delivery.deliver("Order\n", "order.txt").await,
            Err(DeskError::Delivery(_))
        ));
    }
}
