//! Mock object store shared by command tests

use std::path::Path;

use async_trait::async_trait;
use ojs_core::{ContainerInfo, ObjectInfo, ObjectStore, Result, StorageItem};

mockall::mock! {
    pub Store {}

    #[async_trait]
    impl ObjectStore for Store {
        async fn stat(&self, path: &str) -> Result<StorageItem>;
        async fn list(&self, path: &str) -> Result<Vec<String>>;
        async fn get_object(&self, path: &str, dest: &Path) -> Result<u64>;
        async fn put_object(&self, path: &str, source: &Path, content_type: &str) -> Result<u64>;
        async fn put_container(&self, path: &str, headers: Vec<(String, String)>) -> Result<()>;
        async fn post(&self, path: &str, headers: Vec<(String, String)>) -> Result<()>;
        async fn delete(&self, path: &str) -> Result<()>;
    }
}

pub fn container(name: &str) -> StorageItem {
    StorageItem::Container(ContainerInfo {
        name: name.to_string(),
        ..Default::default()
    })
}

pub fn object(name: &str) -> StorageItem {
    StorageItem::Object(ObjectInfo {
        name: name.to_string(),
        ..Default::default()
    })
}
