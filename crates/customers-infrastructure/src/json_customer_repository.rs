//! JSON file-based CustomerRepository implementation.
//!
//! The whole collection lives in one JSON array document. It is read once,
//! cached, and rewritten in full after every mutation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use customers_core::config::StoreSettings;
use customers_core::customer::{Customer, CustomerRepository, CustomerSeeder};
use customers_core::error::{CustomersError, Result};

use crate::paths::CustomersPaths;
use crate::storage::AtomicJsonFile;

/// A repository that persists customers to a JSON document.
///
/// On first access the document is read into memory. A missing, blank or
/// malformed document is replaced by `seed_count` generated customers, which
/// are written back before the first call returns. An empty JSON array is a
/// legitimate empty collection and is not re-seeded.
///
/// Mutations hold the cache lock while the document is rewritten, so writes
/// are serialized and the cache only changes once the write succeeded.
pub struct JsonCustomerRepository {
    file: Arc<AtomicJsonFile<Vec<Customer>>>,
    seeder: Arc<dyn CustomerSeeder>,
    seed_count: usize,
    customers: Mutex<Option<Vec<Customer>>>,
}

impl JsonCustomerRepository {
    pub fn new(path: PathBuf, seeder: Arc<dyn CustomerSeeder>, seed_count: usize) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
            seeder,
            seed_count,
            customers: Mutex::new(None),
        }
    }

    /// Creates a repository at the document location named by `settings`.
    pub fn from_paths(
        paths: &CustomersPaths,
        settings: &StoreSettings,
        seeder: Arc<dyn CustomerSeeder>,
    ) -> Result<Self> {
        Ok(Self::new(
            paths.customers_file(settings)?,
            seeder,
            settings.seed_count,
        ))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Locks the cache, initializing it from disk on first use.
    async fn loaded(&self) -> Result<MappedMutexGuard<'_, Vec<Customer>>> {
        let mut guard = self.customers.lock().await;
        if guard.is_none() {
            *guard = Some(self.initialize().await?);
        }
        Ok(MutexGuard::map(guard, |slot| slot.get_or_insert_with(Vec::new)))
    }

    async fn initialize(&self) -> Result<Vec<Customer>> {
        match self.read_document().await {
            Ok(Some(customers)) => {
                tracing::debug!(
                    "Loaded {} customers from {}",
                    customers.len(),
                    self.path().display()
                );
                Ok(customers)
            }
            Ok(None) => {
                tracing::info!(
                    "No customer data at {}, seeding {} customers",
                    self.path().display(),
                    self.seed_count
                );
                self.seed().await
            }
            Err(e) if e.is_serialization() => {
                tracing::warn!(
                    "Customer data at {} is unreadable ({}), re-seeding",
                    self.path().display(),
                    e
                );
                self.seed().await
            }
            Err(e) => Err(e),
        }
    }

    async fn seed(&self) -> Result<Vec<Customer>> {
        let customers = self.seeder.generate(self.seed_count);
        self.write_document(customers.clone()).await?;
        Ok(customers)
    }

    async fn read_document(&self) -> Result<Option<Vec<Customer>>> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| CustomersError::internal(format!("Store read task failed: {}", e)))?
    }

    async fn write_document(&self, customers: Vec<Customer>) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.save(&customers))
            .await
            .map_err(|e| CustomersError::internal(format!("Store write task failed: {}", e)))?
    }
}

#[async_trait]
impl CustomerRepository for JsonCustomerRepository {
    async fn load_all(&self) -> Result<Vec<Customer>> {
        Ok(self.loaded().await?.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>> {
        Ok(self.loaded().await?.iter().find(|c| c.id == id).cloned())
    }

    async fn save(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.loaded().await?;

        let mut updated = customers.clone();
        match updated.iter_mut().find(|c| c.id == customer.id) {
            Some(existing) => *existing = customer.clone(),
            None => updated.push(customer.clone()),
        }

        self.write_document(updated.clone()).await?;
        *customers = updated;
        tracing::debug!("Saved customer {}", customer.id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut customers = self.loaded().await?;

        if !customers.iter().any(|c| c.id == id) {
            tracing::debug!("Delete of unknown customer {} ignored", id);
            return Ok(());
        }

        let remaining: Vec<Customer> = customers.iter().filter(|c| c.id != id).cloned().collect();
        self.write_document(remaining.clone()).await?;
        *customers = remaining;
        tracing::debug!("Deleted customer {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::InvariantLocalization;
    use crate::seed::FakeCustomerSeeder;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn seeder() -> Arc<dyn CustomerSeeder> {
        Arc::new(FakeCustomerSeeder::new(Arc::new(InvariantLocalization)).with_seed(42))
    }

    fn repository(dir: &TempDir) -> JsonCustomerRepository {
        JsonCustomerRepository::new(dir.path().join("customers.json"), seeder(), 300)
    }

    fn named(id: &str, first: &str, last: &str) -> Customer {
        Customer {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Customer::default()
        }
    }

    #[tokio::test]
    async fn test_first_load_seeds_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        let first = repo.load_all().await.unwrap();
        assert_eq!(first.len(), 300);
        assert!(repo.path().exists());
        let ids: HashSet<&str> = first.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 300);

        // A fresh repository over the same file reads back the same records.
        let reopened = repository(&temp_dir);
        assert_eq!(reopened.load_all().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_seed_uses_configured_count() {
        let temp_dir = TempDir::new().unwrap();
        let settings = StoreSettings {
            file_name: "people.json".to_string(),
            seed_count: 5,
        };
        let paths = CustomersPaths::new(Some(temp_dir.path()));
        let repo = JsonCustomerRepository::from_paths(&paths, &settings, seeder()).unwrap();

        assert_eq!(repo.load_all().await.unwrap().len(), 5);
        assert_eq!(repo.path(), temp_dir.path().join("people.json"));
    }

    #[tokio::test]
    async fn test_blank_and_malformed_documents_are_reseeded() {
        for content in ["", "   \n\t", "{not json", "{\"id\": \"x\"}"] {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("customers.json");
            std::fs::write(&path, content).unwrap();

            let repo = JsonCustomerRepository::new(path.clone(), seeder(), 10);
            assert_eq!(repo.load_all().await.unwrap().len(), 10, "content {content:?}");

            let on_disk: Vec<Customer> =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(on_disk.len(), 10);
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_document_is_reseeded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");
        std::fs::write(&path, [0x5b, 0xff, 0xfe, 0x00]).unwrap();

        let repo = JsonCustomerRepository::new(path.clone(), seeder(), 10);
        assert_eq!(repo.load_all().await.unwrap().len(), 10);

        let reopened = JsonCustomerRepository::new(path, seeder(), 10);
        assert_eq!(reopened.load_all().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_empty_array_is_an_empty_collection() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");
        std::fs::write(&path, "[]").unwrap();

        let repo = JsonCustomerRepository::new(path, seeder(), 10);
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_and_missing_fields_are_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","firstName":"Ann","lastName":"Lee","favouriteColour":"green"}]"#,
        )
        .unwrap();

        let repo = JsonCustomerRepository::new(path, seeder(), 10);
        let customers = repo.load_all().await.unwrap();

        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].first_name, "Ann");
        assert_eq!(customers[0].email, "");
    }

    #[tokio::test]
    async fn test_save_replaces_in_place_and_appends_new() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");
        std::fs::write(&path, "[]").unwrap();
        let repo = JsonCustomerRepository::new(path, seeder(), 0);

        repo.save(&named("a", "Ann", "Lee")).await.unwrap();
        repo.save(&named("b", "Bob", "Ray")).await.unwrap();
        repo.save(&named("a", "Anne", "Lee")).await.unwrap();

        let customers = repo.load_all().await.unwrap();
        let names: Vec<&str> = customers.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Anne", "Bob"]);
        assert_eq!(
            repo.find_by_id("a").await.unwrap().unwrap().first_name,
            "Anne"
        );
    }

    #[tokio::test]
    async fn test_mutations_are_flushed_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let seeded = repo.load_all().await.unwrap();

        let mut edited = seeded[0].clone();
        edited.company = "Renamed Co".to_string();
        repo.save(&edited).await.unwrap();
        repo.delete(&seeded[1].id).await.unwrap();

        let reopened = repository(&temp_dir);
        let reloaded = reopened.load_all().await.unwrap();
        assert_eq!(reloaded.len(), 299);
        assert_eq!(reloaded[0].company, "Renamed Co");
        assert!(reopened.find_by_id(&seeded[1].id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let before = repo.load_all().await.unwrap();

        repo.delete("does-not-exist").await.unwrap();

        assert_eq!(repo.load_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_concurrent_saves_all_land() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");
        std::fs::write(&path, "[]").unwrap();
        let repo = Arc::new(JsonCustomerRepository::new(path.clone(), seeder(), 0));

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.save(&named(&format!("id-{i}"), "F", &format!("L{i}")))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let reopened = JsonCustomerRepository::new(path, seeder(), 0);
        assert_eq!(reopened.load_all().await.unwrap().len(), 16);
    }
}
