use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use notification_store::engine::{EngineError, InMemoryEngine, StorageEngine};
use notification_store::{
    Collection, CollectionName, Database, DatabaseConfig, Notification, NotificationSource,
    StoredNotification,
};
use tempfile::TempDir;

static GENERATED: AtomicUsize = AtomicUsize::new(0);

/// An initialized database plus whatever keeps its storage alive.
pub struct Fixture {
    pub label: &'static str,
    pub database: Database,
    _dir: Option<TempDir>,
}

impl Fixture {
    pub fn notes(&self) -> Collection<StoredNotification> {
        self.database.get::<StoredNotification>().unwrap()
    }
}

/// One freshly initialized database per backend.
pub async fn fixtures() -> Vec<Fixture> {
    let memory = Database::in_memory().delayed_init().await.unwrap();

    let dir = TempDir::new().unwrap();
    let sqlite = Database::new(DatabaseConfig::sqlite(dir.path().join("notifications.db")))
        .delayed_init()
        .await
        .unwrap();

    vec![
        Fixture {
            label: "memory",
            database: memory,
            _dir: None,
        },
        Fixture {
            label: "sqlite",
            database: sqlite,
            _dir: Some(dir),
        },
    ]
}

/// A notification with a fresh, ascending id.
pub fn generate() -> StoredNotification {
    let n = GENERATED.fetch_add(1, Ordering::SeqCst) + 1;
    generate_with_id(&format!("generated-{:06}", n), "")
}

pub fn generate_with_id(id: &str, title: &str) -> StoredNotification {
    StoredNotification {
        id: id.to_string(),
        notification: Notification::new(id, title, 1),
        source: NotificationSource::default(),
    }
}

pub fn ids(records: &[StoredNotification]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

/// Sorted copy, for comparisons against `get_all`.
pub fn sorted(mut records: Vec<StoredNotification>) -> Vec<StoredNotification> {
    records.sort_by(|a, b| a.id.cmp(&b.id));
    records
}

/// Wraps an in-memory engine, counting provisions and failing on demand.
#[derive(Default)]
pub struct ProbeEngine {
    inner: InMemoryEngine,
    pub provisions: AtomicUsize,
    pub fail_provision: bool,
    pub provision_delay: Option<std::time::Duration>,
    pub fail_io: std::sync::atomic::AtomicBool,
}

impl ProbeEngine {
    pub fn failing_provision() -> Self {
        Self {
            fail_provision: true,
            ..Self::default()
        }
    }

    pub fn slow_provision(delay: std::time::Duration) -> Self {
        Self {
            provision_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_io.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), EngineError> {
        if self.fail_io.load(Ordering::SeqCst) {
            return Err(EngineError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk quota exceeded",
            )));
        }
        Ok(())
    }
}

impl StorageEngine for ProbeEngine {
    fn provision(&self, collections: &[CollectionName]) -> Result<(), EngineError> {
        self.provisions.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.provision_delay {
            std::thread::sleep(delay);
        }
        if self.fail_provision {
            return Err(EngineError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        self.inner.provision(collections)
    }

    fn get(&self, collection: CollectionName, id: &str) -> Result<Option<Vec<u8>>, EngineError> {
        self.check()?;
        self.inner.get(collection, id)
    }

    fn get_all(&self, collection: CollectionName) -> Result<Vec<Vec<u8>>, EngineError> {
        self.check()?;
        self.inner.get_all(collection)
    }

    fn get_many(
        &self,
        collection: CollectionName,
        ids: &[String],
    ) -> Result<Vec<Vec<u8>>, EngineError> {
        self.check()?;
        self.inner.get_many(collection, ids)
    }

    fn put_many(
        &self,
        collection: CollectionName,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<(), EngineError> {
        self.check()?;
        self.inner.put_many(collection, entries)
    }

    fn delete_many(&self, collection: CollectionName, ids: &[String]) -> Result<usize, EngineError> {
        self.check()?;
        self.inner.delete_many(collection, ids)
    }
}

pub fn probe_database(engine: ProbeEngine) -> (Database, Arc<ProbeEngine>) {
    let engine = Arc::new(engine);
    let database = Database::with_engine(engine.clone());
    (database, engine)
}
