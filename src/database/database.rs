use std::fmt;
use std::sync::{Arc, OnceLock};

use tokio::sync::OnceCell;
use tracing::{error, info};

use super::Collection;
use crate::config::{Backend, DatabaseConfig};
use crate::engine::{EngineError, InMemoryEngine, StorageEngine};
use crate::error::DatabaseError;
use crate::record::{CollectionName, Record};

type Opener = Box<dyn Fn() -> Result<Arc<dyn StorageEngine>, EngineError> + Send + Sync>;
type Ready = Result<Arc<dyn StorageEngine>, DatabaseError>;

/// Owner of the storage handle.
///
/// Storage opens on the first call to [`delayed_init`](Self::delayed_init).
/// Concurrent callers share one initialization, and its outcome is cached:
/// a database that failed to open keeps reporting the same error. Clones share
/// the handle.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    /// `None` when built over a caller-supplied engine.
    config: Option<DatabaseConfig>,
    opener: Opener,
    /// Set by the blocking open itself, so an open that outlives a cancelled
    /// `delayed_init` is reused instead of repeated.
    opened: OnceLock<Ready>,
    engine: OnceCell<Ready>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.inner.config)
            .field("initialized", &self.inner.engine.initialized())
            .finish()
    }
}

impl Database {
    /// Create a database for `config`. Nothing is opened until
    /// [`delayed_init`](Self::delayed_init).
    pub fn new(config: DatabaseConfig) -> Self {
        let opener_config = config.clone();
        Self::build(Some(config), Box::new(move || open_engine(&opener_config)))
    }

    /// Create a database backed by process-local memory.
    pub fn in_memory() -> Self {
        Self::new(DatabaseConfig::memory())
    }

    /// Create a database over an existing engine. The engine is still
    /// provisioned lazily by [`delayed_init`](Self::delayed_init).
    pub fn with_engine(engine: Arc<dyn StorageEngine>) -> Self {
        Self::build(None, Box::new(move || Ok(Arc::clone(&engine))))
    }

    fn build(config: Option<DatabaseConfig>, opener: Opener) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                opener,
                opened: OnceLock::new(),
                engine: OnceCell::new(),
            }),
        }
    }

    /// The configuration this database was built from, if any.
    pub fn config(&self) -> Option<&DatabaseConfig> {
        self.inner.config.as_ref()
    }

    /// Open the storage and provision every registered collection.
    ///
    /// Safe to await any number of times, from any number of tasks, and safe
    /// to abandon; the physical open happens once.
    pub async fn delayed_init(&self) -> Result<Database, DatabaseError> {
        let ready = self
            .inner
            .engine
            .get_or_init(|| initialize(Arc::clone(&self.inner)))
            .await;

        match ready {
            Ok(_) => Ok(self.clone()),
            Err(err) => Err(err.clone()),
        }
    }

    /// Typed collection for `T`.
    ///
    /// Does not touch storage. Fails with `NotInitialized` until
    /// [`delayed_init`](Self::delayed_init) has resolved.
    pub fn get<T: Record>(&self) -> Result<Collection<T>, DatabaseError> {
        match self.inner.engine.get() {
            Some(Ok(engine)) => Ok(Collection::new(Arc::clone(engine))),
            Some(Err(err)) => Err(err.clone()),
            None => Err(DatabaseError::NotInitialized),
        }
    }

    /// Typed collection looked up by its registry name.
    ///
    /// Fails with `InvalidCollection` if `name` is not registered or is not
    /// the collection `T` is stored in.
    pub fn collection<T: Record>(&self, name: &str) -> Result<Collection<T>, DatabaseError> {
        let collection: CollectionName = name.parse()?;
        if collection != T::COLLECTION {
            return Err(DatabaseError::InvalidCollection {
                name: name.to_string(),
            });
        }
        self.get::<T>()
    }
}

async fn initialize(inner: Arc<Inner>) -> Ready {
    tokio::task::spawn_blocking(move || {
        inner
            .opened
            .get_or_init(|| open_and_provision(&inner))
            .clone()
    })
    .await
    .map_err(|err| DatabaseError::initialization(EngineError::TaskJoin(err.to_string())))?
}

fn open_and_provision(inner: &Inner) -> Ready {
    let backend = inner.config.as_ref().map(|config| config.backend);
    let opened = (inner.opener)().and_then(|engine| {
        engine.provision(CollectionName::ALL)?;
        Ok(engine)
    });

    match opened {
        Ok(engine) => {
            info!(
                ?backend,
                collections = CollectionName::ALL.len(),
                "notification storage ready"
            );
            Ok(engine)
        }
        Err(err) => {
            error!(?backend, error = %err, "notification storage failed to initialize");
            Err(DatabaseError::initialization(err))
        }
    }
}

fn open_engine(config: &DatabaseConfig) -> Result<Arc<dyn StorageEngine>, EngineError> {
    match config.backend {
        Backend::Memory => Ok(Arc::new(InMemoryEngine::new())),
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            let engine = crate::engine::SqliteEngine::open(&config.path, config.busy_timeout())?;
            Ok(Arc::new(engine))
        }
        #[cfg(not(feature = "sqlite"))]
        Backend::Sqlite => Err(EngineError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "sqlite backend requires the `sqlite` feature",
        ))),
    }
}
