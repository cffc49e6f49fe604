use std::sync::Arc;

use tokio::sync::Mutex;

use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::Db;
use crate::session::SessionHolder;
use crate::store::Store;

// Shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub session: SessionHolder,
    pub backend: BackendClient,
    write_lock: Arc<Mutex<()>>, // serializes load-modify-save on the store
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            store: Store::new(&config.data_path),
            session: SessionHolder::new(),
            backend: BackendClient::new(config.backend_url.clone(), config.backend_timeout)?,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Load the schedule, apply `change`, and save it back.
    /// Nothing is written when `change` fails.
    pub async fn modify_db<T>(&self, change: impl FnOnce(&mut Db) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut db = self.store.load()?;
        let out = change(&mut db)?;
        self.store.save(&db)?;
        Ok(out)
    }
}
