use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;
use crate::notify::NotifyHandle;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub notify: NotifyHandle,
}
