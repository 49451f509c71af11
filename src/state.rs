use std::sync::Arc;

use crate::{config::AppConfig, db::OrmConn, dispatch::Dispatcher};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub dispatcher: Dispatcher,
}
