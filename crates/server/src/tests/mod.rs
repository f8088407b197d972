use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use crate::database::connection::{DbConfig, DbConnection};

mod db;

/// Some tests can't run in parallel, prevent them from breaking each other's state
pub(crate) static SERIAL_LOCK: Lazy<Mutex<()>> = Lazy::new(Mutex::default);

pub(crate) async fn init_and_get_db() -> DbConnection {
    let _ = tracing_subscriber::fmt::try_init();

    let config = DbConfig::development("parley_db", "parley_guest", "parleypass");
    let db = DbConnection::connect(&config).await.unwrap();
    db.drop_schema().await.unwrap();
    db.init_schema().await.unwrap();
    db
}
