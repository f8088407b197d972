use crate::config::AppConfig;
use crate::database::connection::DbConnection;

pub struct AppState {
    pub config: AppConfig,
    pub db_connection: DbConnection,
}

impl AppState {
    pub fn new(config: AppConfig, db_connection: DbConnection) -> Self {
        Self {
            config,
            db_connection,
        }
    }

    pub async fn try_init(config: &AppConfig) -> anyhow::Result<Self> {
        let db_connection = DbConnection::connect(&config.database).await?;
        db_connection.init_schema().await?;
        Ok(Self::new(config.clone(), db_connection))
    }
}
