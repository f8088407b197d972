use sqlx::{Error as SqlxError, Postgres, Transaction};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

use crate::database::connection::DbConnection;
use crate::database::utils::create_enum_type_statement;
use crate::models::membership::MembershipAction;
use crate::models::message::MessageAction;

impl DbConnection {
    /// Creates missing types, tables and indexes. Safe to run on every start.
    pub async fn init_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        create_all_types(&mut transaction).await?;
        create_all_tables(&mut transaction).await?;
        transaction.commit().await?;
        info!("database schema is ready");
        Ok(())
    }

    pub async fn drop_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        drop_all_tables(&mut transaction).await?;
        drop_all_types(&mut transaction).await?;
        transaction.commit().await?;
        info!("database schema dropped");
        Ok(())
    }
}

#[instrument(skip_all)]
pub async fn create_all_types(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    let statements = [
        create_enum_type_statement("group_user_action", MembershipAction::iter()),
        create_enum_type_statement("message_action", MessageAction::iter()),
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_types(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TYPE IF EXISTS message_action;",
        "DROP TYPE IF EXISTS group_user_action;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn create_all_tables(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    let statements = [
        "
            CREATE TABLE IF NOT EXISTS users (
                id              int PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                username        VARCHAR(30) NOT NULL UNIQUE,
                display_name    VARCHAR(30) NOT NULL,
                created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
            );
        ",
        "
            CREATE TABLE IF NOT EXISTS groups (
                id              int PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                name            VARCHAR(50) NOT NULL,
                description     VARCHAR(255),
                created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
            );
        ",
        "
            CREATE TABLE IF NOT EXISTS group_users (
                group_id        int NOT NULL REFERENCES groups(id) ON UPDATE CASCADE ON DELETE CASCADE,
                user_id         int NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
                joined_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT group_user_pkey PRIMARY KEY (group_id, user_id)
            );
        ",
        "
            CREATE TABLE IF NOT EXISTS group_user_history (
                id              bigint PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                group_id        int NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
                user_id         int NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                action          group_user_action NOT NULL,
                timestamp       TIMESTAMPTZ NOT NULL DEFAULT now()
            );
        ",
        "
            CREATE TABLE IF NOT EXISTS messages (
                id              bigint PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                content         TEXT NOT NULL,
                user_id         int NOT NULL REFERENCES users(id),
                group_id        int NOT NULL REFERENCES groups(id),
                created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
                edited_at       TIMESTAMPTZ
            );
        ",
        "CREATE INDEX IF NOT EXISTS messages_group_id_idx ON messages (group_id, id);",
        // message_id has no foreign key so the audit trail survives deletion
        "
            CREATE TABLE IF NOT EXISTS message_history (
                id              bigint PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                message_id      bigint NOT NULL,
                content         TEXT NOT NULL,
                action          message_action NOT NULL,
                action_by       int NOT NULL REFERENCES users(id),
                timestamp       TIMESTAMPTZ NOT NULL DEFAULT now()
            );
        ",
        "CREATE INDEX IF NOT EXISTS message_history_message_id_idx ON message_history (message_id);",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_tables(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TABLE IF EXISTS message_history;",
        "DROP TABLE IF EXISTS messages;",
        "DROP TABLE IF EXISTS group_user_history;",
        "DROP TABLE IF EXISTS group_users;",
        "DROP TABLE IF EXISTS groups;",
        "DROP TABLE IF EXISTS users;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}
