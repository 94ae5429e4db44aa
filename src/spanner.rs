use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::config::Config;
use crate::item::Item;
use crate::store::ItemStore;

const ITEMS_TABLE: &str = "items";

/// Cloud Spanner implementation of `ItemStore`.
///
/// The client is created once at startup and shared across handlers. The
/// gcloud-spanner library detects the SPANNER_EMULATOR_HOST environment
/// variable and connects to the emulator when set, or production Spanner
/// otherwise.
#[derive(Clone)]
pub struct SpannerItemStore {
    inner: Arc<Client>,
}

impl SpannerItemStore {
    /// Connect to Spanner, auto-provisioning the instance, database, and
    /// `items` table if they don't exist (zero-setup local development
    /// against the emulator).
    pub async fn from_config(config: &Config) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.spanner_project, config.spanner_instance, config.spanner_database
        );

        match &config.spanner_emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!("Connected to Spanner database: {}", database_path);

        Ok(Self {
            inner: Arc::new(client),
        })
    }
}

fn item_from_row(row: &Row) -> Result<Item> {
    Ok(Item {
        id: row.column_by_name("id")?,
        name: row.column_by_name("name")?,
        price: row.column_by_name("price")?,
    })
}

#[async_trait]
impl ItemStore for SpannerItemStore {
    async fn get(&self, id: &str) -> Result<Option<Item>> {
        let mut statement =
            Statement::new("SELECT id, name, price FROM items WHERE id = @id");
        statement.add_param("id", &id.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut rows = tx
            .query(statement)
            .await
            .context("Failed to read item")?;

        match rows.next().await? {
            Some(row) => Ok(Some(item_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, item: Item) -> Result<()> {
        // insert-or-update is the upsert: the row ends up with exactly the
        // supplied fields, absent ones stored as NULL
        let mutation = insert_or_update(
            ITEMS_TABLE,
            &["id", "name", "price", "created_at", "updated_at"],
            &[
                &item.id,
                &item.name,
                &item.price,
                &CommitTimestamp::new(),
                &CommitTimestamp::new(),
            ],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to put item")?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        // Spanner delete mutations succeed whether or not the key exists
        let mutation = delete(ITEMS_TABLE, Key::new(&id.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete item")?;

        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<Item>> {
        let statement = Statement::new("SELECT id, name, price FROM items");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut rows = tx
            .query(statement)
            .await
            .context("Failed to scan items")?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(item_from_row(&row)?);
        }

        Ok(items)
    }

    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut rows = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if rows.next().await?.is_some() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Check that the configured instance, database, and table exist, creating
/// whatever is missing.
async fn auto_provision(config: &Config) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.spanner_project);
    let instance_path = format!("{}/instances/{}", project_path, config.spanner_instance);
    let database_path = format!("{}/databases/{}", instance_path, config.spanner_database);

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_table_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &Config,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.spanner_emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.spanner_instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.spanner_instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client.database().get_database(get_request, None).await {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response.into_inner().statements.iter().any(|stmt| {
        stmt.contains("CREATE TABLE items") || stmt.contains("CREATE TABLE `items`")
    });

    if table_exists {
        tracing::info!("Table 'items' already exists");
        return Ok(());
    }

    tracing::info!("Table 'items' not found, creating...");

    // created_at/updated_at are audit columns written on every put and never
    // read back; the item itself is exactly id/name/price
    let create_table_ddl = r#"
CREATE TABLE items (
    id STRING(MAX) NOT NULL,
    name STRING(MAX),
    price FLOAT64,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#
    .trim()
    .to_string();

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation.wait(None).await.context("Failed to create table")?;

    tracing::info!("Table 'items' created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_lock;

    fn emulator_config(instance: &str, database: &str) -> Config {
        Config {
            spanner_emulator_host: Some("localhost:9010".to_string()),
            spanner_project: "test-project".to_string(),
            spanner_instance: instance.to_string(),
            spanner_database: database.to_string(),
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        }
    }

    #[test]
    fn test_store_is_clonable() {
        // required for sharing across axum handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<SpannerItemStore>();
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpannerItemStore>();
    }

    #[tokio::test]
    async fn test_from_config_against_emulator() {
        let _env = env_lock();
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        let config = emulator_config("item-store-test", "item-store-test-db");
        let result = SpannerItemStore::from_config(&config).await;

        unsafe {
            std::env::remove_var("SPANNER_EMULATOR_HOST");
        }

        // If the emulator isn't running this fails at connection time; either
        // way the error must carry descriptive context
        if let Err(e) = result {
            assert!(!e.to_string().is_empty());
        }
    }

    #[tokio::test]
    async fn test_crud_round_trip_against_emulator() {
        let _env = env_lock();
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        let config = emulator_config("item-crud-test", "item-crud-test-db");
        let store = match SpannerItemStore::from_config(&config).await {
            Ok(store) => store,
            Err(_) => {
                println!("CRUD test skipped (emulator may not be running)");
                unsafe {
                    std::env::remove_var("SPANNER_EMULATOR_HOST");
                }
                return;
            }
        };

        let item = Item::new("crud-1").with_name("myitem").with_price(12345.0);
        store.put(item.clone()).await.unwrap();

        let stored = store.get("crud-1").await.unwrap();
        assert_eq!(stored, Some(item));

        // overwrite drops the name entirely, no merge
        store.put(Item::new("crud-1").with_price(99.0)).await.unwrap();
        let stored = store.get("crud-1").await.unwrap().unwrap();
        assert_eq!(stored.name, None);
        assert_eq!(stored.price, Some(99.0));

        let all = store.scan_all().await.unwrap();
        assert!(all.iter().any(|entry| entry.id == "crud-1"));

        store.delete("crud-1").await.unwrap();
        assert_eq!(store.get("crud-1").await.unwrap(), None);

        // idempotent delete
        store.delete("crud-1").await.unwrap();

        unsafe {
            std::env::remove_var("SPANNER_EMULATOR_HOST");
        }
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() {
        let _env = env_lock();
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        let config = emulator_config("item-idempotent-test", "item-idempotent-db");
        let first = SpannerItemStore::from_config(&config).await;

        if first.is_ok() {
            let second = SpannerItemStore::from_config(&config).await;
            assert!(second.is_ok(), "re-running provisioning should succeed");
        }

        unsafe {
            std::env::remove_var("SPANNER_EMULATOR_HOST");
        }
    }
}
