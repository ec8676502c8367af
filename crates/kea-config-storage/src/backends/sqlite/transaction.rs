//! Write side of the SQLite backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, Transaction};

use crate::backends::rows::{bind_parameters, ParameterColumns};
use crate::backends::sql;
use crate::error::StorageError;
use crate::traits::ConfigTransaction;
use crate::types::{Server, SharedNetwork, Subnet, SubnetId};

const INSERT_AUDIT_REVISION: &str = r#"
    INSERT INTO dhcp4_audit_revision
        (modification_ts, server_tag, log_message, cascade_transaction)
    VALUES (?, ?, ?, ?)
"#;

/// An open SQLite transaction
///
/// Holds one pooled connection until committed, rolled back or dropped.
pub struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteTransaction {
    pub(super) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    async fn associate(
        &mut self,
        query: &'static str,
        owner_id: i64,
        modified_at: DateTime<Utc>,
        servers: &[Server],
        entity_type: &'static str,
    ) -> Result<(), StorageError> {
        for server in servers {
            let result = sqlx::query(query)
                .bind(owner_id)
                .bind(modified_at)
                .bind(server.tag.as_str())
                .execute(&mut *self.tx)
                .await
                .map_err(|e| {
                    StorageError::from_write(
                        e,
                        "failed to associate server",
                        entity_type,
                        &server.tag,
                    )
                })?;

            if result.rows_affected() == 0 {
                return Err(StorageError::NotFound {
                    entity_type: "server",
                    key: server.tag.clone(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigTransaction for SqliteTransaction {
    async fn record_audit_revision(
        &mut self,
        modified_at: DateTime<Utc>,
        server_tag: &str,
        message: &str,
        affects_config: bool,
    ) -> Result<(), StorageError> {
        sqlx::query(INSERT_AUDIT_REVISION)
            .bind(modified_at)
            .bind(server_tag)
            .bind(message)
            .bind(affects_config)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                StorageError::from_write(
                    e,
                    "failed to record audit revision",
                    "audit revision",
                    server_tag,
                )
            })?;
        Ok(())
    }

    async fn last_subnet_id(&mut self) -> Result<Option<SubnetId>, StorageError> {
        let last: Option<i64> = sqlx::query_scalar(sql::SELECT_LAST_SUBNET_ID)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| StorageError::from_lifecycle(e, "failed to read last subnet id"))?;

        last.map(SubnetId::try_from).transpose()
    }

    async fn insert_server(&mut self, server: &Server) -> Result<i64, StorageError> {
        let result = sqlx::query(sql::INSERT_SERVER)
            .bind(server.tag.as_str())
            .bind(server.description.as_str())
            .bind(server.modified_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                StorageError::from_write(e, "failed to insert server", "server", &server.tag)
            })?;

        Ok(result.last_insert_rowid())
    }

    async fn insert_shared_network(
        &mut self,
        network: &SharedNetwork,
    ) -> Result<i64, StorageError> {
        let columns = ParameterColumns::try_from(&network.parameters)?;
        let query = bind_parameters(
            sqlx::query(sql::INSERT_SHARED_NETWORK.as_str()).bind(network.name.as_str()),
            columns,
        );

        let result = query.execute(&mut *self.tx).await.map_err(|e| {
            StorageError::from_write(
                e,
                "failed to insert shared network",
                "shared network",
                &network.name,
            )
        })?;
        let id = result.last_insert_rowid();

        self.associate(
            sql::INSERT_SHARED_NETWORK_SERVER,
            id,
            network.parameters.modified_at,
            &network.servers,
            "shared network server",
        )
        .await?;

        Ok(id)
    }

    async fn insert_subnet(&mut self, subnet: &Subnet) -> Result<(), StorageError> {
        let id = subnet.id.ok_or_else(|| {
            StorageError::InvalidData(format!("subnet {} has no allocated id", subnet.prefix))
        })?;
        let columns = ParameterColumns::try_from(&subnet.parameters)?;
        let query = bind_parameters(
            sqlx::query(sql::INSERT_SUBNET.as_str())
                .bind(i64::from(id.get()))
                .bind(subnet.prefix.as_str())
                .bind(subnet.v4o6_interface.as_deref())
                .bind(subnet.v4o6_interface_id.as_deref())
                .bind(subnet.v4o6_subnet.as_deref())
                .bind(subnet.shared_network_name.as_deref()),
            columns,
        );

        query.execute(&mut *self.tx).await.map_err(|e| {
            StorageError::from_write(e, "failed to insert subnet", "subnet", &subnet.prefix)
        })?;

        self.associate(
            sql::INSERT_SUBNET_SERVER,
            i64::from(id.get()),
            subnet.parameters.modified_at,
            &subnet.servers,
            "subnet server",
        )
        .await
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        self.tx
            .commit()
            .await
            .map_err(|e| StorageError::from_lifecycle(e, "failed to commit transaction"))
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| StorageError::from_lifecycle(e, "failed to roll back transaction"))
    }
}
