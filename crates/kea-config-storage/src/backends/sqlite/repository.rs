//! Read side of the SQLite backend
//!
//! Shared networks and subnets are loaded with their server associations,
//! one query for the row and one for its servers.

use super::SqliteStorage;
use crate::backends::rows::{
    AuditRevisionRow, RowCountsRow, ServerRow, SharedNetworkRow, SubnetRow,
};
use crate::backends::sql;
use crate::error::StorageError;
use crate::types::{AuditRevision, RowCounts, Server, SharedNetwork, Subnet, SubnetId};

impl SqliteStorage {
    pub(super) async fn server_by_tag_impl(
        &self,
        tag: &str,
    ) -> Result<Option<Server>, StorageError> {
        let row: Option<ServerRow> = sqlx::query_as(sql::SELECT_SERVER_BY_TAG)
            .bind(tag)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to query server"))?;

        Ok(row.map(Server::from))
    }

    pub(super) async fn list_servers_impl(&self) -> Result<Vec<Server>, StorageError> {
        let rows: Vec<ServerRow> = sqlx::query_as(sql::SELECT_ALL_SERVERS)
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to list servers"))?;

        Ok(rows.into_iter().map(Server::from).collect())
    }

    async fn associated_servers(
        &self,
        query: &'static str,
        owner_id: i64,
    ) -> Result<Vec<Server>, StorageError> {
        let rows: Vec<ServerRow> = sqlx::query_as(query)
            .bind(owner_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to load server associations"))?;

        Ok(rows.into_iter().map(Server::from).collect())
    }

    async fn hydrate_shared_network(
        &self,
        row: SharedNetworkRow,
    ) -> Result<SharedNetwork, StorageError> {
        let servers = self
            .associated_servers(sql::SELECT_SHARED_NETWORK_SERVERS, row.id)
            .await?;
        row.into_shared_network(servers)
    }

    async fn hydrate_subnet(&self, row: SubnetRow) -> Result<Subnet, StorageError> {
        let servers = self
            .associated_servers(sql::SELECT_SUBNET_SERVERS, row.subnet_id)
            .await?;
        row.into_subnet(servers)
    }

    pub(super) async fn shared_network_by_name_impl(
        &self,
        name: &str,
    ) -> Result<Option<SharedNetwork>, StorageError> {
        let query = format!("{} WHERE name = ?", *sql::SELECT_SHARED_NETWORKS);
        let row: Option<SharedNetworkRow> = sqlx::query_as(&query)
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to query shared network"))?;

        match row {
            Some(row) => Ok(Some(self.hydrate_shared_network(row).await?)),
            None => Ok(None),
        }
    }

    pub(super) async fn list_shared_networks_impl(
        &self,
    ) -> Result<Vec<SharedNetwork>, StorageError> {
        let query = format!("{} ORDER BY name", *sql::SELECT_SHARED_NETWORKS);
        let rows: Vec<SharedNetworkRow> = sqlx::query_as(&query)
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to list shared networks"))?;

        let mut networks = Vec::with_capacity(rows.len());
        for row in rows {
            networks.push(self.hydrate_shared_network(row).await?);
        }
        Ok(networks)
    }

    pub(super) async fn subnet_by_prefix_impl(
        &self,
        prefix: &str,
    ) -> Result<Option<Subnet>, StorageError> {
        let query = format!("{} WHERE subnet_prefix = ?", *sql::SELECT_SUBNETS);
        let row: Option<SubnetRow> = sqlx::query_as(&query)
            .bind(prefix)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to query subnet"))?;

        match row {
            Some(row) => Ok(Some(self.hydrate_subnet(row).await?)),
            None => Ok(None),
        }
    }

    pub(super) async fn subnet_by_id_impl(
        &self,
        id: SubnetId,
    ) -> Result<Option<Subnet>, StorageError> {
        let query = format!("{} WHERE subnet_id = ?", *sql::SELECT_SUBNETS);
        let row: Option<SubnetRow> = sqlx::query_as(&query)
            .bind(i64::from(id.get()))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to query subnet"))?;

        match row {
            Some(row) => Ok(Some(self.hydrate_subnet(row).await?)),
            None => Ok(None),
        }
    }

    pub(super) async fn list_subnets_impl(&self) -> Result<Vec<Subnet>, StorageError> {
        let query = format!("{} ORDER BY subnet_id", *sql::SELECT_SUBNETS);
        let rows: Vec<SubnetRow> = sqlx::query_as(&query)
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to list subnets"))?;

        let mut subnets = Vec::with_capacity(rows.len());
        for row in rows {
            subnets.push(self.hydrate_subnet(row).await?);
        }
        Ok(subnets)
    }

    pub(super) async fn list_audit_revisions_impl(
        &self,
    ) -> Result<Vec<AuditRevision>, StorageError> {
        let rows: Vec<AuditRevisionRow> = sqlx::query_as(sql::SELECT_AUDIT_REVISIONS)
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to list audit revisions"))?;

        Ok(rows.into_iter().map(AuditRevision::from).collect())
    }

    pub(super) async fn row_counts_impl(&self) -> Result<RowCounts, StorageError> {
        let row: RowCountsRow = sqlx::query_as(sql::SELECT_ROW_COUNTS)
            .fetch_one(self.pool())
            .await
            .map_err(|e| StorageError::from_read(e, "failed to count rows"))?;

        Ok(row.into())
    }
}
