//! Dining table operations

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{list_field, missing_field, object_field, ApiTransport, Method};
use crate::api::de::{ids_or_objects, string_or_number};
use crate::error::{RestoError, Result};

/// Occupancy status of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
    #[serde(other)]
    Unknown,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Available,
        TableStatus::Occupied,
        TableStatus::Reserved,
        TableStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "AVAILABLE",
            TableStatus::Occupied => "OCCUPIED",
            TableStatus::Reserved => "RESERVED",
            TableStatus::Maintenance => "MAINTENANCE",
            TableStatus::Unknown => "UNKNOWN",
        }
    }

    /// Next status when cycling from the tables screen
    pub fn next(&self) -> TableStatus {
        match self {
            TableStatus::Available => TableStatus::Occupied,
            TableStatus::Occupied => TableStatus::Reserved,
            TableStatus::Reserved => TableStatus::Maintenance,
            TableStatus::Maintenance | TableStatus::Unknown => TableStatus::Available,
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown table status '{}' (expected available, occupied, reserved or maintenance)",
                    s
                )
            })
    }
}

/// A dining table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub table_number: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub location: String,
    pub status: TableStatus,
    #[serde(default, deserialize_with = "ids_or_objects")]
    pub merged_with: Vec<String>,
    #[serde(default)]
    pub merged_guest_count: Option<u32>,
}

/// Payload for adding a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTable {
    pub table_number: String,
    pub capacity: u32,
    pub location: String,
}

/// Table operations handler
pub struct TableHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> TableHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// List all tables
    pub async fn list(&self) -> Result<Vec<Table>> {
        let value = self
            .client
            .request(Method::GET, "/api/table/tables", None)
            .await?;
        list_field(value, "tables")
    }

    /// Add a table
    pub async fn create(&self, table: &NewTable) -> Result<Table> {
        if table.table_number.trim().is_empty() {
            return Err(RestoError::InvalidInput(
                "Table number is required".to_string(),
            ));
        }
        if table.capacity == 0 {
            return Err(RestoError::InvalidInput(
                "Capacity must be at least 1".to_string(),
            ));
        }

        let body = serde_json::to_value(table)?;
        let value = self
            .client
            .request(Method::POST, "/api/table/tables", Some(body))
            .await?;
        object_field(value, "table")
    }

    /// Change a table's status
    pub async fn update_status(&self, table_id: &str, status: TableStatus) -> Result<()> {
        let path = format!("/api/table/tables/{}/status", table_id);
        self.client
            .request(Method::PATCH, &path, Some(json!({ "status": status })))
            .await?;
        Ok(())
    }

    /// Merge tables for a large party, returning the merged table id
    pub async fn merge(&self, table_ids: &[String], guest_count: u32) -> Result<String> {
        if table_ids.len() < 2 {
            return Err(RestoError::InvalidInput(
                "Select at least 2 tables to merge".to_string(),
            ));
        }

        let value = self
            .client
            .request(
                Method::POST,
                "/api/table/tables/merge",
                Some(json!({ "tableIds": table_ids, "guestCount": guest_count })),
            )
            .await?;

        value
            .get("mergedTable")
            .and_then(|t| t.get("_id"))
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| missing_field("the merged table id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    #[tokio::test]
    async fn test_list_tables() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| *method == Method::GET && path == "/api/table/tables")
            .returning(|_, _, _| {
                Ok(json!({"tables": [
                    {"_id": "t1", "tableNumber": 1, "capacity": 4, "location": "Patio",
                     "status": "AVAILABLE", "mergedWith": [{"_id": "t2"}], "mergedGuestCount": 6}
                ]}))
            });

        let tables = TableHandler::new(&mock).list().await.unwrap();
        assert_eq!(tables[0].table_number, "1");
        assert_eq!(tables[0].merged_with, vec!["t2"]);
        assert_eq!(tables[0].merged_guest_count, Some(6));
    }

    #[tokio::test]
    async fn test_merge_requires_two_tables() {
        let mut mock = MockApiTransport::new();
        mock.expect_request().times(0);

        let err = TableHandler::new(&mock)
            .merge(&["t1".to_string()], 8)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Select at least 2 tables to merge");
    }

    #[tokio::test]
    async fn test_merge_returns_merged_id() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/api/table/tables/merge"
                    && *body == Some(json!({"tableIds": ["t1", "t2"], "guestCount": 7}))
            })
            .times(1)
            .returning(|_, _, _| Ok(json!({"mergedTable": {"_id": "t1"}})));

        let merged = TableHandler::new(&mock)
            .merge(&["t1".to_string(), "t2".to_string()], 7)
            .await
            .unwrap();
        assert_eq!(merged, "t1");
    }

    #[tokio::test]
    async fn test_update_status_patch() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PATCH
                    && path == "/api/table/tables/t4/status"
                    && *body == Some(json!({"status": "RESERVED"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        TableHandler::new(&mock)
            .update_status("t4", TableStatus::Reserved)
            .await
            .unwrap();
    }

    #[test]
    fn test_status_cycle_wraps() {
        let mut status = TableStatus::Available;
        for _ in 0..4 {
            status = status.next();
        }
        assert_eq!(status, TableStatus::Available);
    }
}
