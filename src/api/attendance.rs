//! Staff attendance

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::api::client::{list_field, ApiTransport, Method};
use crate::error::Result;

/// Whether the staff member showed up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[serde(other)]
    Unknown,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Unknown => "unknown",
        }
    }
}

/// Filter applied to attendance lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendanceFilter {
    #[default]
    All,
    Present,
    Absent,
}

impl AttendanceFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceFilter::All => "all",
            AttendanceFilter::Present => "present",
            AttendanceFilter::Absent => "absent",
        }
    }

    /// Cycle all → present → absent → all
    pub fn next(&self) -> AttendanceFilter {
        match self {
            AttendanceFilter::All => AttendanceFilter::Present,
            AttendanceFilter::Present => AttendanceFilter::Absent,
            AttendanceFilter::Absent => AttendanceFilter::All,
        }
    }

    pub fn matches(&self, status: AttendanceStatus) -> bool {
        match self {
            AttendanceFilter::All => true,
            AttendanceFilter::Present => status == AttendanceStatus::Present,
            AttendanceFilter::Absent => status == AttendanceStatus::Absent,
        }
    }
}

impl std::str::FromStr for AttendanceFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(AttendanceFilter::All),
            "present" => Ok(AttendanceFilter::Present),
            "absent" => Ok(AttendanceFilter::Absent),
            _ => Err(format!(
                "unknown filter '{}' (expected all, present or absent)",
                s
            )),
        }
    }
}

/// Staff reference embedded in a record
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StaffRef {
    #[serde(default)]
    pub name: String,
}

/// Staff may arrive populated or as a bare id
fn staff_ref<'de, D>(deserializer: D) -> std::result::Result<Option<StaffRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(map) => Ok(Some(StaffRef {
            name: map
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        })),
        _ => Ok(None),
    }
}

/// One day of attendance for one staff member
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "staff_ref")]
    pub staff_id: Option<StaffRef>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Staff name, or "Unknown" when the reference was not populated
    pub fn staff_name(&self) -> &str {
        self.staff_id
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
    }

    /// Hours as `7.5h`, or `-` while still checked in
    pub fn hours_display(&self) -> String {
        match self.hours_worked {
            Some(hours) => format!("{:.1}h", hours),
            None => "-".to_string(),
        }
    }

    pub fn date_display(&self) -> String {
        format_timestamp(self.date.as_deref(), "%Y-%m-%d")
    }

    pub fn check_in_display(&self) -> String {
        format_timestamp(self.check_in.as_deref(), "%H:%M")
    }

    pub fn check_out_display(&self) -> String {
        format_timestamp(self.check_out.as_deref(), "%H:%M")
    }
}

/// Render an RFC 3339 timestamp in local time; other strings pass through
fn format_timestamp(raw: Option<&str>, pattern: &str) -> String {
    match raw {
        None | Some("") => "-".to_string(),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Local).format(pattern).to_string())
            .unwrap_or_else(|_| value.to_string()),
    }
}

/// Records matching the filter
pub fn filter_records(
    records: &[AttendanceRecord],
    filter: AttendanceFilter,
) -> Vec<&AttendanceRecord> {
    records.iter().filter(|r| filter.matches(r.status)).collect()
}

/// Attendance operations handler
pub struct AttendanceHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> AttendanceHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    async fn fetch(&self, path: &str) -> Result<Vec<AttendanceRecord>> {
        let value = self.client.request(Method::GET, path, None).await?;
        list_field(value, "attendance")
    }

    /// Every record for the restaurant (admins)
    pub async fn all(&self) -> Result<Vec<AttendanceRecord>> {
        self.fetch("/api/attendance/all").await
    }

    /// Today's records for the restaurant (admins)
    pub async fn today(&self) -> Result<Vec<AttendanceRecord>> {
        self.fetch("/api/attendance/today").await
    }

    /// The signed-in user's own history
    pub async fn mine(&self) -> Result<Vec<AttendanceRecord>> {
        self.fetch("/api/attendance/my").await
    }

    /// Start the signed-in user's shift
    pub async fn check_in(&self) -> Result<()> {
        self.client
            .request(Method::POST, "/api/attendance/check-in", None)
            .await?;
        Ok(())
    }

    /// End the signed-in user's shift
    pub async fn check_out(&self) -> Result<()> {
        self.client
            .request(Method::POST, "/api/attendance/check-out", None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::{json, Value};

    fn records() -> Vec<AttendanceRecord> {
        serde_json::from_value(json!([
            {"_id": "1", "staffId": {"name": "Kiran"}, "status": "present", "hoursWorked": 7.26},
            {"_id": "2", "staffId": "64ab", "status": "absent"},
            {"_id": "3", "staffId": {"name": "Lata"}, "status": "present"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_filter_records() {
        let records = records();
        assert_eq!(filter_records(&records, AttendanceFilter::All).len(), 3);
        assert_eq!(filter_records(&records, AttendanceFilter::Present).len(), 2);
        assert_eq!(filter_records(&records, AttendanceFilter::Absent).len(), 1);
    }

    #[test]
    fn test_display_helpers() {
        let records = records();
        assert_eq!(records[0].hours_display(), "7.3h");
        assert_eq!(records[1].staff_name(), "Unknown");
        assert_eq!(records[2].hours_display(), "-");
        assert_eq!(records[2].check_out_display(), "-");
    }

    #[test]
    fn test_non_rfc3339_date_passes_through() {
        assert_eq!(format_timestamp(Some("2024-06-01"), "%H:%M"), "2024-06-01");
    }

    #[tokio::test]
    async fn test_all_unwraps_attendance_key() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| *method == Method::GET && path == "/api/attendance/all")
            .returning(|_, _, _| Ok(json!({"attendance": [{"_id": "1", "status": "present"}]})));

        let records = AttendanceHandler::new(&mock).all().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_check_in_posts() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| *method == Method::POST && path == "/api/attendance/check-in")
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        AttendanceHandler::new(&mock).check_in().await.unwrap();
    }
}
