//! Platform-wide analytics and exports

use std::collections::HashMap;

use serde::Deserialize;

use crate::api::client::{ApiTransport, Method};
use crate::api::de::id_or_object;
use crate::error::Result;

/// Revenue booked on one day
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DailyRevenue {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub revenue: f64,
}

/// A leaderboard row
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRestaurant {
    #[serde(default, deserialize_with = "id_or_object")]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub average_order_value: f64,
    #[serde(default)]
    pub peak_hour: Option<serde_json::Value>,
}

/// Advanced analytics across every restaurant
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedAnalytics {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub peak_hours: HashMap<String, u64>,
    #[serde(default)]
    pub revenue_by_day: Vec<DailyRevenue>,
    #[serde(default)]
    pub top_performing_restaurants: Vec<TopRestaurant>,
}

impl AdvancedAnalytics {
    /// Revenue per order, zero when nothing was ordered
    pub fn average_order_value(&self) -> f64 {
        if self.total_orders == 0 {
            0.0
        } else {
            self.total_revenue / self.total_orders as f64
        }
    }

    /// Busiest hour of the day, `"12"` when there is no data
    ///
    /// Ties go to the later hour.
    pub fn peak_hour(&self) -> String {
        self.sorted_hours()
            .into_iter()
            .fold(None::<(u32, u64)>, |best, (hour, count)| match best {
                Some((_, best_count)) if best_count > count => best,
                _ => Some((hour, count)),
            })
            .map(|(hour, _)| hour.to_string())
            .unwrap_or_else(|| "12".to_string())
    }

    /// Each hour's order count relative to the busiest hour (0.0..=1.0)
    pub fn hour_intensity(&self) -> Vec<(u32, f64)> {
        let hours = self.sorted_hours();
        let max = hours.iter().map(|(_, c)| *c).max().unwrap_or(0);
        hours
            .into_iter()
            .map(|(hour, count)| {
                let intensity = if max == 0 {
                    0.0
                } else {
                    count as f64 / max as f64
                };
                (hour, intensity)
            })
            .collect()
    }

    fn sorted_hours(&self) -> Vec<(u32, u64)> {
        let mut hours: Vec<(u32, u64)> = self
            .peak_hours
            .iter()
            .filter_map(|(hour, count)| hour.trim().parse().ok().map(|h| (h, *count)))
            .collect();
        hours.sort_by_key(|(hour, _)| *hour);
        hours
    }
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// File name used when the caller does not pick one
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "restaurant-analytics.csv",
            ExportFormat::Json => "restaurant-analytics.json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("unknown export format '{}' (expected csv or json)", s)),
        }
    }
}

/// Analytics operations handler
pub struct AnalyticsHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> AnalyticsHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// Fetch the advanced analytics report
    pub async fn advanced(&self) -> Result<AdvancedAnalytics> {
        let value = self
            .client
            .request(Method::GET, "/api/analytics/advanced", None)
            .await?;
        if value.is_null() {
            return Ok(AdvancedAnalytics::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Download the report in the requested format
    pub async fn export(&self, format: ExportFormat) -> Result<String> {
        let path = format!("/api/analytics/export?format={}", format.as_str());
        match format {
            ExportFormat::Csv => self.client.request_text(&path).await,
            ExportFormat::Json => {
                let value = self.client.request(Method::GET, &path, None).await?;
                Ok(serde_json::to_string_pretty(&value)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::json;

    fn report() -> AdvancedAnalytics {
        serde_json::from_value(json!({
            "totalRevenue": 9000,
            "totalOrders": 40,
            "peakHours": {"13": 12, "20": 18, "9": 4, "21": 18},
            "revenueByDay": [{"date": "2024-06-01", "revenue": 3000}],
            "topPerformingRestaurants": [{"restaurantId": "r1", "name": "Spice Hub", "orders": 25,
                                          "revenue": 6000, "averageOrderValue": 240, "peakHour": 20}]
        }))
        .unwrap()
    }

    #[test]
    fn test_derived_metrics() {
        let report = report();
        assert!((report.average_order_value() - 225.0).abs() < f64::EPSILON);
        // 20 and 21 tie at 18
        assert_eq!(report.peak_hour(), "21");

        let intensity = report.hour_intensity();
        assert_eq!(intensity[0], (9, 4.0 / 18.0));
        assert_eq!(intensity.last(), Some(&(21, 1.0)));
    }

    #[test]
    fn test_empty_report_defaults() {
        let report = AdvancedAnalytics::default();
        assert_eq!(report.average_order_value(), 0.0);
        assert_eq!(report.peak_hour(), "12");
        assert!(report.hour_intensity().is_empty());
    }

    #[tokio::test]
    async fn test_csv_export_downloads_text() {
        let mut mock = MockApiTransport::new();
        mock.expect_request_text()
            .withf(|path| path == "/api/analytics/export?format=csv")
            .times(1)
            .returning(|_| Ok("name,orders\nSpice Hub,25\n".to_string()));

        let csv = AnalyticsHandler::new(&mock)
            .export(ExportFormat::Csv)
            .await
            .unwrap();
        assert!(csv.starts_with("name,orders"));
    }
}
