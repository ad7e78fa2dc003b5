//! Order operations: waiter, cashier and public ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{list_field, object_field, ApiTransport, Method};
use crate::api::de::{id_or_object, string_or_number};
use crate::error::{RestoError, Result};

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Paid,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }

    /// Next status a chef can move the order to
    pub fn next_kitchen_step(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            _ => None,
        }
    }

    /// Whether the order is still in the kitchen queue
    pub fn is_in_kitchen(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }

    /// Whether a cashier may take payment
    pub fn is_payable(&self) -> bool {
        matches!(self, OrderStatus::Ready | OrderStatus::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown order status '{}' (expected pending, preparing, ready, delivered or paid)",
                    s
                )
            })
    }
}

/// Kitchen priority of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPriority {
    #[default]
    Normal,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl OrderPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPriority::Normal => "normal",
            OrderPriority::Medium => "medium",
            OrderPriority::High => "high",
            OrderPriority::Unknown => "unknown",
        }
    }

    /// Cycle normal → medium → high → normal
    pub fn next(&self) -> OrderPriority {
        match self {
            OrderPriority::Normal => OrderPriority::Medium,
            OrderPriority::Medium => OrderPriority::High,
            OrderPriority::High | OrderPriority::Unknown => OrderPriority::Normal,
        }
    }
}

impl std::fmt::Display for OrderPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(OrderPriority::Normal),
            "medium" => Ok(OrderPriority::Medium),
            "high" => Ok(OrderPriority::High),
            _ => Err(format!(
                "unknown priority '{}' (expected normal, medium or high)",
                s
            )),
        }
    }
}

/// How a bill is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Digital,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Digital,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Digital => "DIGITAL",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown payment method '{}' (expected cash, card or digital)", s))
    }
}

/// Named option attached to an item (size, variation, addon)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedOption {
    #[serde(default)]
    pub name: String,
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(
        default,
        deserialize_with = "id_or_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub menu_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<NamedOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<NamedOption>,
}

fn one() -> u32 {
    1
}

impl OrderItem {
    /// Kitchen label like `2x Paneer Tikka (Large) + Extra cheese`
    pub fn kitchen_label(&self) -> String {
        let mut label = format!("{}x {}", self.quantity, self.name);
        if let Some(variation) = self.variation.as_ref().filter(|v| !v.name.is_empty()) {
            label.push_str(&format!(" ({})", variation.name));
        }
        if !self.addons.is_empty() {
            let addons: Vec<&str> = self.addons.iter().map(|a| a.name.as_str()).collect();
            label.push_str(&format!(" + {}", addons.join(", ")));
        }
        label
    }
}

/// An order as returned by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_number: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub priority: OrderPriority,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Label for lists: order number when present, otherwise a short id
    pub fn label(&self) -> String {
        if self.order_number.is_empty() {
            let start = self.id.len().saturating_sub(6);
            format!("#{}", self.id.get(start..).unwrap_or(&self.id))
        } else {
            format!("#{}", self.order_number)
        }
    }
}

/// Staff-created order payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
}

/// A line of a public (customer) order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOrderLine {
    pub menu_id: String,
    pub quantity: u32,
}

/// Customer-placed order payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOrder {
    pub items: Vec<PublicOrderLine>,
    pub customer_name: String,
    pub customer_phone: String,
}

/// Cashier counters over the current order list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrderSummary {
    pub total: usize,
    pub pending: usize,
    pub ready: usize,
    pub completed: usize,
    pub revenue: f64,
}

impl OrderSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
        Self {
            total: orders.len(),
            pending: count(OrderStatus::Pending),
            ready: count(OrderStatus::Ready),
            completed: count(OrderStatus::Delivered),
            revenue: orders.iter().map(|o| o.total_amount).sum(),
        }
    }
}

/// Orders in the given status, in server order
pub fn filter_by_status(orders: &[Order], status: OrderStatus) -> Vec<&Order> {
    orders.iter().filter(|o| o.status == status).collect()
}

/// Orders a chef still has to work on
pub fn kitchen_queue(orders: &[Order]) -> Vec<&Order> {
    orders.iter().filter(|o| o.status.is_in_kitchen()).collect()
}

/// Order operations handler
pub struct OrderHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> OrderHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// List the restaurant's orders
    pub async fn list(&self) -> Result<Vec<Order>> {
        let value = self.client.request(Method::GET, "/api/orders", None).await?;
        list_field(value, "orders")
    }

    /// Create an order on behalf of a customer
    pub async fn create(&self, order: &NewOrder) -> Result<Order> {
        if order.items.is_empty() {
            return Err(RestoError::InvalidInput(
                "An order needs at least one item".to_string(),
            ));
        }
        if order.customer_name.trim().is_empty() {
            return Err(RestoError::InvalidInput(
                "Customer name is required".to_string(),
            ));
        }

        let body = serde_json::to_value(order)?;
        let value = self
            .client
            .request(Method::POST, "/api/orders", Some(body))
            .await?;
        object_field(value, "order")
    }

    /// Move an order to a new status
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<()> {
        let path = format!("/api/orders/{}/status", id);
        self.client
            .request(Method::PUT, &path, Some(json!({ "status": status })))
            .await?;
        Ok(())
    }

    /// Record payment for the full order amount
    pub async fn process_payment(&self, order: &Order, method: PaymentMethod) -> Result<()> {
        if !order.status.is_payable() {
            return Err(RestoError::InvalidInput(format!(
                "Order {} is {} and cannot be paid yet",
                order.label(),
                order.status
            )));
        }

        let path = format!("/api/orders/{}/payment", order.id);
        self.client
            .request(
                Method::POST,
                &path,
                Some(json!({ "paymentMethod": method, "amount": order.total_amount })),
            )
            .await?;
        Ok(())
    }

    /// Place an order from the public menu of a restaurant
    pub async fn place_public(&self, slug: &str, order: &PublicOrder) -> Result<Order> {
        if order.items.is_empty() {
            return Err(RestoError::InvalidInput("Your cart is empty".to_string()));
        }

        let path = format!("/api/{}/orders", slug);
        let body = serde_json::to_value(order)?;
        let value = self.client.request(Method::POST, &path, Some(body)).await?;
        object_field(value, "order")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    fn order(id: &str, status: OrderStatus, amount: f64) -> Order {
        Order {
            id: id.to_string(),
            order_number: id.to_uppercase(),
            customer_name: "Guest".to_string(),
            customer_phone: None,
            items: Vec::new(),
            total_amount: amount,
            status,
            priority: OrderPriority::Normal,
            payment_method: None,
            created_at: None,
        }
    }

    #[test]
    fn test_order_deserializes_backend_shape() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "orderNumber": 1042,
            "customerName": "Meera",
            "items": [{"menuId": {"_id": "m1"}, "name": "Dosa", "price": 80, "quantity": 2,
                       "variation": {"name": "Masala"}, "addons": [{"name": "Ghee"}]}],
            "totalAmount": 160,
            "status": "PREPARING",
            "priority": "high",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(order.order_number, "1042");
        assert_eq!(order.items[0].menu_id.as_deref(), Some("m1"));
        assert_eq!(order.items[0].kitchen_label(), "2x Dosa (Masala) + Ghee");
        assert_eq!(order.priority, OrderPriority::High);
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_status_filters() {
        let orders = vec![
            order("a", OrderStatus::Pending, 10.0),
            order("b", OrderStatus::Preparing, 20.0),
            order("c", OrderStatus::Ready, 30.0),
            order("d", OrderStatus::Delivered, 40.0),
            order("e", OrderStatus::Paid, 50.0),
        ];

        let queue: Vec<&str> = kitchen_queue(&orders).iter().map(|o| o.id.as_str()).collect();
        assert_eq!(queue, vec!["a", "b"]);

        let ready = filter_by_status(&orders, OrderStatus::Ready);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id, "c");
    }

    #[test]
    fn test_summary_counts() {
        let orders = vec![
            order("a", OrderStatus::Pending, 100.0),
            order("b", OrderStatus::Ready, 250.0),
            order("c", OrderStatus::Delivered, 50.0),
            order("d", OrderStatus::Delivered, 25.5),
        ];

        let summary = OrderSummary::from_orders(&orders);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.ready, 1);
        assert_eq!(summary.completed, 2);
        assert!((summary.revenue - 425.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kitchen_steps() {
        assert_eq!(
            OrderStatus::Pending.next_kitchen_step(),
            Some(OrderStatus::Preparing)
        );
        assert_eq!(
            OrderStatus::Preparing.next_kitchen_step(),
            Some(OrderStatus::Ready)
        );
        assert_eq!(OrderStatus::Ready.next_kitchen_step(), None);
    }

    #[tokio::test]
    async fn test_update_status_payload() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PUT
                    && path == "/api/orders/o9/status"
                    && *body == Some(json!({"status": "DELIVERED"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        OrderHandler::new(&mock)
            .update_status("o9", OrderStatus::Delivered)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_payment_uses_order_total() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/api/orders/o1/payment"
                    && *body == Some(json!({"paymentMethod": "CARD", "amount": 320.0}))
            })
            .times(1)
            .returning(|_, _, _| Ok(json!({"success": true})));

        let ready = order("o1", OrderStatus::Ready, 320.0);
        OrderHandler::new(&mock)
            .process_payment(&ready, PaymentMethod::Card)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_payment_refused_before_ready() {
        let mut mock = MockApiTransport::new();
        mock.expect_request().times(0);

        let pending = order("o2", OrderStatus::Pending, 10.0);
        let err = OrderHandler::new(&mock)
            .process_payment(&pending, PaymentMethod::Cash)
            .await
            .unwrap_err();
        assert!(matches!(err, RestoError::InvalidInput(_)));

        let paid = order("o3", OrderStatus::Paid, 10.0);
        assert!(OrderHandler::new(&mock)
            .process_payment(&paid, PaymentMethod::Cash)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_public_order_path_and_body() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/api/spice-hub/orders"
                    && body.as_ref().map(|b| b["items"][0]["menuId"] == "m1") == Some(true)
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"order": {"_id": "o5", "orderNumber": "A7", "status": "PENDING",
                                    "totalAmount": 240}}))
            });

        let placed = OrderHandler::new(&mock)
            .place_public(
                "spice-hub",
                &PublicOrder {
                    items: vec![PublicOrderLine {
                        menu_id: "m1".to_string(),
                        quantity: 3,
                    }],
                    customer_name: "Anil".to_string(),
                    customer_phone: "9999999999".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(placed.order_number, "A7");
        assert_eq!(placed.total_amount, 240.0);
    }

    #[tokio::test]
    async fn test_list_unwraps_orders_key() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| *method == Method::GET && path == "/api/orders")
            .returning(|_, _, _| {
                Ok(json!({"orders": [{"_id": "1", "status": "READY"}, {"_id": "2", "status": "CANCELLED"}]}))
            });

        let orders = OrderHandler::new(&mock).list().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].status, OrderStatus::Unknown);
    }
}
