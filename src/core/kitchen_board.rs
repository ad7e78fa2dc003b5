//! KOT board layout and per-card actions

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::api::kitchen::{KitchenBoard, KotPriority, KotStatus};
use crate::api::orders::{OrderPriority, OrderStatus};

/// How prominently a card is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Urgent,
    Elevated,
    Normal,
}

impl From<KotPriority> for Urgency {
    fn from(priority: KotPriority) -> Self {
        match priority {
            KotPriority::High | KotPriority::Urgent => Urgency::Urgent,
            KotPriority::Normal => Urgency::Elevated,
            _ => Urgency::Normal,
        }
    }
}

impl From<OrderPriority> for Urgency {
    fn from(priority: OrderPriority) -> Self {
        match priority {
            OrderPriority::High => Urgency::Urgent,
            OrderPriority::Medium => Urgency::Elevated,
            _ => Urgency::Normal,
        }
    }
}

/// The button on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    AdvanceKot { kot_id: String, to: KotStatus },
    AdvanceOrder { order_id: String, to: OrderStatus },
}

impl CardAction {
    pub fn label(&self) -> String {
        match self {
            CardAction::AdvanceKot { to, .. } => match to {
                KotStatus::InProgress => "Start Preparing".to_string(),
                KotStatus::Completed => "Mark Complete".to_string(),
                other => other.to_string(),
            },
            CardAction::AdvanceOrder { to, .. } => match to {
                OrderStatus::Preparing => "Start preparing".to_string(),
                OrderStatus::Ready => "Mark ready".to_string(),
                other => other.to_string(),
            },
        }
    }
}

/// Where a card came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardSource {
    Kot { id: String },
    Order { id: String, priority: OrderPriority },
}

/// One card on the kitchen board
#[derive(Debug, Clone, PartialEq)]
pub struct BoardCard {
    pub source: CardSource,
    pub title: String,
    pub status: String,
    pub urgency: Urgency,
    pub items: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub action: Option<CardAction>,
}

impl BoardCard {
    /// Minutes since the ticket was created
    pub fn age_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created_at.map(|t| (now - t).num_minutes().max(0))
    }
}

/// Cards in display order: every ticket first, then orders that have no ticket yet
///
/// Priority only affects highlighting; cards keep the order the backend sent.
pub fn cards(board: &KitchenBoard) -> Vec<BoardCard> {
    let ticketed: HashSet<&str> = board
        .kots
        .iter()
        .map(|k| k.order_number.as_str())
        .filter(|n| !n.is_empty())
        .collect();

    let kot_cards = board.kots.iter().map(|kot| BoardCard {
        source: CardSource::Kot { id: kot.id.clone() },
        title: format!("KOT #{} (order #{})", kot.kot_number, kot.order_number),
        status: kot.status.to_string(),
        urgency: kot.priority.into(),
        items: kot.items.iter().map(|i| i.kitchen_label()).collect(),
        created_at: kot.created_at,
        action: kot.status.next().map(|to| CardAction::AdvanceKot {
            kot_id: kot.id.clone(),
            to,
        }),
    });

    let order_cards = board
        .orders
        .iter()
        .filter(|o| o.order_number.is_empty() || !ticketed.contains(o.order_number.as_str()))
        .map(|order| BoardCard {
            source: CardSource::Order {
                id: order.id.clone(),
                priority: order.priority,
            },
            title: format!("Order {} · {}", order.label(), order.customer_name),
            status: order.status.to_string(),
            urgency: order.priority.into(),
            items: order.items.iter().map(|i| i.kitchen_label()).collect(),
            created_at: order.created_at,
            action: order
                .status
                .next_kitchen_step()
                .map(|to| CardAction::AdvanceOrder {
                    order_id: order.id.clone(),
                    to,
                }),
        });

    kot_cards.chain(order_cards).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn board() -> KitchenBoard {
        serde_json::from_value(json!({
            "kots": [
                {"_id": "k1", "kotNumber": 1, "orderNumber": 101, "status": "PENDING", "priority": "LOW",
                 "items": [{"name": "Dal", "quantity": 2}]},
                {"_id": "k2", "kotNumber": 2, "orderNumber": 102, "status": "IN_PROGRESS", "priority": "URGENT"}
            ],
            "orders": [
                {"_id": "o1", "orderNumber": 101, "customerName": "A", "status": "PENDING"},
                {"_id": "o3", "orderNumber": 103, "customerName": "C", "status": "PREPARING", "priority": "high"},
                {"_id": "o4", "orderNumber": 104, "customerName": "D", "status": "READY"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_cards_order_and_dedup() {
        let cards = cards(&board());
        let sources: Vec<&CardSource> = cards.iter().map(|c| &c.source).collect();

        // o1 already has a ticket
        assert_eq!(cards.len(), 4);
        assert_eq!(sources[0], &CardSource::Kot { id: "k1".to_string() });
        assert_eq!(sources[1], &CardSource::Kot { id: "k2".to_string() });
        assert!(matches!(sources[2], CardSource::Order { id, .. } if id == "o3"));
        assert!(matches!(sources[3], CardSource::Order { id, .. } if id == "o4"));
    }

    #[test]
    fn test_low_priority_ticket_stays_above_urgent_order() {
        let board: KitchenBoard = serde_json::from_value(json!({
            "kots": [{"_id": "k1", "kotNumber": 1, "orderNumber": 101, "status": "PENDING", "priority": "LOW"}],
            "orders": [{"_id": "o3", "orderNumber": 103, "customerName": "C", "status": "PENDING", "priority": "high"}]
        }))
        .unwrap();

        let cards = cards(&board);
        assert_eq!(cards[0].source, CardSource::Kot { id: "k1".to_string() });
        assert_eq!(cards[0].urgency, Urgency::Normal);
        assert_eq!(cards[1].urgency, Urgency::Urgent);
    }

    #[test]
    fn test_card_actions() {
        let cards = cards(&board());
        assert_eq!(
            cards[1].action,
            Some(CardAction::AdvanceKot {
                kot_id: "k2".to_string(),
                to: KotStatus::Completed
            })
        );
        assert_eq!(cards[0].action.as_ref().map(|a| a.label()).as_deref(), Some("Start Preparing"));
        assert_eq!(cards[1].action.as_ref().map(|a| a.label()).as_deref(), Some("Mark Complete"));
        assert_eq!(
            cards[2].action,
            Some(CardAction::AdvanceOrder {
                order_id: "o3".to_string(),
                to: OrderStatus::Ready
            })
        );
        assert_eq!(cards[2].action.as_ref().map(|a| a.label()).as_deref(), Some("Mark ready"));
        assert_eq!(cards[3].action, None);
        assert_eq!(cards[0].items, vec!["2x Dal"]);
    }

    #[test]
    fn test_urgency_mapping() {
        assert_eq!(Urgency::from(KotPriority::High), Urgency::Urgent);
        assert_eq!(Urgency::from(KotPriority::Normal), Urgency::Elevated);
        assert_eq!(Urgency::from(KotPriority::Low), Urgency::Normal);
        assert_eq!(Urgency::from(OrderPriority::Medium), Urgency::Elevated);
        assert_eq!(Urgency::from(OrderPriority::Normal), Urgency::Normal);
    }
}
