//! Cart for new orders
//!
//! Shared by the waiter's new-order screen and public (customer) ordering.

use crate::api::menus::MenuItem;
use crate::api::orders::{NewOrder, OrderItem, PublicOrder, PublicOrderLine};
use crate::error::{RestoError, Result};

/// One line in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub menu_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl DraftLine {
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// An order being assembled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    lines: Vec<DraftLine>,
    pub customer_name: String,
    pub customer_phone: String,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one of `item`, bumping the quantity if it is already in the cart
    pub fn add(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|l| l.menu_id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(DraftLine {
                menu_id: item.id.clone(),
                name: item.name.clone(),
                price: item.price,
                quantity: 1,
            }),
        }
    }

    /// Drop a line entirely
    pub fn remove(&mut self, menu_id: &str) {
        self.lines.retain(|l| l.menu_id != menu_id);
    }

    /// Set a line's quantity; zero removes it
    pub fn set_quantity(&mut self, menu_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(menu_id);
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.menu_id == menu_id) {
            line.quantity = quantity;
        }
    }

    /// Decrease a line by one, removing it at zero
    pub fn decrement(&mut self, menu_id: &str) {
        let current = self
            .lines
            .iter()
            .find(|l| l.menu_id == menu_id)
            .map(|l| l.quantity)
            .unwrap_or(0);
        self.set_quantity(menu_id, current.saturating_sub(1));
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of price × quantity
    pub fn total(&self) -> f64 {
        self.lines.iter().map(DraftLine::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer_name.clear();
        self.customer_phone.clear();
    }

    fn check_ready(&self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(RestoError::InvalidInput(
                "An order needs at least one item".to_string(),
            ));
        }
        if self.customer_name.trim().is_empty() {
            return Err(RestoError::InvalidInput(
                "Customer name is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Staff order payload
    pub fn to_new_order(&self) -> Result<NewOrder> {
        self.check_ready()?;
        Ok(NewOrder {
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            items: self
                .lines
                .iter()
                .map(|l| OrderItem {
                    menu_id: Some(l.menu_id.clone()),
                    name: l.name.clone(),
                    price: l.price,
                    quantity: l.quantity,
                    variation: None,
                    addons: Vec::new(),
                })
                .collect(),
            total_amount: self.total(),
        })
    }

    /// Customer order payload (prices are resolved server-side)
    pub fn to_public_order(&self) -> Result<PublicOrder> {
        self.check_ready()?;
        Ok(PublicOrder {
            items: self
                .lines
                .iter()
                .map(|l| PublicOrderLine {
                    menu_id: l.menu_id.clone(),
                    quantity: l.quantity,
                })
                .collect(),
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(id: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Dish {}", id),
            description: String::new(),
            price,
            category: "Mains".to_string(),
            is_available: true,
        }
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut draft = OrderDraft::new();
        draft.add(&dish("m1", 120.0));
        draft.add(&dish("m1", 120.0));
        draft.add(&dish("m2", 80.5));

        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.lines()[0].quantity, 2);
        assert_eq!(draft.item_count(), 3);
        assert!((draft.total() - 320.5).abs() < 1e-9);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut draft = OrderDraft::new();
        draft.add(&dish("m1", 100.0));
        draft.set_quantity("m1", 4);
        assert_eq!(draft.total(), 400.0);

        draft.decrement("m1");
        assert_eq!(draft.lines()[0].quantity, 3);

        draft.set_quantity("m1", 0);
        assert!(draft.is_empty());
        assert_eq!(draft.total(), 0.0);
    }

    #[test]
    fn test_payloads_require_name_and_items() {
        let mut draft = OrderDraft::new();
        assert!(draft.to_new_order().is_err());

        draft.add(&dish("m1", 50.0));
        assert!(draft.to_public_order().is_err());

        draft.customer_name = " Asha ".to_string();
        let order = draft.to_new_order().unwrap();
        assert_eq!(order.customer_name, "Asha");
        assert_eq!(order.total_amount, 50.0);
        assert_eq!(order.items[0].menu_id.as_deref(), Some("m1"));

        let public = draft.to_public_order().unwrap();
        assert_eq!(public.items[0].quantity, 1);

        draft.clear();
        assert!(draft.is_empty());
        assert!(draft.customer_name.is_empty());
    }
}
