use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::menu::{MenuItem, MenuItemId};

pub const MAX_LINE_QUANTITY: u32 = 99;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    /// `ORD-YYYYMMDD-XXXXXXXX` - date plus an uppercase uuid fragment.
    pub fn generate() -> Self {
        let date = Utc::now().format("%Y%m%d");
        let fragment = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        Self(format!("ORD-{date}-{fragment}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    Confirmed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: MenuItemId,
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub options: Vec<String>,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn same_configuration(&self, item_id: &MenuItemId, options: &[String]) -> bool {
        let mine: BTreeSet<&String> = self.options.iter().collect();
        let theirs: BTreeSet<&String> = options.iter().collect();
        &self.item_id == item_id && mine == theirs
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub special_request: Option<String>,
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

impl Order {
    pub fn new() -> Self {
        Self {
            id: OrderId::generate(),
            status: OrderStatus::Open,
            lines: Vec::new(),
            created_at: Utc::now(),
            special_request: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Add a menu item, merging into an existing line when the item and
    /// option set match. The merged quantity is still capped at 99.
    pub fn add_line(
        &mut self,
        item: &MenuItem,
        quantity: u32,
        options: Vec<String>,
    ) -> Result<&OrderLine, DomainError> {
        self.ensure_open()?;
        if !item.available {
            return Err(DomainError::ItemUnavailable(item.name.clone()));
        }
        if quantity < 1 || quantity > MAX_LINE_QUANTITY {
            return Err(DomainError::QuantityOutOfRange(quantity));
        }

        let position = self
            .lines
            .iter()
            .position(|line| line.same_configuration(&item.id, &options));

        let index = match position {
            Some(index) => {
                let line = &mut self.lines[index];
                let merged = line.quantity.saturating_add(quantity);
                if merged > MAX_LINE_QUANTITY {
                    return Err(DomainError::QuantityOutOfRange(merged));
                }
                line.quantity = merged;
                index
            }
            None => {
                self.lines.push(OrderLine {
                    item_id: item.id.clone(),
                    item_name: item.name.clone(),
                    quantity,
                    unit_price: item.unit_price,
                    options,
                });
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[index])
    }

    /// Remove by case-insensitive substring of the line's item name.
    /// `quantity: None` (or >= the line quantity) drops the whole line;
    /// otherwise the line quantity is decremented.
    pub fn remove_line(
        &mut self,
        name: &str,
        quantity: Option<u32>,
    ) -> Result<OrderLine, DomainError> {
        self.ensure_open()?;
        let needle = name.trim().to_lowercase();
        let position = self
            .lines
            .iter()
            .position(|line| line.item_name.to_lowercase().contains(&needle))
            .ok_or_else(|| DomainError::LineNotFound(name.to_string()))?;

        match quantity {
            Some(removed) if removed < self.lines[position].quantity => {
                let line = &mut self.lines[position];
                line.quantity -= removed;
                let mut snapshot = line.clone();
                snapshot.quantity = removed;
                Ok(snapshot)
            }
            _ => Ok(self.lines.remove(position)),
        }
    }

    pub fn set_special_request(&mut self, request: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.special_request = Some(request.into());
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<(), DomainError> {
        self.ensure_open()?;
        if self.lines.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        self.status = OrderStatus::Confirmed;
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Human-readable receipt used by the confirm tool and the exit flow.
    pub fn receipt(&self) -> String {
        let mut lines = vec![format!("Order {}", self.id.0), String::new()];

        for line in &self.lines {
            lines.push(format!("- {} x {}", line.item_name, line.quantity));
            if !line.options.is_empty() {
                lines.push(format!("  options: {}", line.options.join(", ")));
            }
            lines.push(format!("  ${}", line.line_total().round_dp(2)));
        }

        lines.push(String::new());
        lines.push(format!("Items: {}", self.item_count()));
        lines.push(format!("Total: ${}", self.total().round_dp(2)));

        if let Some(request) = &self.special_request {
            lines.push(format!("Special request: {request}"));
        }

        lines.join("\n")
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        match self.status {
            OrderStatus::Open => Ok(()),
            status => Err(DomainError::OrderClosed(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::errors::DomainError;
    use crate::menu::Menu;

    use super::{Order, OrderStatus};

    fn menu() -> Menu {
        Menu::standard()
    }

    #[test]
    fn order_ids_carry_the_expected_shape() {
        let order = Order::new();
        let parts: Vec<&str> = order.id.0.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn adding_the_same_configuration_merges_quantities() {
        let menu = menu();
        let burger = menu.find_by_name("classic").expect("menu item");
        let mut order = Order::new();

        order.add_line(burger, 2, vec!["extra cheese".to_string()]).expect("first add");
        order.add_line(burger, 1, vec!["extra cheese".to_string()]).expect("merge add");

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 3);
    }

    #[test]
    fn different_option_sets_stay_on_separate_lines() {
        let menu = menu();
        let burger = menu.find_by_name("classic").expect("menu item");
        let mut order = Order::new();

        order.add_line(burger, 1, vec![]).expect("plain");
        order.add_line(burger, 1, vec!["extra bacon".to_string()]).expect("with bacon");

        assert_eq!(order.lines.len(), 2);
    }

    #[test]
    fn merge_cannot_exceed_the_quantity_cap() {
        let menu = menu();
        let burger = menu.find_by_name("classic").expect("menu item");
        let mut order = Order::new();

        order.add_line(burger, 60, vec![]).expect("first add");
        let error = order.add_line(burger, 60, vec![]).expect_err("cap breach");
        assert!(matches!(error, DomainError::QuantityOutOfRange(120)));
        assert_eq!(order.lines[0].quantity, 60, "failed merge must not mutate the line");
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let menu = menu();
        let burger = menu.find_by_name("classic").expect("menu item");
        let mut order = Order::new();
        assert!(matches!(
            order.add_line(burger, 0, vec![]),
            Err(DomainError::QuantityOutOfRange(0))
        ));
    }

    #[test]
    fn partial_removal_decrements_and_reports_the_removed_count() {
        let menu = menu();
        let fries = menu.find_by_name("fries").expect("menu item");
        let mut order = Order::new();
        order.add_line(fries, 5, vec![]).expect("add");

        let removed = order.remove_line("fries", Some(2)).expect("partial remove");
        assert_eq!(removed.quantity, 2);
        assert_eq!(order.lines[0].quantity, 3);
    }

    #[test]
    fn removal_of_the_full_quantity_drops_the_line() {
        let menu = menu();
        let fries = menu.find_by_name("fries").expect("menu item");
        let mut order = Order::new();
        order.add_line(fries, 2, vec![]).expect("add");

        order.remove_line("french", Some(5)).expect("over-remove drops line");
        assert!(order.is_empty());
    }

    #[test]
    fn removing_an_absent_item_fails() {
        let mut order = Order::new();
        let menu = menu();
        order.add_line(menu.find_by_name("cola").expect("cola"), 1, vec![]).expect("add");
        assert!(matches!(
            order.remove_line("burger", None),
            Err(DomainError::LineNotFound(_))
        ));
    }

    #[test]
    fn confirm_requires_at_least_one_line() {
        let mut order = Order::new();
        assert!(matches!(order.confirm(), Err(DomainError::EmptyOrder)));
    }

    #[test]
    fn confirmed_orders_reject_further_mutation() {
        let menu = menu();
        let burger = menu.find_by_name("double").expect("menu item");
        let mut order = Order::new();
        order.add_line(burger, 1, vec![]).expect("add");
        order.confirm().expect("confirm");

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!(matches!(
            order.add_line(burger, 1, vec![]),
            Err(DomainError::OrderClosed(OrderStatus::Confirmed))
        ));
        assert!(matches!(
            order.remove_line("double", None),
            Err(DomainError::OrderClosed(OrderStatus::Confirmed))
        ));
    }

    #[test]
    fn totals_sum_unit_price_times_quantity() {
        let menu = menu();
        let mut order = Order::new();
        order.add_line(menu.find_by_name("classic").expect("burger"), 2, vec![]).expect("add");
        order.add_line(menu.find_by_name("cola").expect("cola"), 1, vec![]).expect("add");

        // 2 * 5.90 + 2.00
        assert_eq!(order.total(), Decimal::new(1380, 2));
        assert_eq!(order.item_count(), 3);
    }

    #[test]
    fn receipt_lists_lines_options_and_total() {
        let menu = menu();
        let mut order = Order::new();
        order
            .add_line(
                menu.find_by_name("americano").expect("coffee"),
                1,
                vec!["extra shot".to_string()],
            )
            .expect("add");
        order.set_special_request("no lid please").expect("request");

        let receipt = order.receipt();
        assert!(receipt.contains("Americano x 1"));
        assert!(receipt.contains("options: extra shot"));
        assert!(receipt.contains("Total: $2.50"));
        assert!(receipt.contains("Special request: no lid please"));
    }
}
