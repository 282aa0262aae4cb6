//! Input and order validation.
//!
//! Validation never mutates anything: callers decide whether warnings are
//! surfaced to the customer or only logged.

use rust_decimal::Decimal;

use crate::menu::Menu;
use crate::order::{Order, OrderLine, MAX_LINE_QUANTITY};

const MAX_INPUT_CHARS: usize = 500;
const LARGE_QUANTITY_WARNING: u32 = 10;
const LARGE_ITEM_COUNT_WARNING: u32 = 20;

// Crude markup/script markers; kiosk input is plain speech, anything
// resembling injection is rejected outright.
const BLOCKED_FRAGMENTS: [&str; 3] = ["<script>", "javascript:", "onerror="];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    fn warn(mut self, message: impl Into<String>) -> Self {
        self.warnings.push(message.into());
        self
    }

    fn merge_prefixed(&mut self, prefix: &str, other: ValidationReport) {
        self.errors.extend(other.errors.into_iter().map(|e| format!("{prefix}: {e}")));
        self.warnings.extend(other.warnings.into_iter().map(|w| format!("{prefix}: {w}")));
    }
}

pub fn validate_user_input(input: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    if input.trim().is_empty() {
        return report.error("input is empty");
    }
    if input.chars().count() > MAX_INPUT_CHARS {
        report = report.warn("input is unusually long");
    }

    let lowered = input.to_lowercase();
    if BLOCKED_FRAGMENTS.iter().any(|fragment| lowered.contains(fragment)) {
        report = report.error("input contains disallowed characters");
    }

    report
}

pub fn validate_quantity(quantity: u32) -> ValidationReport {
    let report = ValidationReport::default();
    if quantity < 1 {
        report.error("quantity must be at least 1")
    } else if quantity > MAX_LINE_QUANTITY {
        report.error(format!("quantity must be at most {MAX_LINE_QUANTITY}"))
    } else if quantity > LARGE_QUANTITY_WARNING {
        report.warn(format!("large quantity: {quantity}"))
    } else {
        report
    }
}

pub fn validate_line(line: &OrderLine, menu: &Menu) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(item) = menu.find(&line.item_id) else {
        return report.error(format!("menu item `{}` does not exist", line.item_id.0));
    };

    if !item.available {
        report = report.error(format!("`{}` is currently unavailable", item.name));
    }

    let quantity_report = validate_quantity(line.quantity);
    report.errors.extend(quantity_report.errors);
    report.warnings.extend(quantity_report.warnings);

    if line.unit_price != item.unit_price {
        report = report.warn(format!(
            "price drift for `{}`: line has {}, menu has {}",
            item.name, line.unit_price, item.unit_price
        ));
    }

    for option in &line.options {
        if !item.options.contains(option) {
            report = report.warn(format!("`{option}` is not a known option for `{}`", item.name));
        }
    }

    report
}

pub fn validate_order(order: &Order, menu: &Menu) -> ValidationReport {
    let mut report = ValidationReport::default();

    if order.is_empty() {
        return report.error("order has no lines");
    }

    for (index, line) in order.lines.iter().enumerate() {
        report.merge_prefixed(&format!("line {}", index + 1), validate_line(line, menu));
    }

    if order.total() <= Decimal::ZERO {
        report = report.error("order total must be positive");
    }
    if order.total() > Decimal::new(200_00, 2) {
        report = report.warn(format!("unusually large order total: ${}", order.total()));
    }
    if order.item_count() > LARGE_ITEM_COUNT_WARNING {
        report = report.warn(format!("unusually many items: {}", order.item_count()));
    }

    report
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn sanitize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold common colloquialisms into menu vocabulary before name matching.
pub fn normalize_item_name(name: &str) -> String {
    let mut normalized = sanitize_text(&name.to_lowercase());
    for (colloquial, canonical) in
        [("hamburger", "burger"), ("fries", "french fries"), ("coke", "cola"), ("soda", "lemon soda")]
    {
        if normalized == colloquial {
            normalized = canonical.to_string();
        }
    }
    normalized
}

/// First integer found in free text; defaults to one when there is none.
/// Digit runs too large for `u32` saturate so quantity validation rejects
/// them instead of quietly ordering a single item.
pub fn extract_quantity(text: &str) -> u32 {
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        return 1;
    }
    digits.parse().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::menu::Menu;
    use crate::order::Order;

    use super::{
        extract_quantity, normalize_item_name, sanitize_text, validate_order, validate_quantity,
        validate_user_input,
    };

    #[test]
    fn empty_input_is_invalid() {
        assert!(!validate_user_input("   ").is_valid());
    }

    #[test]
    fn script_fragments_are_rejected() {
        let report = validate_user_input("one burger <SCRIPT>alert(1)</script>");
        assert!(!report.is_valid());
    }

    #[test]
    fn long_input_only_warns() {
        let report = validate_user_input(&"a".repeat(600));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn quantity_bounds() {
        assert!(!validate_quantity(0).is_valid());
        assert!(!validate_quantity(100).is_valid());
        assert!(validate_quantity(99).is_valid());

        let report = validate_quantity(15);
        assert!(report.is_valid());
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn order_validation_prefixes_line_findings() {
        let menu = Menu::standard();
        let mut order = Order::new();
        order
            .add_line(menu.find_by_name("cola").expect("cola"), 1, vec!["extra patty".to_string()])
            .expect("add");

        let report = validate_order(&order, &menu);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.starts_with("line 1:")));
    }

    #[test]
    fn price_drift_against_the_catalog_is_warned() {
        let menu = Menu::standard();
        let mut order = Order::new();
        order.add_line(menu.find_by_name("cola").expect("cola"), 1, vec![]).expect("add");
        // Stale line priced before a menu update.
        order.lines[0].unit_price = Decimal::new(950, 2);

        let report = validate_order(&order, &menu);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("price drift for `Cola`")));
    }

    #[test]
    fn unusually_large_totals_are_warned() {
        let menu = Menu::standard();
        let mut order = Order::new();
        // 23 * 8.90 = 204.70
        order.add_line(menu.find_by_name("double").expect("double burger"), 23, vec![]).expect("add");

        let report = validate_order(&order, &menu);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("unusually large order total")));
    }

    #[test]
    fn unusually_many_items_are_warned() {
        let menu = Menu::standard();
        let mut order = Order::new();
        order.add_line(menu.find_by_name("fries").expect("fries"), 21, vec![]).expect("add");

        let report = validate_order(&order, &menu);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("unusually many items: 21")));
        // 21 orders of fries stay under the total threshold.
        assert!(!report.warnings.iter().any(|w| w.contains("order total")));
    }

    #[test]
    fn empty_order_is_invalid() {
        let menu = Menu::standard();
        let report = validate_order(&Order::new(), &menu);
        assert!(!report.is_valid());
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_text("  two   burgers \n please "), "two burgers please");
    }

    #[test]
    fn aliases_normalize_to_menu_vocabulary() {
        assert_eq!(normalize_item_name("  Fries "), "french fries");
        assert_eq!(normalize_item_name("Coke"), "cola");
        assert_eq!(normalize_item_name("cheeseburger"), "cheeseburger");
    }

    #[test]
    fn quantity_extraction_defaults_to_one() {
        assert_eq!(extract_quantity("give me 3 colas"), 3);
        assert_eq!(extract_quantity("a burger"), 1);
        assert_eq!(extract_quantity("12 then 9"), 12);
    }

    #[test]
    fn quantity_extraction_saturates_instead_of_defaulting() {
        assert_eq!(extract_quantity("99999999999999 burgers"), u32::MAX);
        assert!(!validate_quantity(extract_quantity("99999999999999 burgers")).is_valid());
    }
}
