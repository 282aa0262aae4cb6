//! Callable tools exposed to the model.
//!
//! Tool handlers are the only bridge between model output and kiosk state.
//! Every payload back to the model carries a `success` flag plus a short
//! `message` the model can read aloud, mirroring what the rest of the
//! payload says in machine-readable form.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::warn;

use pattybot_core::errors::{ApplicationError, DomainError};
use pattybot_core::menu::{Menu, MenuCategory};
use pattybot_core::order::Order;
use pattybot_core::validation::{extract_quantity, normalize_item_name};

use crate::llm::{ChatToolDefinition, ChatToolFunction};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn parameters(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<Value>;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<ChatToolDefinition> {
        let mut definitions: Vec<ChatToolDefinition> = self
            .tools
            .values()
            .map(|tool| ChatToolDefinition {
                kind: "function".to_string(),
                function: ChatToolFunction {
                    name: tool.name().to_string(),
                    description: Some(tool.description().to_string()),
                    parameters: tool.parameters(),
                },
            })
            .collect();
        definitions.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        definitions
    }

    /// Execute a named tool. Failures become structured payloads so the
    /// model always gets something to respond to; a broken tool call must
    /// never abort the customer's turn.
    pub async fn dispatch(&self, name: &str, input: Value) -> Value {
        let Some(tool) = self.tools.get(name) else {
            warn!(event_name = "agent.tools.unknown_tool", tool = name, "model called unknown tool");
            return json!({ "success": false, "message": format!("unknown tool: {name}") });
        };

        match tool.execute(input).await {
            Ok(payload) => payload,
            Err(error) => {
                warn!(
                    event_name = "agent.tools.execution_failed",
                    tool = name,
                    error = %error,
                    "tool execution failed"
                );
                json!({ "success": false, "message": format!("tool execution failed: {error}") })
            }
        }
    }
}

/// Shared kiosk state handed to every tool. The menu is immutable; the
/// order sits behind a mutex because tool calls within one turn run
/// sequentially but the CLI also reads it between turns.
#[derive(Clone)]
pub struct KioskState {
    pub menu: Arc<Menu>,
    pub order: Arc<Mutex<Order>>,
}

impl KioskState {
    pub fn new(menu: Menu) -> Self {
        Self { menu: Arc::new(menu), order: Arc::new(Mutex::new(Order::new())) }
    }

    pub async fn reset_order(&self) {
        self.order.lock().await.clear();
    }
}

/// Registry preloaded with every kiosk tool.
pub fn standard_registry(state: KioskState) -> ToolRegistry {
    let mut registry = ToolRegistry::default();
    registry.register(MenuItemInfo { state: state.clone() });
    registry.register(ListMenu { state: state.clone() });
    registry.register(MenuByCategory { state: state.clone() });
    registry.register(SearchMenu { state: state.clone() });
    registry.register(AddItem { state: state.clone() });
    registry.register(RemoveItem { state: state.clone() });
    registry.register(ShowOrder { state: state.clone() });
    registry.register(ConfirmOrder { state: state.clone() });
    registry.register(AddSpecialRequest { state });
    registry
}

fn domain_failure(error: DomainError) -> Value {
    json!({ "success": false, "message": ApplicationError::from(error).user_message() })
}

fn required_str(input: &Value, key: &str) -> Result<String> {
    input
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing required string argument `{key}`"))
}

fn optional_quantity(input: &Value, key: &str) -> Result<Option<u32>, DomainError> {
    match input.get(key) {
        Some(Value::Number(number)) => match number.as_u64() {
            Some(n) => Ok(Some(n.min(u64::from(u32::MAX)) as u32)),
            // Negative or fractional counts can never name a valid quantity.
            None => Err(DomainError::QuantityOutOfRange(0)),
        },
        // Models occasionally send quantities as prose ("two", "3 please").
        Some(Value::String(text)) => Ok(Some(extract_quantity(text))),
        _ => Ok(None),
    }
}

fn optional_string_list(input: &Value, key: &str) -> Vec<String> {
    input
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values.iter().filter_map(Value::as_str).map(str::to_string).collect()
        })
        .unwrap_or_default()
}

struct MenuItemInfo {
    state: KioskState,
}

#[async_trait]
impl Tool for MenuItemInfo {
    fn name(&self) -> &'static str {
        "menu_item_info"
    }

    fn description(&self) -> &'static str {
        "Look up a single menu item by name, including its price and options"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Menu item name to look up" }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let name = required_str(&input, "name")?;
        match self.state.menu.find_by_name(&normalize_item_name(&name)) {
            Some(item) => Ok(json!({
                "success": true,
                "item": item,
                "message": format!("Found {}.", item.name)
            })),
            None => Ok(domain_failure(DomainError::UnknownMenuItem(name))),
        }
    }
}

struct ListMenu {
    state: KioskState,
}

#[async_trait]
impl Tool for ListMenu {
    fn name(&self) -> &'static str {
        "list_menu"
    }

    fn description(&self) -> &'static str {
        "List every menu item currently available"
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        let items = self.state.menu.available_items();
        let count = items.len();
        Ok(json!({
            "success": true,
            "items": items,
            "count": count,
            "message": format!("{count} items are available.")
        }))
    }
}

struct MenuByCategory {
    state: KioskState,
}

#[async_trait]
impl Tool for MenuByCategory {
    fn name(&self) -> &'static str {
        "menu_by_category"
    }

    fn description(&self) -> &'static str {
        "List menu items in one category"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": ["burger", "side", "drink", "dessert"],
                    "description": "Menu category"
                }
            },
            "required": ["category"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let raw = required_str(&input, "category")?;
        let Ok(category) = MenuCategory::from_str(&raw) else {
            return Ok(json!({
                "success": false,
                "message": format!("`{raw}` is not a menu category (burger, side, drink, dessert)")
            }));
        };

        let items = self.state.menu.by_category(category);
        let count = items.len();
        Ok(json!({
            "success": true,
            "category": category,
            "items": items,
            "count": count,
            "message": format!("{} has {count} items.", category.display_name())
        }))
    }
}

struct SearchMenu {
    state: KioskState,
}

#[async_trait]
impl Tool for SearchMenu {
    fn name(&self) -> &'static str {
        "search_menu"
    }

    fn description(&self) -> &'static str {
        "Search menu items by keyword across names and descriptions"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "keyword": { "type": "string", "description": "Search keyword" }
            },
            "required": ["keyword"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let keyword = required_str(&input, "keyword")?;
        let items = self.state.menu.search(&keyword);
        let count = items.len();
        Ok(json!({
            "success": true,
            "items": items,
            "count": count,
            "message": format!("{count} items match \"{keyword}\".")
        }))
    }
}

struct AddItem {
    state: KioskState,
}

#[async_trait]
impl Tool for AddItem {
    fn name(&self) -> &'static str {
        "add_item"
    }

    fn description(&self) -> &'static str {
        "Add a menu item to the current order"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "item_name": { "type": "string", "description": "Menu item to add" },
                "quantity": { "type": "integer", "description": "How many (default 1)", "default": 1 },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Options for this item, e.g. \"extra cheese\""
                }
            },
            "required": ["item_name"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let item_name = required_str(&input, "item_name")?;
        let quantity = match optional_quantity(&input, "quantity") {
            Ok(quantity) => quantity.unwrap_or(1),
            Err(error) => return Ok(domain_failure(error)),
        };
        let options = optional_string_list(&input, "options");

        let Some(item) = self.state.menu.find_by_name(&normalize_item_name(&item_name)) else {
            return Ok(domain_failure(DomainError::UnknownMenuItem(item_name)));
        };

        let mut order = self.state.order.lock().await;
        match order.add_line(item, quantity, options) {
            Ok(line) => {
                let line = line.clone();
                let message = format!("Added {} x {}.", quantity, line.item_name);
                Ok(json!({
                    "success": true,
                    "line": line,
                    "total_items": order.item_count(),
                    "total_price": order.total(),
                    "message": message
                }))
            }
            Err(error) => Ok(domain_failure(error)),
        }
    }
}

struct RemoveItem {
    state: KioskState,
}

#[async_trait]
impl Tool for RemoveItem {
    fn name(&self) -> &'static str {
        "remove_item"
    }

    fn description(&self) -> &'static str {
        "Remove a menu item from the current order, fully or partially"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "item_name": { "type": "string", "description": "Menu item to remove" },
                "quantity": {
                    "type": "integer",
                    "description": "How many to remove (omit to remove all)"
                }
            },
            "required": ["item_name"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let item_name = required_str(&input, "item_name")?;
        let quantity = match optional_quantity(&input, "quantity") {
            Ok(quantity) => quantity,
            Err(error) => return Ok(domain_failure(error)),
        };

        let mut order = self.state.order.lock().await;
        match order.remove_line(&item_name, quantity) {
            Ok(removed) => {
                let message = format!("Removed {} x {}.", removed.quantity, removed.item_name);
                Ok(json!({
                    "success": true,
                    "removed": removed,
                    "total_items": order.item_count(),
                    "total_price": order.total(),
                    "message": message
                }))
            }
            Err(error) => Ok(domain_failure(error)),
        }
    }
}

struct ShowOrder {
    state: KioskState,
}

#[async_trait]
impl Tool for ShowOrder {
    fn name(&self) -> &'static str {
        "show_order"
    }

    fn description(&self) -> &'static str {
        "Show the current order contents and total"
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        let order = self.state.order.lock().await;
        if order.is_empty() {
            return Ok(json!({
                "success": true,
                "order": Value::Null,
                "message": "The order is currently empty."
            }));
        }

        Ok(json!({
            "success": true,
            "order": &*order,
            "total_items": order.item_count(),
            "total_price": order.total(),
            "message": "Here is the current order."
        }))
    }
}

struct ConfirmOrder {
    state: KioskState,
}

#[async_trait]
impl Tool for ConfirmOrder {
    fn name(&self) -> &'static str {
        "confirm_order"
    }

    fn description(&self) -> &'static str {
        "Confirm and finalize the current order"
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        let mut order = self.state.order.lock().await;
        match order.confirm() {
            Ok(()) => Ok(json!({
                "success": true,
                "order": &*order,
                "receipt": order.receipt(),
                "message": "The order is confirmed."
            })),
            Err(error) => Ok(domain_failure(error)),
        }
    }
}

struct AddSpecialRequest {
    state: KioskState,
}

#[async_trait]
impl Tool for AddSpecialRequest {
    fn name(&self) -> &'static str {
        "add_special_request"
    }

    fn description(&self) -> &'static str {
        "Attach a special preparation request to the order"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "request": { "type": "string", "description": "The customer's request" }
            },
            "required": ["request"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let request = required_str(&input, "request")?;
        let mut order = self.state.order.lock().await;
        match order.set_special_request(request.clone()) {
            Ok(()) => Ok(json!({
                "success": true,
                "message": format!("Noted: {request}")
            })),
            Err(error) => Ok(domain_failure(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use pattybot_core::menu::Menu;

    use super::{standard_registry, KioskState};

    fn registry_and_state() -> (super::ToolRegistry, KioskState) {
        let state = KioskState::new(Menu::standard());
        (standard_registry(state.clone()), state)
    }

    #[test]
    fn every_kiosk_tool_is_registered() {
        let (registry, _state) = registry_and_state();
        let names: Vec<String> =
            registry.definitions().iter().map(|d| d.function.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "add_item",
                "add_special_request",
                "confirm_order",
                "list_menu",
                "menu_by_category",
                "menu_item_info",
                "remove_item",
                "search_menu",
                "show_order",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_tool_returns_a_failure_payload() {
        let (registry, _state) = registry_and_state();
        let payload = registry.dispatch("launch_fries_cannon", json!({})).await;
        assert_eq!(payload["success"], false);
    }

    #[tokio::test]
    async fn add_item_places_a_priced_line() {
        let (registry, state) = registry_and_state();
        let payload = registry
            .dispatch("add_item", json!({ "item_name": "cheeseburger", "quantity": 2 }))
            .await;

        assert_eq!(payload["success"], true);
        assert_eq!(payload["total_items"], 2);

        let order = state.order.lock().await;
        assert_eq!(order.lines.len(), 1);
        // Price must come from the catalog, not the conversation.
        assert_eq!(order.lines[0].unit_price.to_string(), "6.90");
    }

    #[tokio::test]
    async fn add_item_accepts_colloquial_names() {
        let (registry, state) = registry_and_state();
        let payload = registry.dispatch("add_item", json!({ "item_name": "coke" })).await;
        assert_eq!(payload["success"], true);

        let order = state.order.lock().await;
        assert_eq!(order.lines[0].item_name, "Cola");
    }

    #[tokio::test]
    async fn add_item_rejects_unknown_items() {
        let (registry, _state) = registry_and_state();
        let payload = registry.dispatch("add_item", json!({ "item_name": "sushi" })).await;
        assert_eq!(payload["success"], false);
        assert!(payload["message"].as_str().expect("message").contains("sushi"));
    }

    #[tokio::test]
    async fn missing_required_argument_is_a_tool_failure() {
        let (registry, _state) = registry_and_state();
        let payload = registry.dispatch("add_item", json!({})).await;
        assert_eq!(payload["success"], false);
        assert!(payload["message"].as_str().expect("message").contains("item_name"));
    }

    #[tokio::test]
    async fn remove_item_supports_partial_quantities() {
        let (registry, _state) = registry_and_state();
        registry.dispatch("add_item", json!({ "item_name": "fries", "quantity": 3 })).await;

        let payload =
            registry.dispatch("remove_item", json!({ "item_name": "fries", "quantity": 1 })).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["total_items"], 2);
    }

    #[tokio::test]
    async fn confirm_refuses_an_empty_order() {
        let (registry, _state) = registry_and_state();
        let payload = registry.dispatch("confirm_order", json!({})).await;
        assert_eq!(payload["success"], false);
    }

    #[tokio::test]
    async fn confirm_produces_a_receipt() {
        let (registry, _state) = registry_and_state();
        registry.dispatch("add_item", json!({ "item_name": "double burger" })).await;
        registry
            .dispatch("add_special_request", json!({ "request": "no pickles" }))
            .await;

        let payload = registry.dispatch("confirm_order", json!({})).await;
        assert_eq!(payload["success"], true);
        let receipt = payload["receipt"].as_str().expect("receipt");
        assert!(receipt.contains("Double Burger x 1"));
        assert!(receipt.contains("Special request: no pickles"));
    }

    #[tokio::test]
    async fn menu_by_category_validates_the_category() {
        let (registry, _state) = registry_and_state();
        let payload =
            registry.dispatch("menu_by_category", json!({ "category": "pizza" })).await;
        assert_eq!(payload["success"], false);

        let payload =
            registry.dispatch("menu_by_category", json!({ "category": "drink" })).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["count"], 3);
    }

    #[tokio::test]
    async fn show_order_reports_empty_state() {
        let (registry, _state) = registry_and_state();
        let payload = registry.dispatch("show_order", json!({})).await;
        assert_eq!(payload["success"], true);
        assert!(payload["order"].is_null());
    }

    #[tokio::test]
    async fn negative_quantities_are_rejected() {
        let (registry, state) = registry_and_state();
        let payload = registry
            .dispatch("add_item", json!({ "item_name": "cola", "quantity": -3 }))
            .await;
        assert_eq!(payload["success"], false);
        assert!(payload["message"].as_str().expect("message").contains("between 1 and 99"));
        assert!(state.order.lock().await.is_empty());

        let payload = registry
            .dispatch("remove_item", json!({ "item_name": "cola", "quantity": -1 }))
            .await;
        assert_eq!(payload["success"], false);
    }

    #[tokio::test]
    async fn quantity_as_prose_is_tolerated() {
        let (registry, state) = registry_and_state();
        let payload = registry
            .dispatch("add_item", json!({ "item_name": "cola", "quantity": "3 please" }))
            .await;
        assert_eq!(payload["success"], true);
        assert_eq!(state.order.lock().await.item_count(), 3);
    }
}
