//! Deterministic kiosk core - menu catalog, order aggregate, and validation
//!
//! Everything in this crate is synchronous and side-effect free. The agent
//! layer (`pattybot-agent`) translates customer language into calls against
//! these types; it never owns pricing or order arithmetic.

pub mod config;
pub mod errors;
pub mod menu;
pub mod order;
pub mod validation;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use errors::{ApplicationError, DomainError};
pub use menu::{Menu, MenuCategory, MenuItem, MenuItemId};
pub use order::{Order, OrderId, OrderLine, OrderStatus};
pub use validation::{sanitize_text, ValidationReport};
