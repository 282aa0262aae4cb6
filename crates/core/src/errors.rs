use thiserror::Error;

use crate::order::OrderStatus;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown menu item: {0}")]
    UnknownMenuItem(String),
    #[error("menu item `{0}` is currently unavailable")]
    ItemUnavailable(String),
    #[error("quantity {0} is outside the allowed range 1..=99")]
    QuantityOutOfRange(u32),
    #[error("order has no lines to confirm")]
    EmptyOrder,
    #[error("order is {0:?} and can no longer be modified")]
    OrderClosed(OrderStatus),
    #[error("`{0}` is not in the current order")]
    LineNotFound(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("llm failure: {0}")]
    Llm(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Message safe to show on the kiosk screen. Raw error detail goes to
    /// the log, never to the customer.
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(DomainError::UnknownMenuItem(name)) => {
                format!("I couldn't find \"{name}\" on our menu.")
            }
            Self::Domain(DomainError::ItemUnavailable(name)) => {
                format!("Sorry, \"{name}\" is sold out right now.")
            }
            Self::Domain(DomainError::QuantityOutOfRange(_)) => {
                "Quantities must be between 1 and 99.".to_string()
            }
            Self::Domain(DomainError::EmptyOrder) => {
                "Your order is empty - add something first!".to_string()
            }
            Self::Domain(DomainError::OrderClosed(_)) => {
                "That order is already confirmed. Start a new one to keep ordering.".to_string()
            }
            Self::Domain(DomainError::LineNotFound(name)) => {
                format!("\"{name}\" isn't in your order.")
            }
            Self::Llm(_) => {
                "I'm having trouble right now. Please try again in a moment.".to_string()
            }
            Self::Configuration(_) => {
                "The kiosk is misconfigured. Please find a member of staff.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_errors_render_customer_safe_messages() {
        let error = ApplicationError::from(DomainError::UnknownMenuItem("Whopper".to_string()));
        assert_eq!(error.user_message(), "I couldn't find \"Whopper\" on our menu.");
    }

    #[test]
    fn llm_detail_never_reaches_the_customer() {
        let error = ApplicationError::Llm("429 from upstream: budget exhausted".to_string());
        assert!(!error.user_message().contains("429"));
    }
}
