//! Input validation for customer records
//!
//! Customers arrive from an external source with no guarantees beyond their
//! shape. A customer that fails these checks poisons its whole batch, so only
//! records that cannot be rendered as a report row are rejected.

use crate::models::CustomerRecord;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCustomer {
    #[error("customer {id} has a blank name")]
    BlankName { id: i64 },

    #[error("customer {id} has a blank module name")]
    BlankModule { id: i64 },
}

/// Validates a customer before its modules are evaluated
pub fn validate_customer(customer: &CustomerRecord) -> Result<(), InvalidCustomer> {
    if customer.name.trim().is_empty() {
        return Err(InvalidCustomer::BlankName { id: customer.id });
    }

    if customer.modules.iter().any(|module| module.trim().is_empty()) {
        return Err(InvalidCustomer::BlankModule { id: customer.id });
    }

    Ok(())
}
