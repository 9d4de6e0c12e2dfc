pub mod checkout;
pub mod pricing;
pub mod schedule;
pub mod selection;
