pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod owner;
