pub mod dto;
pub mod ledger;
pub mod sales;
pub mod stock;
