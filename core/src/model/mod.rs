pub mod entry;
pub mod material;
pub mod sales;
pub mod staff;
pub mod snapshot;
