pub mod branch;
pub mod query;
pub mod report;
pub mod ticket;
