pub mod account;
pub mod ai;
pub mod project;
