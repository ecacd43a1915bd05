pub mod admin;
pub mod help;
pub mod pets;
pub mod report;
