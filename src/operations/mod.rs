pub mod creation;
pub mod layout;
pub mod query;
