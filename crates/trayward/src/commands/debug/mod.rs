pub mod candidates;
pub mod list;
