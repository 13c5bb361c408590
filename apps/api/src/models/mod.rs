pub mod context;
pub mod resume;
pub mod user;
