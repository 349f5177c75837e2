pub mod fingerlog;
pub mod notes;
