pub mod fingerlog;
