pub mod config;
pub mod expand;
pub mod next;
pub mod validate;
pub mod week;
