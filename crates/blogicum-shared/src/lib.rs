//! # Blogicum Shared
//!
//! Wire types shared between the server and its clients. Nothing here depends
//! on the domain crate, so it can be compiled for a WASM front end as well.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, FieldErrorBody};
