//! HTTP service: accepts page HTML and answers with a multi-model comparison report.

pub mod config;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
