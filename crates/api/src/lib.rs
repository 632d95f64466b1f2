//! HTTP surface for the antibiotic inventory: pages, intake and stock endpoints.

pub mod app;
pub mod middleware;
