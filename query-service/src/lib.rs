//! Query Service - validated echo endpoints behind a health probe.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
