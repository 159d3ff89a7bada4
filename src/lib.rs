//! Contract-verification harness for the courier dispatch HTTP service.

pub mod clients;
pub mod config;
pub mod error;
pub mod fixture;
pub mod models;
pub mod observability;
pub mod rest;
pub mod scenarios;
pub mod stub;
