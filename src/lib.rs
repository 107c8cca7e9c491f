// client library for the IBM Cloud Configuration Governance v1 and
// Enterprise Management v1 services

#[macro_use]
mod macros;

pub mod conditions;
pub mod config;
pub mod enterprise;
pub mod governance;
pub mod service;
pub mod version;

pub use service::{DetailedResponse, SdkError, ServiceOptions};
