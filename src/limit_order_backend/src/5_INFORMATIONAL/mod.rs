//! Informational - Read-only views for UIs and operators
//! Nothing here moves funds or mutates trades

pub mod display;
