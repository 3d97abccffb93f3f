//! Pension Entitlement Engine for the Colombian average-premium regime
//!
//! This crate turns a parsed employment and contribution history into a
//! verified weeks count, a base settlement income (IBL), a replacement-rate
//! derived monthly pension, an eligibility determination and a lump-sum
//! indemnity estimate. It also solves for the contribution base needed to
//! reach a target pension, and exposes everything over a small HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
