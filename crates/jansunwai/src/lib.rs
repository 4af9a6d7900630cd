//! Shared core for the JanSunwai grievance portal.
//!
//! The crate carries everything a thin client renderer needs: the bilingual
//! string store, the complaint form validation engine, the submission and OTP
//! verification workflow, and complaint tracking. HTTP routers for each piece
//! live next to the domain code so a host binary only has to compose them.

pub mod config;
pub mod error;
pub mod localization;
pub mod telemetry;
pub mod workflows;
