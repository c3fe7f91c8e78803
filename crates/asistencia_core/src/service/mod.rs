//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, mirror and ingestion into operator-level APIs.
//! - Keep front-ends decoupled from storage details.

pub mod attendance_service;
