//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate cache, scene, and bookmark components into per-tick use
//!   cases.
//! - Keep engine and UI adapters decoupled from component internals.

pub mod ingest;
pub mod scene_service;
