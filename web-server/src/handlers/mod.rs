//! HTTP handlers

pub mod health;
pub mod index;
pub mod classify;
pub mod feedback;
pub mod samples;
pub mod engine;
