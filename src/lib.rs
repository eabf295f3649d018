//! Chinese to English translation with keyword extraction, backed by an LLM.
//!
//! `application::translation::TranslationService` is the pipeline entry point;
//! `interfaces::api::router` exposes it over HTTP.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;
