//! Vayama travel super-app
//!
//! A server-rendered travel companion: an AI itinerary planner backed by a
//! generative-language endpoint, plus mock booking, messaging, reels, social
//! feed and profile screens.
//!
//! # Architecture
//!
//! - **Server**: Axum router, one HTML page plus form POST actions
//! - **Planner**: session wrapper around the Gemini `generateContent` API
//! - **Shell**: per-browser navigation state with one mounted screen
//! - **UI**: HTML rendered from the shell on every request
//!
//! # Modules
//!
//! - [`llm`]: driver trait and the Gemini REST driver
//! - [`planner`]: chat session lifecycle and failure handling
//! - [`itinerary`]: itinerary types and reply classification
//! - [`shell`]: tabs, notification slot, booking hand-off
//! - [`screens`]: per-tab screen state
//! - [`client`]: per-browser shell store

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::assigning_clones)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod fixtures;
pub mod itinerary;
pub mod llm;
pub mod notification;
pub mod planner;
pub mod prefs;
pub mod screens;
pub mod server;
pub mod shell;
pub mod ui;

use std::sync::Arc;

use crate::client::ClientStore;
use crate::config::AppConfig;
use crate::llm::LlmDriver;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Every browser's shell.
    pub clients: ClientStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, driver: Arc<dyn LlmDriver>) -> Self {
        Self {
            clients: ClientStore::new(driver, config.timing, config.server.client_idle()),
            config,
        }
    }
}
