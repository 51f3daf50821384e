//! # Meander
//!
//! An endless-discovery feed engine over the MediaWiki query API: random
//! article cards, keyword search, and a related-articles overlay, each as an
//! independently-lifecycled stream.
//!
//! ## Architecture
//!
//! ```text
//! trigger → controller → client → filter → preload → store
//! ```
//!
//! - [`client`]: typed wrapper over the encyclopedia API's three query shapes
//! - [`preload`]: settle-all thumbnail probing before a batch is committed
//! - [`feed`]: the three streams, their guards, and subscribe/notify
//! - [`engine`]: pipeline orchestration and the continuation controller
//!
//! The core never renders anything; a host (here, the CLI) sends boundary
//! events and observes the store.

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together config, client, preloader,
/// store, and engine.
pub mod app;

/// Typed encyclopedia API client.
///
/// - [`ArticleSource`](client::ArticleSource): async trait over the query shapes
/// - [`WikiClient`](client::WikiClient): reqwest-based implementation
pub mod client;

/// Command-line interface using clap: `feed`, `search`, `related`.
pub mod cli;

/// Configuration management, read from `~/.config/meander/config.toml`.
pub mod config;

/// Core domain models: [`ArticleRecord`](domain::ArticleRecord) and
/// [`Thumbnail`](domain::Thumbnail).
pub mod domain;

/// Fetch pipelines and the continuation controller.
pub mod engine;

/// The feed streams: ordered sequences with per-stream loading guards,
/// append/replace commits, and watch-channel change notification.
pub mod feed;

/// Settle-all thumbnail preloading.
pub mod preload;
