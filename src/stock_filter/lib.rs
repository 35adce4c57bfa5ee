//! # Stock Filter Architecture
//!
//! A faceted filter that narrows a product listing to one or more stock
//! statuses. The selection lives in the page URL, in the
//! `filter_stock_status` query parameter; everything else is derived from it.
//!
//! ## Three Representations, One Source
//!
//! ```text
//!   URL ──decode──▶ SelectionSet ──render──▶ checkboxes / dropdown
//!    ▲                                              │
//!    └──── navigate ◀── encode ◀── action ◀── DOM event
//! ```
//!
//! The selection, the URL and the rendered controls never drift apart because
//! only one of them is ever stored. Actions read the URL, derive the new
//! selection and request a full navigation; the server then renders the new
//! page from the new URL.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade owning config and location                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  actions, render, active_filters, preview, interactivity    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Codec (codec.rs) and Location (location/)                  │
//! │  - Pure URL rewriting; the host's address behind a trait    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No User-Visible Failures
//!
//! Unknown status keys, malformed parameters and missing labels are absorbed:
//! unknown keys are preserved in the URL and skipped everywhere else. Only
//! programming and I/O errors (templates, config files, bad element paths)
//! surface as [`error::FilterError`].
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`codec`]: URL parameter encoding and decoding
//! - [`actions`]: The selection store and its actions
//! - [`render`]: Storefront markup
//! - [`interactivity`]: Declarative bindings, markup hydration, event dispatch
//! - [`active_filters`]: Contribution to the active-filters summary
//! - [`preview`]: Editor markup
//! - [`location`]: The host page address
//! - [`model`]: Core data types
//! - [`config`]: Host configuration
//! - [`logging`]: Tracing setup for binaries
//! - [`error`]: Error types

pub mod actions;
pub mod active_filters;
pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod interactivity;
pub mod location;
pub mod logging;
pub mod model;
pub mod preview;
pub mod render;
