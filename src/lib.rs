//! # deepr
//!
//! A command-line client for an AI-assisted deep research report service.
//!
//! deepr submits research topics to a remote backend, follows each job
//! with a fixed-interval status poll until it completes or fails, fetches
//! the finished report, and exports it as a PDF. Sign-in (password or
//! browser OAuth) establishes a persistent session used by every request.
//!
//! ## Flow
//!
//! ```text
//! ┌────────┐    ┌──────────────┐    ┌──────────┐
//! │ submit │───▶│ status poll   │───▶│  report  │
//! │ topic  │    │ every 5s      │    │  fetch   │
//! └────────┘    │ until settled │    └────┬─────┘
//!               └──────────────┘         │
//!                                   ┌────▼─────┐
//!                                   │ display / │
//!                                   │ PDF save  │
//!                                   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! deepr login --email you@example.com
//! deepr new "the impact of climate change on ocean ecosystems" --watch
//! deepr history
//! deepr pdf <research-id>
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Wire types shared with the backend |
//! | [`error`] | Error taxonomy and body normalization |
//! | [`client`] | Typed HTTP client for the REST surface |
//! | [`session`] | Persistent credential state |
//! | [`poller`] | Status poll loop state machine |
//! | [`export`] | Single-flight PDF export |
//! | [`render`] | Terminal report/history formatting |
//! | [`oauth`] | Browser sign-in with a localhost callback |

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod models;
pub mod oauth;
pub mod poller;
pub mod render;
pub mod session;
pub mod show;
pub mod submit;
pub mod watch;
