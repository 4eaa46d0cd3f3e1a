//! # Warden (console session gate)
//!
//! `warden` decides, for every navigation intent and every outbound API call of
//! the console client, whether the caller may proceed and how failures are
//! normalized.
//!
//! ## Session
//!
//! The session is two independent durable records, an opaque bearer credential
//! and a serialized identity, kept in a per-origin key-value store. A single
//! [`session::SessionManager`] is built at startup and shared by the navigation
//! guard and the HTTP pipeline. The session is written only by the login flow
//! and destroyed only by the pipeline when the API answers `401`.
//!
//! ## Navigation Guard
//!
//! Every route declares a [`guard::RouteRequirement`]. The guard runs an
//! ordered decision sequence: installation state (fail-open), credential
//! presence (fail-closed), super-admin role. The first redirect wins.
//!
//! ## HTTP Pipeline
//!
//! Outbound requests pass through ordered request stages (the credential is
//! attached as `Authorization: Bearer`). Responses are classified once: `401`
//! tears the session down and forces a hard navigation to `/login`, other
//! failures are reported through the single notification channel, and
//! successful envelopes are unwrapped to their payload.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod guard;
pub mod navigation;
pub mod session;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
