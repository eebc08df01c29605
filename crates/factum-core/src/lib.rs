//! Factum Core — immutable building blocks for event-sourced domain models.
//!
//! Domain state is never stored directly; it is reconstituted by replaying
//! an ordered, append-only log of [`event::Event`] facts into an
//! [`aggregate::Aggregate`]. The [`store::EventStore`] contract defines
//! version-checked persistence, and [`repository::Repository`] orchestrates
//! the two. This crate contains no infrastructure code; the reference
//! storage engine lives in `factum-event-store`.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
pub mod store;
