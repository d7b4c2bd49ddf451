//! # Darksector Client
//!
//! Client-side plumbing for the darksector board game. The client trusts
//! nothing it computes: it builds intents, sends them to the server and
//! polls for whatever state it is allowed to see.
//!
//! ## Module Organization
//!
//! - **Network** (`network`): typed request/response calls to the remote
//!   game service over UDP and bincode, with a bounded per-request
//!   timeout.
//! - **Sync** (`sync`): the polling loop. A timer-driven agent fetches
//!   the lobby list and hands rows across a channel; a separate one-shot
//!   refresh path appends instead of replacing. Failures are logged and
//!   skipped, never fatal.
//! - **Table** (`table`): the row store the presentation layer reads.
//!   Nothing in this crate renders; feeding a widget is someone else's
//!   job.
//! - **Intent** (`intent`): the vocabulary of user events and their
//!   translation into wire actions.

pub mod intent;
pub mod network;
pub mod sync;
pub mod table;
