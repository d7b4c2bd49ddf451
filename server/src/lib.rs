//! # Darksector Server
//!
//! Authoritative server for the darksector board game. It owns the only
//! trusted copy of every game's state; clients merely submit intents and
//! poll for what they are allowed to see.
//!
//! ## Architecture
//!
//! The server is split along the trust boundary:
//!
//! - **Network** (`network`): a UDP request/response loop. One datagram
//!   in, one datagram out; each request is served on its own task.
//! - **Registry** (`registry`): the set of live games. Every game is
//!   owned by a dedicated task and consumes its commands strictly in
//!   arrival order, so validation always sees a consistent state.
//!   Different games share nothing and run in parallel.
//! - **Game** (`game`): the rules. Turn order, role asymmetry, attacks,
//!   adrenaline, rescues. Movement legality is delegated to the shared
//!   [`shared::map::GameMap`] engine, which is immutable after
//!   construction and therefore safe to query from anywhere.
//! - **Maps** (`maps`): the built-in catalog of pre-built sector graphs.
//!
//! Clients learn about state changes exclusively by polling; the server
//! never pushes.

pub mod game;
pub mod maps;
pub mod network;
pub mod registry;
