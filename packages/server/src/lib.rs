//! Madang: LAN chat and file-sharing hub.
//!
//! A single chat room with unique display names, a bounded chat history,
//! typing presence, transient notifications and a durable index of shared files.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
