//! Voxnote - voice-note recorder with pluggable storage backends
//!
//! This crate provides the core functionality for capturing audio from the
//! microphone and managing the resulting voice notes: list, search, rename,
//! delete, and play back.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, SQLite, filesystem)
//! - **CLI**: Command-line interface and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
