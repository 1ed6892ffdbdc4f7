//! Core types and storage contracts for movierank.
//!
//! Everything in this crate is free of I/O: domain records, request and
//! response payloads, the pure mapper between them, and the repository trait
//! that storage backends implement.

pub mod movie;
pub mod storage;
