//! # NG12 CLI
//!
//! Terminal front end for the NG12 assessor client.
//!
//! The library half is shared by the `ng12` scripted binary and the interactive `ng12-run`
//! host:
//! - `display`: text rendering of patients, assessments, transcripts and citations
//! - `setup`: environment-driven configuration and tracing initialisation
//! - `interrupt`: Ctrl-C to cancel the outstanding request

#![warn(rust_2018_idioms)]

pub mod display;
pub mod interrupt;
pub mod setup;
