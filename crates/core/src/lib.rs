//! Live speech-to-text session control and transcript management.
//!
//! Speech recognition itself is delegated to a host-provided capability
//! behind the [`session::domain::recognizer::RecognitionSession`] trait;
//! this crate owns the session lifecycle, the accumulation of finalized
//! versus interim transcript text, and the clipboard / file-export paths.
//!
//! Each area is split into `domain` (traits and pure logic) and
//! `infrastructure` (adapters):
//!
//! - `transcript` — provider result events and the transcript buffer
//! - `session` — the session controller state machine and its collaborator
//!   boundaries (capability, microphone permission, view)
//! - `export` — clipboard and file-export boundaries

pub mod export;
pub mod session;
pub mod shared;
pub mod transcript;
