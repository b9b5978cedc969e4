// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Sans-IO navigation and flip-animation orchestration engine for flip
//! widgets.
//!
//! A flip widget holds an ordered set of candidate panels and transitions
//! between them with a flip-style rotation. The host (a DOM custom
//! element, a GUI toolkit, a TUI) owns the real scene graph; this crate
//! owns everything in between: resolving an arbitrary reference into a
//! candidate position, choosing the next candidate under a selection
//! policy, sequencing a navigation into one or many animation steps with
//! cancelable lifecycle checkpoints, and computing the directional
//! geometry each step needs to render.
//!
//! # Key entry points
//!
//! - [`engine::FlipEngine`] - the orchestration engine
//! - [`candidate::CandidateSet`] - the ordered candidate snapshot
//! - [`options::FlipOptions`] - host-facing configuration snapshot
//! - [`render::FlipRenderer`] - the host rendering capability
//! - [`events::FlipObserver`] - lifecycle notifications with veto
//!
//! # Architecture
//!
//! The engine is driven cooperatively: [`engine::FlipEngine::flip`]
//! starts a session and its first step, and the host advances it by
//! calling [`engine::FlipEngine::update`] each frame. A step's
//! transition-end is the first tick observed at or past the step's
//! duration; the next step never begins before the previous one
//! completes. The engine draws no pixels - it stages disposable face
//! clones through [`render::FlipRenderer`] and hands the host a
//! direction-tagged [`geometry::FlipGeometry`] payload.

pub mod animation;
pub mod candidate;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod options;
pub mod policy;
pub mod render;
pub mod select;
