//! The chat pipeline: everything between an applicant's question and the
//! grounded answer.
//!
//! Data flows through the submodules in order: the session's CV text is
//! reduced by [`summarizer`], retrieval hits are cleaned up by [`snippets`],
//! [`composer`] assembles the prompt from [`prompts`] templates, and
//! [`orchestrator`] drives one full turn. HTTP-facing request handling lives
//! in [`handlers`].

pub mod composer;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod snippets;
pub mod summarizer;

pub use orchestrator::run_turn;
pub use snippets::Snippet;
