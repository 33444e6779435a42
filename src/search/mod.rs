//! In-memory search over the fetched comments: filtering, autocomplete,
//! pagination and the interaction state machine tying them together.

pub mod filter;
pub mod matching;
pub mod paginate;
pub mod session;
pub mod suggest;

#[cfg(test)]
pub mod testing;

pub use paginate::{page_window, PageItem};
pub use session::{Intent, Phase, Reaction, ResultPage, SearchSession};
