pub mod config;
pub mod debounce;
pub mod error;
pub mod runtime;
pub mod source;
pub mod terminal;
pub mod ui;
pub mod view;
pub mod widget;

pub use config::AutocompleteConfig;
pub use debounce::Debouncer;
pub use error::{AutocompleteError, Result};
pub use runtime::{Exit, Runtime, Session};
pub use source::{HttpMatchSource, Match, MatchSource, StaticMatchSource};
pub use widget::Autocomplete;
