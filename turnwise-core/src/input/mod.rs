//! Button input processing

pub mod debounce;

pub use debounce::{ButtonEvent, ButtonEventKind, InputDebouncer};
