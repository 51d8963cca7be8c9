//! Runtime selection and dispatch of installed builds.

pub mod dispatch;
pub mod select;

pub use dispatch::{program_from_invocation, resolve};
pub use select::{select_program, SelectError, Selection, Selector, NOT_FOUND_EXIT_CODE};
