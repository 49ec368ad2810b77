#![doc(html_root_url = "https://docs.rs/nested-form-dom/0.0.1")]
#![warn(clippy::pedantic)]
//! A nested form controller for [`web_sys`].
//!
//! Host markup opts in with `data-controller="nested-form"` and designates a `target` container and a `template`.
//! Rows are stamped from the template on `nested-form#add` and discarded or flagged for deletion on `nested-form#remove`.
//!
//! See [`Application`] for the usual entry point and [`NestedFormController`] for the row lifecycle.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod action;
pub mod application;
pub mod binding;
pub mod controller;
mod error;
pub mod fragment;
pub mod options;
pub mod token;

pub use application::Application;
pub use controller::{NestedFormController, Removal};
pub use error::{Error, Result};
pub use options::NestedFormOptions;
pub use token::TokenSource;

/// The identifier this controller is registered under in `data-controller`, `data-action` and target attributes.
pub const IDENTIFIER: &str = "nested-form";

/// Dispatched (bubbling) from the controller element after a row was added.
pub const ADD_EVENT: &str = "nested-form:add";

/// Dispatched (bubbling) from the controller element after a row was removed or marked for destruction.
pub const REMOVE_EVENT: &str = "nested-form:remove";
