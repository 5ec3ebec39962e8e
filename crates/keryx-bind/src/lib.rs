//! # Keryx Bind
//!
//! Resolution plans and the binding engine.
//!
//! Handlers declare their parameters once with a [`Signature`]. At
//! registration the signature is validated into a [`ResolutionPlan`] and
//! cached in the [`PlanRegistry`]. On every request the [`BindingEngine`]
//! runs the plan and hands the handler its [`Arguments`], or answers the
//! request itself with the first binding error.
//!
//! ```text
//! Signature ──build──▶ ResolutionPlan ──cache──▶ PlanRegistry
//!                                                    │
//! request ──▶ BoundHandler / BoundView ──resolve──▶ Arguments ──▶ handler
//!                    │
//!                    └── ExtractionError ──▶ 400 / 500 text response
//! ```
//!
//! Function handlers are wrapped by [`Binder::bind`]; class-style views by
//! [`Binder::view`], one plan per verb method.

#![doc(html_root_url = "https://docs.rs/keryx-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod arguments;
mod engine;
mod handler;
mod plan;
mod registry;
mod signature;
mod view;

pub use arguments::{ArgumentError, Arguments, FromBound};
pub use engine::BindingEngine;
pub use handler::{Binder, BoundHandler, Handler};
pub use plan::{PlannedParam, ResolutionPlan};
pub use registry::{HandlerId, PlanRegistry};
pub use signature::{IntoDescriptor, ParamSpec, Signature};
pub use view::{BoundView, View, ViewBinder};
