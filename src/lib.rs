//! pulsetop: live terminal monitor for processes and Docker containers
//!
//! A `core::Collector` samples a `core::SubjectSource` on a fixed tick and
//! publishes aggregated snapshots on a single-slot bus; a consumer from `app`
//! reads them and renders through a `screens::RenderSink`. `core::serve`
//! runs the pair under one cancellation scope.

pub mod app;
pub mod cli;
pub mod core;
pub mod screens;
pub mod utils;
pub mod widgets;
