//! Wallet session controller for the staking dashboard.
//!
//! Connects the user's wallet, binds the token and vault contracts to its
//! signer, and runs stake / unstake / claim as explicit step pipelines
//! against whatever `UiSurface` the host provides.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod session;
pub mod ui;

#[cfg(test)]
mod testkit;

pub use config::DashboardConfig;
pub use controller::DashboardController;
pub use error::ControllerError;
pub use events::DashboardEvent;
pub use pipeline::{ActionPhase, ActionPipeline, ActionStep};
pub use session::Session;
pub use ui::{Button, ButtonGuard, ButtonState, Label, Panel, UiSurface};
