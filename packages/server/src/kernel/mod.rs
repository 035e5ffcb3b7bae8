//! Kernel module - the scout service and its schedule.

pub mod scheduled_tasks;
pub mod scout;

pub use scheduled_tasks::{run_on_startup, start_scheduler};
pub use scout::{
    OverallStatus, Portal, PortalAnalysis, PortalStatus, Scope, ScoutError, ScoutService,
    Statistics, StatusSnapshot,
};
