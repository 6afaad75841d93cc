//! `sysdevs` is a discrete-event simulation executor implementing the DEVS
//! abstract simulator contract: a population of port-coupled behavior
//! models advanced through virtual or real time by a single event loop.
//!
//! The crate is organized the way the simulation runs: [`model`] and
//! [`message`] define what a model and a message are; [`catcher`] is the
//! always-present sink; [`coupling`] wires models together; [`registry`] and
//! [`schedule`] hold the dynamic population and its firing order; [`io`] is
//! the boundary with the host; [`executor`] is the tick loop that ties all
//! of it together. [`config`] and [`error`] are the ambient construction and
//! failure-reporting surface; [`checker`] and [`report`] are pre-flight
//! validation and diagnostics.

pub mod catcher;
pub mod checker;
pub mod config;
pub mod coupling;
pub mod error;
pub mod executor;
pub mod io;
pub mod message;
pub mod model;
pub mod registry;
pub mod report;
pub mod schedule;
pub mod time;

pub use catcher::DefaultMessageCatcher;
pub use config::{ExecutorConfig, SimMode};
pub use coupling::{CouplingGraph, Destination, Source};
pub use error::{ExecutorError, ExecutorResult};
pub use executor::{Executor, State};
pub use io::{ExternalInputQueue, ExternalOutputQueue};
pub use message::{Message, Payload, SourceTag};
pub use model::BehaviorModel;
pub use time::{Time, INFINITE};
