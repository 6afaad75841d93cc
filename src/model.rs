//! The behavior model contract: the capability set every simulated entity
//! implements. Concrete models are owned by the `EntityRegistry` and
//! referenced elsewhere (coupling graph, schedule queue) by their stable
//! `name`, never by pointer, since the coupling graph holds references to
//! models it does not own.

use std::any::Any;

use crate::message::Message;
use crate::time::Time;

/// A unit participating in the simulation: ports, a creation/destruction
/// window, and the four DEVS transition hooks.
///
/// `time_advance`, `output`, `int_trans`, and `ext_trans` are the user's
/// contract; the executor never calls anything else on a model to drive
/// simulation semantics. `as_any` is plumbing, not semantics: it bundles a
/// capability beyond the core transition functions onto the one object-safe
/// trait models are stored behind, for the rare host code that needs to
/// recover a concrete model (e.g. the default catcher's own test harness).
pub trait BehaviorModel: Any {
    /// Unique name across the active set.
    fn name(&self) -> &str;

    /// Virtual time at which this model is promoted from pending to active.
    fn create_time(&self) -> Time;

    /// Virtual time at or after which this model is removed. `INFINITE` if
    /// the model is never destroyed.
    fn destruct_time(&self) -> Time;

    fn input_ports(&self) -> &[String];

    fn output_ports(&self) -> &[String];

    /// Delay until this model's next internal event, from its current
    /// state. Must be `>= 0.0`; a negative value is a contract violation.
    fn time_advance(&self) -> Time;

    /// Snapshot of the output produced at the imminent internal event, or
    /// `None` if this firing produces no output.
    fn output(&mut self) -> Option<Message>;

    /// Advance internal state after this model's own scheduled event fires.
    fn int_trans(&mut self);

    /// Advance state in reaction to an external input arriving on `port`.
    fn ext_trans(&mut self, port: &str, message: &Message);

    /// Downcast support; implementations should simply return `self`.
    fn as_any(&self) -> &dyn Any;
}
