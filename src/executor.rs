//! The executor loop: advances time, creates/destroys entities, drains due
//! events, invokes model transitions, and paces to wall clock when
//! configured.

use std::any::Any;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::{debug, error, trace};

use crate::catcher::{DefaultMessageCatcher, CATCHER_NAME};
use crate::config::{ExecutorConfig, SimMode};
use crate::coupling::{CouplingGraph, Destination, Source};
use crate::error::{ExecutorError, ExecutorResult};
use crate::io::{ExternalInputQueue, ExternalOutputQueue};
use crate::message::{Message, Payload, SourceTag};
use crate::model::BehaviorModel;
use crate::registry::EntityRegistry;
use crate::schedule::ScheduleQueue;
use crate::time::{Time, INFINITE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Terminated,
}

/// The discrete-event simulation engine: a priority-ordered event loop over
/// a dynamic population of [`BehaviorModel`]s, wired together by a
/// [`CouplingGraph`].
pub struct Executor {
    registry: EntityRegistry,
    schedule: ScheduleQueue,
    coupling: CouplingGraph,
    input_queue: ExternalInputQueue,
    output_queue: ExternalOutputQueue,
    input_ports: HashSet<String>,

    global_time: Time,
    target_time: Time,
    time_step: Time,
    sim_mode: SimMode,
    state: State,

    sim_init_time: chrono::DateTime<chrono::Local>,
    learning_module: Option<Box<dyn Any>>,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        let mut registry = EntityRegistry::new();
        let mut schedule = ScheduleQueue::new();
        registry.register(Box::new(DefaultMessageCatcher::new()));
        // Invariant 5: the catcher is active from time 0 onward, not merely
        // pending, so a run of duration 0 still has it in place.
        registry
            .promote_due(0.0, &mut schedule)
            .expect("the catcher alone can never collide with itself");

        Self {
            registry,
            schedule,
            coupling: CouplingGraph::new(),
            input_queue: ExternalInputQueue::new(),
            output_queue: ExternalOutputQueue::new(),
            input_ports: config.input_ports.into_iter().collect(),
            global_time: 0.0,
            target_time: 0.0,
            time_step: config.time_step,
            sim_mode: config.sim_mode,
            state: State::Idle,
            sim_init_time: chrono::Local::now(),
            learning_module: None,
        }
    }

    // ---- host-facing operations -----------------------------------------

    /// Pre-run (or mid-run) registration; the model becomes active once
    /// `global_time` reaches its `create_time`.
    pub fn register_entity(&mut self, model: Box<dyn BehaviorModel>) {
        self.registry.register(model);
    }

    /// Builds the coupling graph. `dst = None` routes to the external output
    /// queue.
    pub fn couple(
        &mut self,
        src: Source,
        out_port: impl Into<String>,
        dst: Option<&str>,
        in_port: impl Into<String>,
    ) {
        let destination = match dst {
            Some(name) => Destination::Model(name.to_string()),
            None => Destination::External,
        };
        self.coupling.couple(src, out_port, destination, in_port);
    }

    /// Enqueues an external input event. Validates `port` against the
    /// immutable set of declared executor input ports; an unknown port is
    /// reported, not silently dropped.
    ///
    /// If the simulator is already `Running`, the input queue is drained
    /// immediately (on this carrier) rather than waiting for the next tick.
    pub fn insert_external_event(
        &mut self,
        port: &str,
        payload: Payload,
        delay: Time,
    ) -> ExecutorResult<()> {
        if !self.input_ports.contains(port) {
            return Err(ExecutorError::UnknownPort(port.to_string()));
        }
        let message = Message::single(SourceTag::External, port, payload);
        self.input_queue.push(message, self.global_time + delay);
        if self.state != State::Idle {
            self.drain_external_input();
        }
        Ok(())
    }

    /// A cloneable, `Send + Sync` handle for pushing external events from
    /// another carrier. Pushing never drains; the executor's own carrier
    /// observes the push at the top of its next tick.
    pub fn external_input_handle(&self) -> ExternalInputQueue {
        self.input_queue.clone()
    }

    pub fn get_generated_event(&self) -> &[(Time, Message)] {
        self.output_queue.peek()
    }

    /// Atomically returns and clears the external output queue.
    pub fn drain_external_output(&mut self) -> Vec<(Time, Message)> {
        self.output_queue.drain()
    }

    /// Runs for `duration` virtual time units (`INFINITE` runs until
    /// natural termination). Sets `target_time`, calls `init_sim`, then ticks
    /// until either `global_time >= target_time` or the terminal condition
    /// fires.
    pub fn simulate(&mut self, duration: Time) -> ExecutorResult<()> {
        self.target_time = self.global_time + duration;
        self.init_sim()?;

        while self.global_time < self.target_time {
            if !self.registry.has_pending() {
                if let Some((_, req_time)) = self.schedule.peek_min() {
                    if req_time == INFINITE && self.sim_mode == SimMode::VirtualTime {
                        self.state = State::Terminated;
                        break;
                    }
                }
            }
            self.tick()?;
        }
        Ok(())
    }

    /// Resets all state to IDLE-equivalent initial conditions and
    /// re-inserts the catcher.
    pub fn simulation_stop(&mut self) {
        self.global_time = 0.0;
        self.target_time = 0.0;
        self.registry.reset();
        self.schedule = ScheduleQueue::new();
        self.coupling = CouplingGraph::new();
        self.input_queue.reset();
        self.output_queue = ExternalOutputQueue::new();
        self.state = State::Idle;
        self.sim_init_time = chrono::Local::now();

        self.registry.register(Box::new(DefaultMessageCatcher::new()));
        self.registry
            .promote_due(0.0, &mut self.schedule)
            .expect("the catcher alone can never collide with itself");
    }

    pub fn is_terminated(&self) -> bool {
        self.state == State::Terminated
    }

    pub fn global_time(&self) -> Time {
        self.global_time
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn set_learning_module(&mut self, module: Box<dyn Any>) {
        self.learning_module = Some(module);
    }

    pub fn get_learning_module(&self) -> Option<&(dyn Any)> {
        self.learning_module.as_deref()
    }

    pub fn get_learning_module_mut(&mut self) -> Option<&mut (dyn Any)> {
        self.learning_module.as_deref_mut()
    }

    pub fn active_model_names(&self) -> impl Iterator<Item = &str> {
        self.registry.active_names()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn coupling_graph(&self) -> &CouplingGraph {
        &self.coupling
    }

    pub fn declared_input_ports(&self) -> &HashSet<String> {
        &self.input_ports
    }

    /// Number of messages the always-present default catcher has absorbed.
    /// `None` only if the catcher has somehow been removed, which the
    /// executor itself never does.
    pub fn caught_by_default_catcher(&self) -> Option<usize> {
        self.registry
            .get(CATCHER_NAME)
            .and_then(|model| model.as_any().downcast_ref::<DefaultMessageCatcher>())
            .map(|catcher| catcher.caught_count())
    }

    // ---- internal tick machinery -----------------------------------------

    fn init_sim(&mut self) -> ExecutorResult<()> {
        self.state = State::Running;
        for name in self.registry.active_names().map(|n| n.to_string()).collect::<Vec<_>>() {
            let model = self.registry.get(&name).expect("name came from active_names");
            if model.time_advance() < 0.0 {
                error!("model '{}' returned a negative time_advance", name);
                self.state = State::Terminated;
                return Err(ExecutorError::ModelContractViolation(name));
            }
        }
        self.drain_external_input();
        Ok(())
    }

    /// One iteration of `schedule()`: create, ingest external, fire due,
    /// advance, pace, destroy.
    fn tick(&mut self) -> ExecutorResult<()> {
        debug!("tick start at global_time={}", self.global_time);
        let tick_started = Instant::now();

        // 1. Create.
        let promoted = self.registry.promote_due(self.global_time, &mut self.schedule)?;
        if !promoted.is_empty() {
            debug!("promoted {} model(s): {:?}", promoted.len(), promoted);
        }

        // 2. Ingest external.
        self.drain_external_input();

        // 3. Fire due.
        while let Some((_, req_time)) = self.schedule.peek_min() {
            if req_time > self.global_time {
                break;
            }
            let (name, _) = self.schedule.pop_min().expect("peek just confirmed an entry");
            self.fire(&name)?;
        }

        // 4. Advance.
        self.global_time += self.time_step;

        // 5. Pace.
        if self.sim_mode == SimMode::RealTime {
            let elapsed = tick_started.elapsed();
            let budget = Duration::from_secs_f64(self.time_step.max(0.0));
            if let Some(remainder) = budget.checked_sub(elapsed) {
                std::thread::sleep(remainder);
            }
        }

        // 6. Destroy.
        let destroyed = self
            .registry
            .destroy_due(self.global_time, &mut self.schedule, &mut self.coupling);
        if !destroyed.is_empty() {
            debug!("destroyed {} model(s): {:?}", destroyed.len(), destroyed);
        }

        Ok(())
    }

    /// Fires one due model: output -> route -> int_trans -> reschedule.
    fn fire(&mut self, name: &str) -> ExecutorResult<()> {
        let message = {
            let model = self
                .registry
                .get_mut(name)
                .ok_or_else(|| ExecutorError::ModelNotFound(name.to_string()))?;
            model.output()
        };
        if let Some(message) = message {
            self.route(Source::Model(name.to_string()), &message)?;
        }

        let next_req_time = {
            let model = self
                .registry
                .get_mut(name)
                .ok_or_else(|| ExecutorError::ModelNotFound(name.to_string()))?;
            model.int_trans();
            let delta = model.time_advance();
            if delta < 0.0 {
                return Err(ExecutorError::ModelContractViolation(name.to_string()));
            }
            self.global_time + delta
        };
        self.schedule.insert(name, next_req_time);
        Ok(())
    }

    /// Pops every input-queue entry due by `global_time` and routes each
    /// with the external source tag.
    fn drain_external_input(&mut self) {
        let due = self.input_queue.drain_due(self.global_time);
        for message in due {
            if let Err(err) = self.route(Source::External, &message) {
                error!("failed to route external event: {}", err);
            }
        }
    }

    /// Resolves `(src, message.port())` through the coupling graph and
    /// delivers to every destination in fan-out order.
    fn route(&mut self, src: Source, message: &Message) -> ExecutorResult<()> {
        let fanout = self.coupling.resolve(src, message.port()).to_vec();
        for (dst, in_port) in fanout {
            match dst {
                Destination::External => {
                    self.output_queue.push(self.global_time, message.clone());
                }
                Destination::Model(dst_name) => {
                    trace!("routing {:?} -> {}.{}", message.source(), dst_name, in_port);
                    let rebound = message.rebind_port(&in_port);
                    match self.registry.get_mut(&dst_name) {
                        Some(model) => model.ext_trans(&in_port, &rebound),
                        None => {
                            error!(
                                "coupling referenced unknown destination model '{}'",
                                dst_name
                            );
                            continue;
                        }
                    }
                    self.schedule.rekey(&dst_name, self.global_time);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catcher_is_active_immediately_on_construction() {
        let executor = Executor::new(ExecutorConfig::default());
        assert!(executor.active_model_names().any(|n| n == CATCHER_NAME));
    }

    #[test]
    fn unknown_input_port_is_reported_not_dropped() {
        let mut executor = Executor::new(ExecutorConfig::default());
        let err = executor
            .insert_external_event("nope", Payload::Null, 0.0)
            .unwrap_err();
        assert_eq!(err, ExecutorError::UnknownPort("nope".to_string()));
    }

    #[test]
    fn simulation_stop_resets_to_idle_with_catcher_reinstated() {
        let mut config = ExecutorConfig::default();
        config.input_ports = vec!["cmd".to_string()];
        let mut executor = Executor::new(config);
        executor.simulate(5.0).unwrap();
        executor.simulation_stop();
        assert_eq!(executor.state(), State::Idle);
        assert_eq!(executor.global_time(), 0.0);
        assert!(executor.active_model_names().any(|n| n == CATCHER_NAME));
    }

    #[test]
    fn virtual_time_terminates_when_all_models_are_infinite() {
        let mut executor = Executor::new(ExecutorConfig::default());
        executor.simulate(INFINITE).unwrap();
        assert!(executor.is_terminated());
    }
}
