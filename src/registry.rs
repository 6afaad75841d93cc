//! The entity registry: the two-phase lifecycle store. Models wait in
//! `pending`, keyed by creation time, until the tick's creation phase
//! promotes them into `active`, keyed by name; they are dropped from
//! `active` once the destruction phase observes `destruct_time <=
//! global_time`.

use std::collections::{BTreeMap, HashMap};

use crate::error::{ExecutorError, ExecutorResult};
use crate::model::BehaviorModel;
use crate::schedule::ScheduleQueue;
use crate::time::{Time, TimeKey};

#[derive(Default)]
pub struct EntityRegistry {
    pending: BTreeMap<TimeKey, Vec<Box<dyn BehaviorModel>>>,
    active: HashMap<String, Box<dyn BehaviorModel>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `model` to `pending[model.create_time()]`, in registration
    /// order.
    pub fn register(&mut self, model: Box<dyn BehaviorModel>) {
        self.pending
            .entry(TimeKey(model.create_time()))
            .or_default()
            .push(model);
    }

    /// For the minimum pending key `<= global_time`, moves its whole list
    /// into `active` (in registration order), sets each model's schedule
    /// entry to `global_time`, and repeats while the new minimum key is
    /// still due. Returns the names promoted, in order.
    pub fn promote_due(
        &mut self,
        global_time: Time,
        schedule: &mut ScheduleQueue,
    ) -> ExecutorResult<Vec<String>> {
        let mut promoted = Vec::new();
        loop {
            let due_key = match self.pending.keys().next().copied() {
                Some(key) if key.0 <= global_time => key,
                _ => break,
            };
            let batch = self.pending.remove(&due_key).unwrap();
            for model in batch {
                let name = model.name().to_string();
                if self.active.contains_key(&name) {
                    return Err(ExecutorError::DuplicateName(name));
                }
                schedule.insert(&name, global_time);
                self.active.insert(name.clone(), model);
                promoted.push(name);
            }
        }
        Ok(promoted)
    }

    /// Removes every active model with `destruct_time() <= global_time`,
    /// purging it from the schedule queue and the coupling graph too.
    /// Returns the names destroyed.
    pub fn destroy_due(
        &mut self,
        global_time: Time,
        schedule: &mut ScheduleQueue,
        coupling: &mut crate::coupling::CouplingGraph,
    ) -> Vec<String> {
        let due: Vec<String> = self
            .active
            .iter()
            .filter(|(_, model)| model.destruct_time() <= global_time)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &due {
            self.active.remove(name);
            schedule.remove(name);
            coupling.remove_owner(name);
        }
        due
    }

    pub fn get(&self, name: &str) -> Option<&dyn BehaviorModel> {
        self.active.get(name).map(|m| m.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn BehaviorModel + 'static)> {
        self.active.get_mut(name).map(|m| m.as_mut())
    }

    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(|s| s.as_str())
    }

    /// Names of every model still waiting to be promoted, across all
    /// pending creation times, in no particular order. Used by the checker
    /// for pre-flight duplicate-name detection, since two pending
    /// models sharing a name would otherwise only surface as a fatal error
    /// at promotion time.
    pub fn pending_names(&self) -> impl Iterator<Item = &str> {
        self.pending
            .values()
            .flat_map(|batch| batch.iter())
            .map(|m| m.name())
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Replaces all state with an empty registry, as `simulation_stop` does.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.active.clear();
    }
}
