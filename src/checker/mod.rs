//! Pre-flight static validation of a built `Executor`: does the coupling
//! graph only reference models that exist or will exist, and are there
//! duplicate names across pending and active.
//!
//! `Checker::check` composes a handful of independent checks and bails on
//! the first failure.

use std::collections::HashSet;

use itertools::Itertools;

use crate::catcher::CATCHER_NAME;
use crate::executor::Executor;

pub trait Checker {
    fn unique_model_names(&self) -> Result<(), String>;
    fn couplings_reference_known_models(&self) -> Result<(), String>;
    fn check(&self) -> Result<(), String>;
}

impl Checker for Executor {
    fn check(&self) -> Result<(), String> {
        let checks = [
            self.unique_model_names(),
            self.couplings_reference_known_models(),
        ];
        checks.into_iter().try_for_each(|result| result)
    }

    fn unique_model_names(&self) -> Result<(), String> {
        let all_names: Vec<&str> = self
            .registry()
            .pending_names()
            .chain(self.registry().active_names())
            .collect();
        let dups: Vec<&str> = all_names.iter().copied().duplicates().collect();
        if dups.is_empty() {
            Ok(())
        } else {
            Err(format!("duplicate model names found: {}", dups.join(", ")))
        }
    }

    fn couplings_reference_known_models(&self) -> Result<(), String> {
        let known: HashSet<&str> = self
            .registry()
            .pending_names()
            .chain(self.registry().active_names())
            .chain(std::iter::once(CATCHER_NAME))
            .collect();
        let unknown: Vec<&str> = self
            .coupling_graph()
            .referenced_model_names()
            .filter(|name| !known.contains(name))
            .unique()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "coupling(s) reference unregistered model name(s): {}",
                unknown.join(", ")
            ))
        }
    }
}
