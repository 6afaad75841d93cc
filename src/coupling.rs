//! The coupling graph: (source, out-port) -> ordered fan-out list of
//! (destination, in-port). Resolution is total: an unmapped (src, port)
//! falls back to the catcher, and that fallback is memoized so repeated
//! resolutions are stable (needed so a second output on the same
//! never-coupled port doesn't re-synthesize a fresh fallback entry and
//! change `resolve`'s return identity).
//!
//! `Source::External` is the key used for couplings originating at a
//! recognized executor input port: a message carrying the external sentinel
//! "SRC" is routed the same way a model's own output would be.

use std::collections::HashMap;

use crate::catcher::{CATCHER_NAME, CATCHER_PORT};

/// Where a fan-out entry originates: a named model's out-port, or a
/// recognized executor input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Model(String),
    External,
}

/// Where a fan-out entry delivers to: a named model's in-port, or the
/// executor's external output queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Model(String),
    External,
}

type Edge = (Source, String);

#[derive(Default)]
pub struct CouplingGraph {
    edges: HashMap<Edge, Vec<(Destination, String)>>,
}

impl CouplingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the fan-out list for (src, out_port). No uniqueness
    /// check: duplicate couplings fan out duplicate deliveries, intentionally.
    pub fn couple(
        &mut self,
        src: Source,
        out_port: impl Into<String>,
        dst: Destination,
        in_port: impl Into<String>,
    ) {
        self.edges
            .entry((src, out_port.into()))
            .or_default()
            .push((dst, in_port.into()));
    }

    /// Resolves (src, out_port) to its fan-out list, materializing the
    /// catcher fallback on first resolution if no coupling exists.
    pub fn resolve(&mut self, src: Source, out_port: &str) -> &[(Destination, String)] {
        let key = (src, out_port.to_string());
        self.edges.entry(key).or_insert_with(|| {
            vec![(
                Destination::Model(CATCHER_NAME.to_string()),
                CATCHER_PORT.to_string(),
            )]
        })
    }

    /// Removes every coupling entry whose source is model `model`.
    pub fn remove_owner(&mut self, model: &str) {
        self.edges
            .retain(|(src, _), _| src != &Source::Model(model.to_string()));
    }

    /// Every edge in the graph, for diagnostics. Not used by the simulation
    /// loop itself, which goes through `resolve`.
    pub fn raw_edges(&self) -> impl Iterator<Item = (&Edge, &Vec<(Destination, String)>)> {
        self.edges.iter()
    }

    /// Every model name mentioned anywhere in the graph, as a source or as a
    /// destination. Used by the checker to confirm couplings only reference
    /// models that are (or will be) registered.
    pub fn referenced_model_names(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().flat_map(|((src, _), fanout)| {
            let src_name = match src {
                Source::Model(name) => Some(name.as_str()),
                Source::External => None,
            };
            src_name.into_iter().chain(fanout.iter().filter_map(|(dst, _)| match dst {
                Destination::Model(name) => Some(name.as_str()),
                Destination::External => None,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_resolves_to_catcher_and_is_stable() {
        let mut graph = CouplingGraph::new();
        let first = graph.resolve(Source::Model("gen".into()), "out").to_vec();
        assert_eq!(
            first,
            vec![(
                Destination::Model(CATCHER_NAME.to_string()),
                CATCHER_PORT.to_string()
            )]
        );
        // Second resolution returns the same memoized entry, not a fresh one.
        let second = graph.resolve(Source::Model("gen".into()), "out").to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_couplings_fan_out_duplicate_deliveries() {
        let mut graph = CouplingGraph::new();
        let src = Source::Model("gen".into());
        graph.couple(src.clone(), "out", Destination::Model("a".into()), "in");
        graph.couple(src.clone(), "out", Destination::Model("a".into()), "in");
        assert_eq!(graph.resolve(src, "out").len(), 2);
    }

    #[test]
    fn remove_owner_clears_only_its_entries() {
        let mut graph = CouplingGraph::new();
        graph.couple(
            Source::Model("gen".into()),
            "out",
            Destination::Model("a".into()),
            "in",
        );
        graph.couple(
            Source::Model("other".into()),
            "out",
            Destination::Model("b".into()),
            "in",
        );
        graph.remove_owner("gen");
        assert!(graph
            .edges
            .get(&(Source::Model("gen".to_string()), "out".to_string()))
            .is_none());
        assert!(graph
            .edges
            .get(&(Source::Model("other".to_string()), "out".to_string()))
            .is_some());
    }

    #[test]
    fn external_source_is_a_distinct_key_from_any_model() {
        let mut graph = CouplingGraph::new();
        graph.couple(
            Source::External,
            "cmd",
            Destination::Model("c".into()),
            "in",
        );
        let fanout = graph.resolve(Source::External, "cmd").to_vec();
        assert_eq!(fanout, vec![(Destination::Model("c".to_string()), "in".to_string())]);
        // A model named "cmd" on a port of its own does not collide.
        let other = graph.resolve(Source::Model("cmd".into()), "cmd").to_vec();
        assert_ne!(other, fanout);
    }

    #[test]
    fn fan_out_preserves_insertion_order() {
        let mut graph = CouplingGraph::new();
        let src = Source::Model("gen".into());
        graph.couple(src.clone(), "out", Destination::Model("a".into()), "in");
        graph.couple(src.clone(), "out", Destination::Model("b".into()), "in");
        graph.couple(src.clone(), "out", Destination::Model("c".into()), "in");
        let fanout = graph.resolve(src, "out");
        let names: Vec<&str> = fanout
            .iter()
            .map(|(dst, _)| match dst {
                Destination::Model(name) => name.as_str(),
                Destination::External => "external",
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
