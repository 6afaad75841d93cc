//! Graphviz DOT rendering of the coupling graph, for ambient debuggability:
//! models as boxed nodes, couplings as labeled edges, with the external
//! world as a single ellipse node.

use crate::catcher::CATCHER_NAME;
use crate::coupling::{Destination, Source};
use crate::executor::Executor;

pub trait Report {
    fn generate_dot_graph(&self) -> String;
}

impl Report for Executor {
    fn generate_dot_graph(&self) -> String {
        let mut dot = String::from("digraph DAG {\n");

        let known: Vec<String> = self
            .registry()
            .active_names()
            .chain(self.registry().pending_names())
            .map(|n| n.to_string())
            .collect();
        for name in &known {
            dot.push_str(&format!("  \"{}\" [shape=box];\n", name));
        }
        dot.push_str("  \"external\" [shape=ellipse];\n");

        for name in self.coupling_graph().referenced_model_names() {
            if name != CATCHER_NAME && !known.iter().any(|n| n == name) {
                dot.push_str(&format!("  \"{}\" [shape=box,style=dashed];\n", name));
            }
        }

        for ((src, out_port), fanout) in self.coupling_graph().raw_edges() {
            let src_label = match src {
                Source::Model(name) => name.as_str(),
                Source::External => "external",
            };
            for (dst, in_port) in fanout {
                let dst_label = match dst {
                    Destination::Model(name) => name.as_str(),
                    Destination::External => "external",
                };
                dot.push_str(&format!(
                    "  \"{}\" -> \"{}\" [label=\"{}/{}\"];\n",
                    src_label, dst_label, out_port, in_port
                ));
            }
        }

        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutorConfig;
    use crate::coupling::Source;
    use crate::message::Message;
    use crate::model::BehaviorModel;
    use crate::time::{Time, INFINITE};

    struct Stub(&'static str);
    impl BehaviorModel for Stub {
        fn name(&self) -> &str {
            self.0
        }
        fn create_time(&self) -> Time {
            0.0
        }
        fn destruct_time(&self) -> Time {
            INFINITE
        }
        fn input_ports(&self) -> &[String] {
            &[]
        }
        fn output_ports(&self) -> &[String] {
            &[]
        }
        fn time_advance(&self) -> Time {
            INFINITE
        }
        fn output(&mut self) -> Option<Message> {
            None
        }
        fn int_trans(&mut self) {}
        fn ext_trans(&mut self, _port: &str, _message: &Message) {}
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn renders_nodes_and_edges() {
        let mut executor = Executor::new(ExecutorConfig::default());
        executor.register_entity(Box::new(Stub("a")));
        executor.register_entity(Box::new(Stub("b")));
        executor.couple(Source::Model("a".into()), "out", Some("b"), "in");
        let dot = executor.generate_dot_graph();
        assert!(dot.starts_with("digraph DAG {"));
        assert!(dot.contains("\"a\" -> \"b\""));
    }

    #[test]
    fn dangling_coupling_renders_as_dashed_placeholder() {
        let mut executor = Executor::new(ExecutorConfig::default());
        executor.register_entity(Box::new(Stub("a")));
        executor.couple(Source::Model("a".into()), "out", Some("ghost"), "in");
        let dot = executor.generate_dot_graph();
        assert!(dot.contains("\"ghost\" [shape=box,style=dashed];"));
    }
}
