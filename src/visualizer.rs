use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use color_eyre::eyre::{Result, WrapErr};
use log::{info, warn};
use petgraph::dot::Dot;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::prelude::StableGraph;

use crate::fa::FA;

fn generate_stable_graph<F: FA>(fa: &F) -> StableGraph<String, String> {
    let mut stable_graph: StableGraph<String, String> = StableGraph::new();

    let num_states = fa.get_num_states();
    let start_state = fa.get_start_state();
    let accept_states = fa.get_acceptor_states();
    let epsilon = fa.get_epsilon();

    let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

    // Add all nodes

    for state_idx in 0..num_states {
        let mut node_label = String::new();
        if state_idx == start_state {
            node_label.push_str("Start\n");
        }
        if accept_states[state_idx] {
            node_label.push_str("Accept\n");
        }
        node_label.push_str(&format!("State {}", state_idx));
        stable_graph.add_node(node_label);
    }

    // Add all edges, parallel edges share one label

    for state_idx in 0..num_states {
        for (symbol, target) in fa.get_state_transitions(state_idx) {
            let edge_label = if symbol == epsilon {
                "𝛆".to_string()
            } else {
                symbol.to_string()
            };

            let key = (NodeIndex::new(state_idx), NodeIndex::new(target));

            match edge_map.get(&key) {
                Some(&edge_idx) => {
                    let new_label = format!("{}, {}", stable_graph[edge_idx], edge_label);
                    stable_graph[edge_idx] = new_label;
                }
                None => {
                    let edge_idx = stable_graph.add_edge(key.0, key.1, edge_label);
                    edge_map.insert(key, edge_idx);
                }
            }
        }
    }

    stable_graph
}

/// Render the automaton in Graphviz DOT format.
pub fn to_dot<F: FA>(fa: &F) -> String {
    let stable_graph = generate_stable_graph(fa);
    Dot::new(&stable_graph).to_string()
}

/// Write the automaton to `<filename>.dot` and return that path. If Graphviz is installed the
/// graph is also rendered to `<filename>.jpg`.
pub fn save_dot<F: FA>(fa: &F, filename: &str) -> Result<PathBuf> {
    let dot_filename = PathBuf::from(format!("{}.dot", filename));

    let mut dot_file = File::create(&dot_filename)
        .wrap_err_with(|| format!("Failed to create {}", dot_filename.display()))?;
    dot_file
        .write_all(to_dot(fa).as_bytes())
        .wrap_err("Failed to write dot file")?;

    let jpg_filename = format!("{}.jpg", filename);
    let output = Command::new("dot")
        .arg("-Tjpg")
        .arg(&dot_filename)
        .args(["-o", &jpg_filename])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            info!("Automaton vizualization saved as {}", jpg_filename)
        }
        Ok(output) => warn!(
            "Graphviz failed to render {}: {}",
            dot_filename.display(),
            String::from_utf8_lossy(&output.stderr)
        ),
        Err(error) => warn!("Could not run Graphviz: {}", error),
    }

    Ok(dot_filename)
}
