use automata::{to_dot, Automaton};
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut automaton = Automaton::new('#');
    let start = automaton.initial_state_id();

    let middle = automaton.add_state(false);
    let accept = automaton.add_state(true);

    automaton.add_edge(start, 'a', start, false)?;
    automaton.add_edge(start, 'a', middle, false)?;
    automaton.add_edge(start, 'b', accept, false)?;
    automaton.add_edge(middle, 'a', middle, false)?;
    automaton.add_edge(middle, 'b', start, false)?;
    automaton.add_edge(middle, 'b', accept, false)?;
    automaton.add_edge(accept, 'a', accept, false)?;
    automaton.add_edge(accept, 'b', accept, false)?;

    println!("NFA has {} states", automaton.num_states());

    automaton.determinize();

    println!("DFA has {} states", automaton.num_states());
    for word in ["", "a", "b", "aab", "abab", "aaaa"] {
        let verdict = if automaton.read_string(word) {
            "accepted"
        } else {
            "rejected"
        };
        println!("{:?}: {}", word, verdict);
    }

    println!("{}", to_dot(&automaton));
    Ok(())
}
