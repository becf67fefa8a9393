use automata::{save_dot, Automaton, StateId};
use clap::{Arg, ArgAction, Command};
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::{debug, info};

fn parse_state(value: &str) -> Result<StateId> {
    value
        .parse::<StateId>()
        .wrap_err_with(|| format!("Error: {} is not a valid state id", value))
}

fn parse_symbol(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(eyre!("Error: Symbol {:?} should be a single character", value)),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Command::new("automata")
        .version("0.1")
        .about("Build an NFA from explicit edges, optionally determinize it, and check which words it accepts")
        .arg(
            Arg::new("epsilon")
                .short('e')
                .long("epsilon")
                .value_name("CHAR")
                .help("Symbol reserved for epsilon edges")
                .default_value("#")
                .value_parser(clap::value_parser!(char)),
        )
        .arg(
            Arg::new("transition")
                .short('t')
                .long("transition")
                .value_names(["FROM", "SYMBOL", "TO"])
                .num_args(3)
                .action(ArgAction::Append)
                .help("Add an edge. Target ids which do not exist yet are created on first use"),
        )
        .arg(
            Arg::new("accept")
                .short('a')
                .long("accept")
                .value_name("STATE")
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(StateId))
                .help("Mark a state as accepting"),
        )
        .arg(
            Arg::new("eliminate")
                .short('E')
                .long("eliminate")
                .help("Eliminate epsilon edges before reading")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("determinize")
                .short('d')
                .long("determinize")
                .help("Convert the automaton into a DFA using Subset Construction before reading")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-dot")
                .short('s')
                .long("save-dot")
                .value_name("FILE STEM")
                .help("Save the final automaton as <FILE STEM>.dot, and as a jpg if Graphviz is installed"),
        )
        .arg(
            Arg::new("word")
                .value_name("WORD")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Words to read with the automaton"),
        )
        .get_matches();

    let epsilon = args.get_one::<char>("epsilon").copied().unwrap_or('#');
    let mut automaton = Automaton::new(epsilon);

    if let Some(values) = args.get_occurrences::<String>("transition") {
        for value_group in values {
            let value_vec: Vec<&String> = value_group.collect();
            let [from, symbol, to] = value_vec.as_slice() else {
                return Err(eyre!("Error: A transition needs FROM, SYMBOL and TO"));
            };
            automaton.add_edge(parse_state(from)?, parse_symbol(symbol)?, parse_state(to)?, false)?;
        }
    }

    if let Some(accepts) = args.get_many::<StateId>("accept") {
        for &state in accepts {
            if !automaton.is_terminal(state)? {
                automaton.toggle_terminal(state)?;
            }
        }
    }

    debug!(
        "Built automaton with {} states over {:?}",
        automaton.num_states(),
        automaton.alphabet()
    );

    if args.get_flag("determinize") {
        automaton.determinize();
        info!("Determinized into {} states", automaton.num_states());
    } else if args.get_flag("eliminate") {
        automaton.eliminate_epsilons();
        info!("Eliminated epsilon edges");
    }

    if !automaton.is_deterministic() {
        info!("Automaton is not deterministic, reads follow the first edge of each symbol");
    }

    if let Some(stem) = args.get_one::<String>("save-dot") {
        let path = save_dot(&automaton, stem)?;
        println!("Automaton saved as {}", path.display());
    }

    if let Some(words) = args.get_many::<String>("word") {
        for word in words {
            let verdict = if automaton.read_string(word) {
                "accepted"
            } else {
                "rejected"
            };
            println!("{}: {}", word, verdict);
        }
    }

    Ok(())
}
