use relang::fa::TransitionDef;
use relang::{Acceptor, Automaton, Dfa, FADef, FaError, MealyMachine, Nfa, Regex, Targets};

// every string over `alphabet` of length at most `max_len`
fn strings_up_to(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = all.clone();
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|prefix| alphabet.iter().map(move |c| format!("{}{}", prefix, c)))
            .collect();
        all.extend(frontier.iter().cloned());
    }
    all
}

fn to_regex<A: Automaton>(fa: &A, quiet: bool) -> Regex {
    let re = fa.to_regex().expect("automaton has a final state");
    if !quiet {
        println!("regex = {}", re);
    }
    re
}

// the regex, compiled back into an automaton, must agree with `fa`
fn check_equivalent<A: Automaton + Acceptor>(fa: &A, max_len: usize, quiet: bool) -> Regex {
    let re = to_regex(fa, quiet);
    let nfa = Nfa::from_regex(&re, fa.alphabet());
    if !quiet {
        println!("nfa = {:?}", nfa);
    }

    let alphabet: Vec<char> = fa.alphabet().iter().collect();
    for input in strings_up_to(&alphabet, max_len) {
        let expected = fa.accepts(&input).expect("input drawn from the alphabet");
        let actual = nfa.accepts(&input).expect("input drawn from the alphabet");
        assert_eq!(
            actual, expected,
            "'{}' failed on input '{}', expect match: {}, actual match: {}",
            re, input, expected, actual
        );
    }
    re
}

#[test]
fn parity_dfa_to_regex() {
    let def = FADef::new(['a', 'b'])
        .edge("q00", 'a', "q10")
        .edge("q00", 'b', "q01")
        .edge("q01", 'a', "q11")
        .edge("q01", 'b', "q00")
        .edge("q10", 'a', "q00")
        .edge("q10", 'b', "q11")
        .edge("q11", 'a', "q01")
        .edge("q11", 'b', "q10")
        .start("q00")
        .finals(["q01"]);
    let dfa = Dfa::new(&def).unwrap();

    check_equivalent(&dfa, 6, false);
}

#[test]
fn epsilon_nfa_to_regex() {
    let def = FADef::new(['a', 'b'])
        .epsilon("q0", "q1")
        .edge("q0", 'a', "q0")
        .edge("q1", 'b', "q2")
        .epsilon("q2", "q0")
        .start("q0")
        .finals(["q2"]);
    let nfa = Nfa::new(&def).unwrap();

    check_equivalent(&nfa, 6, false);
}

#[test]
fn multiple_finals_to_regex() {
    let def = FADef::new(['0', '1'])
        .edge("q0", '0', "q1")
        .edge("q0", '1', "q2")
        .edge("q1", '0', "q0")
        .edge("q1", '1', "q1")
        .edge("q2", '0', "q2")
        .edge("q2", '1', "q0")
        .start("q0")
        .finals(["q1", "q2"]);
    let nfa = Nfa::new(&def).unwrap();

    let re = check_equivalent(&nfa, 6, false);
    assert!(!re.nullable());
}

#[test]
fn start_state_is_final() {
    // even number of a's
    let def = FADef::new(['a', 'b'])
        .edge("q0", 'a', "q1")
        .edge("q0", 'b', "q0")
        .edge("q1", 'a', "q0")
        .edge("q1", 'b', "q1")
        .start("q0")
        .finals(["q0"]);
    let dfa = Dfa::new(&def).unwrap();

    let re = check_equivalent(&dfa, 6, false);
    assert_eq!(re.to_string(), "(b|ab*a)*");
}

#[test]
fn final_state_with_outgoing_edges() {
    // a(ba)*, partial so simulated as an nfa
    let def = FADef::new(['a', 'b'])
        .edge("q0", 'a', "q1")
        .edge("q1", 'b', "q0")
        .start("q0")
        .finals(["q1"]);
    let nfa = Nfa::new(&def).unwrap();

    let re = check_equivalent(&nfa, 6, true);
    assert_eq!(re.to_string(), "(ab)*a");
}

#[test]
fn start_and_other_states_final() {
    let def = FADef::new(['a', 'b'])
        .edge("s", 'a', "p")
        .edge("p", 'b', "s")
        .edge("p", 'a', "r")
        .edge("r", 'a', "r")
        .start("s")
        .finals(["s", "r"]);
    let nfa = Nfa::new(&def).unwrap();

    let re = check_equivalent(&nfa, 6, true);
    assert!(re.nullable());
}

#[test]
fn subset_construction_round_trip() {
    let def = FADef::new(['a', 'b'])
        .edge("q0", 'a', ["q0", "q1"])
        .edge("q0", 'b', "q0")
        .edge("q1", 'b', "q2")
        .state("q2")
        .start("q0")
        .finals(["q2"]);
    let nfa = Nfa::new(&def).unwrap();
    let dfa = Dfa::from_nfa(&nfa);

    // strings ending in "ab"
    let from_nfa = check_equivalent(&nfa, 6, true);
    let from_dfa = check_equivalent(&dfa, 6, true);

    for input in strings_up_to(&['a', 'b'], 6) {
        assert_eq!(nfa.accepts(&input).unwrap(), input.ends_with("ab"), "input '{}'", input);
    }

    let from_nfa = Nfa::from_regex(&from_nfa, dfa.alphabet());
    let from_dfa = Nfa::from_regex(&from_dfa, dfa.alphabet());
    for input in strings_up_to(&['a', 'b'], 5) {
        assert_eq!(from_nfa.accepts(&input), from_dfa.accepts(&input), "input '{}'", input);
    }
}

#[test]
fn thompson_round_trip() {
    let re = Regex::concat(
        Regex::symbol('a'),
        Regex::kleene_star(Regex::union(Regex::symbol('b'), Regex::symbol('c'))),
    );
    assert_eq!(re.to_string(), "a(b|c)*");

    let nfa = Nfa::from_regex(&re, &"abc".chars().collect());
    check_equivalent(&nfa, 5, false);
}

#[test]
fn unreachable_final_gives_empty_set() {
    let def = FADef::new(['a'])
        .edge("q0", 'a', "q0")
        .state("q1")
        .start("q0")
        .finals(["q1"]);
    let dfa = Dfa::new(&def).unwrap();

    assert_eq!(dfa.to_regex(), Ok(Regex::EmptySet));
}

#[test]
fn no_final_state() {
    let dfa = Dfa::new(&FADef::new(['a']).edge("q0", 'a', "q0").start("q0")).unwrap();
    assert_eq!(dfa.to_regex(), Err(FaError::NoFinalState));

    let nfa = Nfa::new(&FADef::new(['a']).edge("q0", 'a', "q0").start("q0")).unwrap();
    assert_eq!(nfa.to_regex(), Err(FaError::NoFinalState));

    let mealy = MealyMachine::new(
        &FADef::new(['a']).edge("q0", 'a', "q0").start("q0").finals(["q0"]),
        [(("q0", 'a'), "out")],
    )
    .unwrap();
    assert_eq!(mealy.to_regex(), Err(FaError::NoFinalState));
}

#[test]
fn construction_data_as_plain_struct() {
    let def = FADef {
        alphabet: "ab".chars().collect(),
        states: vec!["q0".to_string(), "q1".to_string()],
        transitions: vec![
            TransitionDef {
                from: "q0".to_string(),
                symbol: Some('a'),
                to: Targets::Many(vec!["q0".to_string(), "q1".to_string()]),
            },
            TransitionDef {
                from: "q0".to_string(),
                symbol: Some('b'),
                to: Targets::One("q0".to_string()),
            },
            TransitionDef {
                from: "q1".to_string(),
                symbol: None,
                to: Targets::One("q0".to_string()),
            },
        ],
        start_state: "q0".to_string(),
        final_states: vec!["q1".to_string()],
    };
    let nfa = Nfa::new(&def).unwrap();

    assert_eq!(nfa.accepts("a"), Ok(true));
    assert_eq!(nfa.accepts("ab"), Ok(false));
    assert_eq!(nfa.accepts("ba"), Ok(true));
    check_equivalent(&nfa, 5, true);
}

#[test]
fn construction_data_from_json() {
    let json = r#"{
        "alphabet": ["a", "b"],
        "states": ["q0", "q1"],
        "transitions": [
            { "from": "q0", "symbol": "a", "to": ["q0", "q1"] },
            { "from": "q0", "symbol": "b", "to": "q0" },
            { "from": "q1", "symbol": null, "to": "q0" }
        ],
        "start_state": "q0",
        "final_states": ["q1"]
    }"#;

    let def: FADef = serde_json::from_str(json).unwrap();
    assert_eq!(def.transitions[0].to, Targets::Many(vec!["q0".to_string(), "q1".to_string()]));
    assert_eq!(def.transitions[1].to, Targets::One("q0".to_string()));
    assert_eq!(def.transitions[2].symbol, None);

    let nfa = Nfa::new(&def).unwrap();
    let test_vectors = [("", false), ("a", true), ("ab", false), ("ba", true), ("aba", true), ("bb", false)];
    for (input, expected) in test_vectors {
        assert_eq!(nfa.accepts(input), Ok(expected), "input '{}'", input);
    }

    // the builder writes the same shape back out
    let built = FADef::new(['a', 'b'])
        .edge("q0", 'a', ["q0", "q1"])
        .edge("q0", 'b', "q0")
        .epsilon("q1", "q0")
        .start("q0")
        .finals(["q1"]);
    let reread: FADef = serde_json::from_str(&serde_json::to_string(&built).unwrap()).unwrap();
    assert_eq!(reread, def);
}
