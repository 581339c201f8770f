// state elimination: automaton -> equivalent regular expression
//
// r[i][j] is the expression for going from i to j directly. eliminating k
// reroutes every path i -> k -> j through r[i][k] r[k][k]* r[k][j], until only
// the start and the final state are left.
//
// https://cs.stackexchange.com/questions/130529/complete-explanation-of-state-elimination-methods

use relang_re::Regex;

use super::{Automaton, FaError};

pub(crate) fn state_elimination<A: Automaton + ?Sized>(fa: &A) -> Result<Regex, FaError> {
    let finals: Vec<usize> = fa.accept_states().iter().collect();
    if finals.is_empty() {
        return Err(FaError::NoFinalState);
    }

    // index n is a fresh state when the finals have to be merged into one
    let n = fa.states().len();
    let size = if finals.len() > 1 { n + 1 } else { n };
    let mut r: Vec<Vec<Regex>> = vec![vec![Regex::EmptySet; size]; size];

    // parallel edges (and self loops) collapse into one union per pair
    for (from, label, to) in fa.transitions() {
        let label = match label {
            Some(symbol) => Regex::Symbol(symbol),
            None => Regex::EmptyString,
        };
        let (from, to) = (from.index(), to.index());
        let current = std::mem::replace(&mut r[from][to], Regex::EmptySet);
        r[from][to] = Regex::union(current, label);
    }

    let start = fa.start().index();
    let accept = if finals.len() > 1 {
        for &f in &finals {
            r[f][n] = Regex::EmptyString;
        }
        n
    } else {
        finals[0]
    };

    let mut remaining: Vec<usize> = (0..size).collect();
    let elimination_order: Vec<usize> = (0..size).filter(|&k| k != start && k != accept).collect();

    for k in elimination_order {
        remaining.retain(|&s| s != k);

        // row and column k are frozen before any entry of this pass changes
        let loop_star = Regex::kleene_star(r[k][k].clone());
        let into_k: Vec<Regex> = remaining.iter().map(|&i| r[i][k].clone()).collect();
        let out_of_k: Vec<Regex> = remaining.iter().map(|&j| r[k][j].clone()).collect();

        for (a, &i) in remaining.iter().enumerate() {
            // ∅ r[k][k]* r[k][j] = ∅ leaves the row unchanged
            if into_k[a] == Regex::EmptySet {
                continue;
            }
            let prefix = Regex::concat(into_k[a].clone(), loop_star.clone());

            for (b, &j) in remaining.iter().enumerate() {
                let path = Regex::concat(prefix.clone(), out_of_k[b].clone());
                let current = std::mem::replace(&mut r[i][j], Regex::EmptySet);
                r[i][j] = Regex::union(current, path);
            }
        }
    }

    let start_loop = r[start][start].clone();
    if start == accept {
        return Ok(Regex::kleene_star(start_loop));
    }

    // (loop | reach back)* reach, where reach = direct final_loop*
    // with no edges out of the final state this is loop* direct
    let reach = Regex::concat(
        r[start][accept].clone(),
        Regex::kleene_star(r[accept][accept].clone()),
    );
    let back = Regex::concat(reach.clone(), r[accept][start].clone());
    let cycle = Regex::union(start_loop, back);

    Ok(Regex::concat(Regex::kleene_star(cycle), reach))
}
