//! Input reader and solution printer.
//!
//! Out of scope per spec.md section 1, reimplemented minimally so the
//! binary runs end to end. Grounded on `input_data_read`/`solution_print`
//! from `examples/original_source/sk459204/parallel/main.c`.

use std::io::{BufRead, Write};

use crate::error::EngineError;
use crate::solution::Solution;

/// A parsed problem instance: worker count, bound, and the two seed
/// element lists (before folding through `Sumset::seeded`).
pub struct Instance {
    pub t: usize,
    pub d: usize,
    pub a_seed: Vec<usize>,
    pub b_seed: Vec<usize>,
}

/// Parses the line-oriented format from spec.md section 6: `t d` on
/// line 1, then two zero-terminated seed element lists.
pub fn read_input(r: impl BufRead) -> Result<Instance, EngineError> {
    let mut lines = r.lines();

    let header = next_nonblank(&mut lines)?;
    let mut header_tokens = header.split_whitespace();
    let t = parse_token(header_tokens.next(), "t")?;
    let d = parse_token(header_tokens.next(), "d")?;

    let a_seed = read_zero_terminated_line(&mut lines)?;
    let b_seed = read_zero_terminated_line(&mut lines)?;

    for &e in a_seed.iter().chain(b_seed.iter()) {
        if e > d {
            return Err(EngineError::Input(format!("seed element {e} exceeds bound d={d}")));
        }
    }

    Ok(Instance { t, d, a_seed, b_seed })
}

fn next_nonblank(lines: &mut std::io::Lines<impl BufRead>) -> Result<String, EngineError> {
    loop {
        let line = lines
            .next()
            .ok_or_else(|| EngineError::Input("unexpected end of input".into()))?
            .map_err(|e| EngineError::Input(e.to_string()))?;
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
}

fn parse_token(token: Option<&str>, name: &str) -> Result<usize, EngineError> {
    token
        .ok_or_else(|| EngineError::Input(format!("missing {name} in header line")))?
        .parse::<usize>()
        .map_err(|e| EngineError::Input(format!("invalid {name}: {e}")))
}

fn read_zero_terminated_line(lines: &mut std::io::Lines<impl BufRead>) -> Result<Vec<usize>, EngineError> {
    let line = next_nonblank(lines)?;
    let mut elements = Vec::new();
    for token in line.split_whitespace() {
        let value: usize = token
            .parse()
            .map_err(|e| EngineError::Input(format!("invalid seed element {token:?}: {e}")))?;
        if value == 0 {
            return Ok(elements);
        }
        elements.push(value);
    }
    Err(EngineError::Input("seed line missing zero terminator".into()))
}

/// Renders the best solution: sum, then `A`'s elements, then `B`'s,
/// one per line. Stable across runs for fixed input.
pub fn print_solution(mut w: impl Write, solution: &Solution) -> std::io::Result<()> {
    writeln!(w, "{}", solution.sum())?;
    writeln!(w, "{}", join(solution.a_elements()))?;
    writeln!(w, "{}", join(solution.b_elements()))?;
    Ok(())
}

fn join(elements: &[usize]) -> String {
    elements.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_and_zero_terminated_seeds() {
        let input = "1 8\n0\n1 0\n";
        let instance = read_input(input.as_bytes()).unwrap();
        assert_eq!(instance.t, 1);
        assert_eq!(instance.d, 8);
        assert_eq!(instance.a_seed, Vec::<usize>::new());
        assert_eq!(instance.b_seed, vec![1]);
    }

    #[test]
    fn rejects_seed_elements_beyond_bound() {
        let input = "1 4\n5 0\n0\n";
        assert!(read_input(input.as_bytes()).is_err());
    }

    #[test]
    fn print_solution_renders_sum_then_both_element_lists() {
        let mut solution = Solution::none();
        solution.offer(31, vec![2, 4, 1], vec![1, 8, 6, 5]);
        let mut out = Vec::new();
        print_solution(&mut out, &solution).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "31\n2 4 1\n1 8 6 5\n");
    }
}
