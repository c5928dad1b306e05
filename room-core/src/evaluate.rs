use room_types::LetterStatus;

use crate::words::normalize;

/// Per-letter feedback for a guess against the hidden solution.
///
/// Standard two-pass duplicate-aware matching: exact positions are
/// consumed first, then each remaining guess letter may claim one
/// unconsumed solution letter. A letter is therefore never flagged
/// `Correct`/`Present` more times than it occurs in the solution.
/// Callers guarantee equal lengths.
pub fn evaluate_guess(guess: &str, solution: &str) -> Vec<LetterStatus> {
    let guess: Vec<char> = normalize(guess).chars().collect();
    let solution: Vec<char> = normalize(solution).chars().collect();
    debug_assert_eq!(guess.len(), solution.len());

    let mut feedback = vec![LetterStatus::Absent; guess.len()];
    let mut consumed = vec![false; solution.len()];

    // Pass 1: exact matches.
    for (i, &c) in guess.iter().enumerate() {
        if solution.get(i) == Some(&c) {
            feedback[i] = LetterStatus::Correct;
            consumed[i] = true;
        }
    }

    // Pass 2: misplaced letters, each consuming one occurrence.
    for (i, &c) in guess.iter().enumerate() {
        if feedback[i] == LetterStatus::Correct {
            continue;
        }
        if let Some(j) = solution
            .iter()
            .enumerate()
            .position(|(j, &s)| !consumed[j] && s == c)
        {
            feedback[i] = LetterStatus::Present;
            consumed[j] = true;
        }
    }

    feedback
}
