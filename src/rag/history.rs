//! Conversation history budgeting.
//!
//! History is unbounded; the prompt is not. The budgeter walks the history
//! newest-first, keeping turns while the running word count (including the
//! new question) stays within the budget, then restores oldest-first order
//! for presentation. When the budget is tight the most recent turns win.

use super::HistoryTurn;

/// Count words by whitespace splitting.
fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Select the suffix of `history` that fits the word budget.
///
/// Returns the kept turn texts oldest-first. The result is deterministic
/// and bounded regardless of history length; selection stops at the first
/// turn that would push the total past `max_words`.
pub fn budget_history(history: &[HistoryTurn], question: &str, max_words: usize) -> Vec<String> {
    let mut total = word_count(question);
    let mut kept: Vec<&str> = Vec::new();

    for turn in history.iter().rev() {
        let words = word_count(turn.text());
        if total + words > max_words {
            break;
        }
        total += words;
        kept.push(turn.text());
    }

    kept.reverse();
    kept.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn turn(text: &str) -> HistoryTurn {
        HistoryTurn(Value::Null, text.to_string())
    }

    #[test]
    fn test_tight_budget_keeps_only_newest() {
        // Three 5-word turns, a 3-word question, 12-word budget:
        // newest fits (5 + 3 = 8), adding the next would hit 13 > 12.
        let history = vec![
            turn("one two three four five"),
            turn("six seven eight nine ten"),
            turn("eleven twelve thirteen fourteen fifteen"),
        ];

        let kept = budget_history(&history, "what about this", 12);

        assert_eq!(kept, vec!["eleven twelve thirteen fourteen fifteen"]);
    }

    #[test]
    fn test_everything_fits_in_order() {
        let history = vec![turn("a b"), turn("c d"), turn("e f")];

        let kept = budget_history(&history, "q", 100);

        assert_eq!(kept, vec!["a b", "c d", "e f"]);
    }

    #[test]
    fn test_partial_keep_is_oldest_first() {
        let history = vec![turn("dropped dropped dropped"), turn("older kept"), turn("newest kept")];

        let kept = budget_history(&history, "one two", 6);

        // 2 (question) + 2 + 2 = 6, the three-word turn would overflow.
        assert_eq!(kept, vec!["older kept", "newest kept"]);
    }

    #[test]
    fn test_empty_history() {
        assert!(budget_history(&[], "question", 10).is_empty());
    }

    #[test]
    fn test_question_alone_exceeding_budget_keeps_nothing() {
        let history = vec![turn("short")];
        assert!(budget_history(&history, "a very long question here", 3).is_empty());
    }
}
