//! Final-response post-processing.
//!
//! The collaborator is told to return 2-3 short statements, but small
//! models leak numbering, bracketed labels, instructions, and trailing
//! questions. This pass strips all of that deterministically and
//! guarantees a non-empty, question-free, bounded result.

/// Maximum surviving lines joined into the final narrative.
const MAX_SENTENCES: usize = 3;

/// Anything shorter than this after cleanup triggers the fallback.
const MIN_FINAL_CHARS: usize = 15;

/// Clean raw collaborator output into the final narrative. Falls back to
/// a fixed template naming `top_hypothesis` when cleanup leaves too
/// little behind.
pub fn clean_final_response(raw: &str, top_hypothesis: &str) -> String {
    let mut cleaned: Vec<String> = Vec::new();

    for line in raw.lines() {
        let mut line = line.trim().to_string();

        // "[Sentence 1]: text" style labels: keep only what follows the
        // last colon.
        if line.contains('[') && line.contains(']') && line.contains(':') {
            if let Some(idx) = line.rfind(':') {
                if idx > 0 {
                    line = line[idx + 1..].trim().to_string();
                }
            }
        } else if starts_with_list_marker(&line) {
            line = line[2..].trim().to_string();
        }

        // Drop leaked instructions, bullets, and questions.
        if line.is_empty()
            || line.starts_with("Keep")
            || line.starts_with("Note")
            || line.starts_with('-')
            || line.ends_with('?')
        {
            continue;
        }

        cleaned.push(line);
    }

    let joined = cleaned
        .iter()
        .take(MAX_SENTENCES)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    if joined.len() < MIN_FINAL_CHARS {
        return fallback(top_hypothesis);
    }

    joined
}

/// `"1."` / `"2)"` etc. at line start.
fn starts_with_list_marker(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(first), Some(second)) if first.is_ascii_digit() && (second == '.' || second == ')')
    )
}

fn fallback(top_hypothesis: &str) -> String {
    format!(
        "Yeah, probably {top_hypothesis}. Check recent conditions. Consider professional help if it persists."
    )
}
