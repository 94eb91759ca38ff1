/// Number of ruled lines a note is rendered into.
pub const NOTE_LINES: usize = 3;

/// A space this close to the limit ends the line early.
const WORD_BREAK_WINDOW: usize = 10;

/// Wrap note text into exactly three display lines of at most
/// `max_chars_per_line` characters.
///
/// Greedy and paragraph-aware: each `\n`-separated paragraph starts a new
/// line. A line is cut when it reaches the limit, or earlier at a space that
/// falls within the last ten characters of the limit. Cut lines are trimmed.
/// Text beyond the third line is dropped from the display; short input is
/// padded with empty lines.
pub fn wrap_to_lines(text: &str, max_chars_per_line: usize) -> [String; NOTE_LINES] {
    let soft_limit = max_chars_per_line.saturating_sub(WORD_BREAK_WINDOW);
    let mut lines: Vec<String> = Vec::with_capacity(NOTE_LINES);

    for paragraph in text.split('\n') {
        if lines.len() >= NOTE_LINES {
            break;
        }

        let mut current = String::new();
        let mut current_len = 0usize;

        for c in paragraph.chars() {
            if lines.len() >= NOTE_LINES {
                break;
            }
            current.push(c);
            current_len += 1;

            if current_len >= max_chars_per_line || (c == ' ' && current_len >= soft_limit) {
                lines.push(current.trim().to_string());
                current.clear();
                current_len = 0;
            }
        }

        let rest = current.trim();
        if !rest.is_empty() && lines.len() < NOTE_LINES {
            lines.push(rest.to_string());
        }
    }

    let mut out: [String; NOTE_LINES] = Default::default();
    for (slot, line) in out.iter_mut().zip(lines) {
        *slot = line;
    }
    out
}
