use crate::util::unicode::{next_boundary, prev_boundary, word_start_before};

/// A single text input with a byte-offset cursor kept on grapheme
/// boundaries. An optional cap (in chars) refuses input past the limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
    max_chars: Option<usize>,
}

impl TextField {
    pub fn new(initial: &str, max_chars: Option<usize>) -> Self {
        TextField {
            text: initial.to_string(),
            cursor: initial.len(),
            max_chars,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn max_chars(&self) -> Option<usize> {
        self.max_chars
    }

    /// Insert at the cursor. Returns false if the cap would be exceeded.
    pub fn insert_str(&mut self, s: &str) -> bool {
        if let Some(max) = self.max_chars
            && self.char_count() + s.chars().count() > max
        {
            return false;
        }
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        true
    }

    pub fn insert(&mut self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf))
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = next_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    /// Delete back to the start of the previous word.
    pub fn delete_word(&mut self) {
        let start = word_start_before(&self.text, self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn left(&mut self) {
        if let Some(prev) = prev_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = next_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_editing() {
        let mut f = TextField::new("", None);
        for c in "buy milk".chars() {
            f.insert(c);
        }
        f.left();
        f.left();
        f.left();
        f.left();
        f.insert_str("oat ");
        assert_eq!(f.text(), "buy oat milk");
        f.end();
        f.backspace();
        assert_eq!(f.text(), "buy oat mil");
        f.home();
        f.delete();
        assert_eq!(f.text(), "uy oat mil");
    }

    #[test]
    fn cursor_moves_over_whole_clusters() {
        let mut f = TextField::new("ae\u{301}", None);
        f.left();
        assert_eq!(f.cursor(), 1);
        f.backspace();
        assert_eq!(f.text(), "e\u{301}");
        f.right();
        assert_eq!(f.cursor(), f.text().len());
    }

    #[test]
    fn delete_word_removes_previous_word() {
        let mut f = TextField::new("call the dentist", None);
        f.delete_word();
        assert_eq!(f.text(), "call the ");
        f.delete_word();
        assert_eq!(f.text(), "call ");
    }

    #[test]
    fn cap_refuses_extra_input() {
        let mut f = TextField::new("abc", Some(4));
        assert!(f.insert('d'));
        assert!(!f.insert('e'));
        assert!(!f.insert_str("xy"));
        assert_eq!(f.text(), "abcd");
        assert_eq!(f.char_count(), 4);
    }
}
