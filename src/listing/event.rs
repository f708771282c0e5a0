//! Flat structural event stream over listing lines

use std::collections::VecDeque;

/// One structural event produced while scanning listing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEvent {
    /// A keyed line whose final token is `{`: a nested object opens.
    Enter { key: String },
    /// A plain `key value` line.
    Pair { key: String, value: String },
    /// The brace depth of the innermost open object returned to zero.
    Exit,
}

/// Splits listing text into [`ListingEvent`]s, one line at a time.
///
/// Each line's last whitespace-separated token is the value and the remaining
/// tokens, joined by single spaces, are the key. A value of exactly `{` opens
/// a nested object. Depth is tracked per open object by counting every brace
/// character on every line, starting from the opening line's own net count;
/// the object closes on the first line that brings its count to zero, and
/// that line's pair, if it has one, belongs to the closing object. Lines
/// without a key contribute only their braces, except that a keyless `{`
/// opens an anonymous block: the block is scanned for depth and everything
/// inside it is dropped without producing events.
///
/// Objects left open at end of input produce no synthetic [`Exit`] events;
/// the consumer decides what to do with the partial structure.
pub struct Tokenizer<'a> {
    lines: std::str::Lines<'a>,
    pending: VecDeque<ListingEvent>,
    scopes: Vec<OpenScope>,
}

/// Brace balance for one open `{`, plus whether the scope produces events.
/// Anonymous scopes come from keyless `{` lines and swallow their interior.
struct OpenScope {
    depth: i64,
    named: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            pending: VecDeque::new(),
            scopes: Vec::new(),
        }
    }

    fn scan_line(&mut self, line: &str) {
        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;
        let delta = opens - closes;

        for scope in &mut self.scopes {
            scope.depth += delta;
        }

        let muted = matches!(self.scopes.last(), Some(scope) if !scope.named);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Some((value, keys)) = tokens.split_last() {
            if *value == "{" {
                let named = !keys.is_empty() && !muted;
                if named {
                    self.pending.push_back(ListingEvent::Enter {
                        key: keys.join(" "),
                    });
                }
                self.scopes.push(OpenScope {
                    depth: delta,
                    named,
                });
            } else if !keys.is_empty() && !muted {
                self.pending.push_back(ListingEvent::Pair {
                    key: keys.join(" "),
                    value: (*value).to_string(),
                });
            }
        }

        while matches!(self.scopes.last(), Some(scope) if scope.depth <= 0) {
            if let Some(scope) = self.scopes.pop() {
                if scope.named {
                    self.pending.push_back(ListingEvent::Exit);
                }
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = ListingEvent;

    fn next(&mut self) -> Option<ListingEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let line = self.lines.next()?;
            self.scan_line(line);
        }
    }
}
