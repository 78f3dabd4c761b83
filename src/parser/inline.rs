//! Inline markup lexer.
//!
//! Delimiters toggle style flags rather than being matched in pairs. An
//! unmatched `*` therefore switches italic on for the rest of the input and
//! stays on: callers that lex several lines with one [`InlineState`] see the
//! open style carry into the next line.

use crate::model::InlineRun;

/// Style flags carried while lexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineState {
    /// Inside `**`/`__`
    pub bold: bool,
    /// Inside `*`/`_`
    pub italic: bool,
    /// Inside `~~`
    pub strikethrough: bool,
}

impl InlineState {
    /// Check if any delimiter is still open.
    pub fn is_open(&self) -> bool {
        self.bold || self.italic || self.strikethrough
    }

    fn run(&self, text: String) -> InlineRun {
        if self.strikethrough {
            InlineRun::Strikethrough(text)
        } else if self.bold && self.italic {
            InlineRun::BoldItalic(text)
        } else if self.bold {
            InlineRun::Bold(text)
        } else if self.italic {
            InlineRun::Italic(text)
        } else {
            InlineRun::Plain(text)
        }
    }
}

/// Lex a line of text into styled runs, starting with no style open.
pub fn lex(line: &str) -> Vec<InlineRun> {
    let mut state = InlineState::default();
    lex_with_state(line, &mut state)
}

/// Lex a line of text, continuing from (and updating) `state`.
pub fn lex_with_state(line: &str, state: &mut InlineState) -> Vec<InlineRun> {
    let chars: Vec<char> = line.chars().collect();
    let mut runs = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match c {
            '*' | '_' => {
                flush(&mut runs, &mut text, state);
                if next == Some(c) {
                    state.bold = !state.bold;
                    i += 2;
                } else {
                    state.italic = !state.italic;
                    i += 1;
                }
            }
            '~' if next == Some('~') => {
                flush(&mut runs, &mut text, state);
                state.strikethrough = !state.strikethrough;
                i += 2;
            }
            '`' => match find_char(&chars, i + 1, '`') {
                Some(end) => {
                    flush(&mut runs, &mut text, state);
                    let code: String = chars[i + 1..end].iter().collect();
                    if !code.is_empty() {
                        runs.push(InlineRun::Code(code));
                    }
                    i = end + 1;
                }
                None => {
                    text.push(c);
                    i += 1;
                }
            },
            '[' => match match_link(&chars, i) {
                Some((link_text, href, end)) => {
                    flush(&mut runs, &mut text, state);
                    if !link_text.is_empty() {
                        runs.push(InlineRun::Link {
                            text: link_text,
                            href,
                        });
                    }
                    i = end;
                }
                None => {
                    text.push(c);
                    i += 1;
                }
            },
            _ => {
                text.push(c);
                i += 1;
            }
        }
    }

    flush(&mut runs, &mut text, state);
    runs
}

fn flush(runs: &mut Vec<InlineRun>, text: &mut String, state: &InlineState) {
    if !text.is_empty() {
        runs.push(state.run(std::mem::take(text)));
    }
}

fn find_char(chars: &[char], from: usize, target: char) -> Option<usize> {
    chars
        .iter()
        .skip(from)
        .position(|&c| c == target)
        .map(|offset| from + offset)
}

/// Match `[text](href)` starting at `start`; returns text, href and the index after `)`.
fn match_link(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    let close = find_char(chars, start + 1, ']')?;
    if chars.get(close + 1) != Some(&'(') {
        return None;
    }
    let end = find_char(chars, close + 2, ')')?;
    let text: String = chars[start + 1..close].iter().collect();
    let href: String = chars[close + 2..end].iter().collect();
    if href.is_empty() {
        return None;
    }
    Some((text, href, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> InlineRun {
        InlineRun::Plain(s.to_string())
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(lex("just words"), vec![plain("just words")]);
        assert!(lex("").is_empty());
    }

    #[test]
    fn test_styles() {
        assert_eq!(
            lex("**bold** and *italic* and ~~gone~~"),
            vec![
                InlineRun::Bold("bold".to_string()),
                plain(" and "),
                InlineRun::Italic("italic".to_string()),
                plain(" and "),
                InlineRun::Strikethrough("gone".to_string()),
            ]
        );
    }

    #[test]
    fn test_underscore_delimiters() {
        assert_eq!(
            lex("__b__ _i_"),
            vec![
                InlineRun::Bold("b".to_string()),
                plain(" "),
                InlineRun::Italic("i".to_string()),
            ]
        );
    }

    #[test]
    fn test_bold_italic() {
        assert_eq!(
            lex("***both***"),
            vec![InlineRun::BoldItalic("both".to_string())]
        );
    }

    #[test]
    fn test_code_does_not_toggle() {
        assert_eq!(
            lex("run `a*b` now"),
            vec![
                plain("run "),
                InlineRun::Code("a*b".to_string()),
                plain(" now"),
            ]
        );
    }

    #[test]
    fn test_unclosed_backtick_is_literal() {
        assert_eq!(lex("a ` b"), vec![plain("a ` b")]);
    }

    #[test]
    fn test_link() {
        assert_eq!(
            lex("see [docs](https://example.com)."),
            vec![
                plain("see "),
                InlineRun::Link {
                    text: "docs".to_string(),
                    href: "https://example.com".to_string(),
                },
                plain("."),
            ]
        );
    }

    #[test]
    fn test_broken_link_degrades() {
        assert_eq!(lex("[not a link] (x)"), vec![plain("[not a link] (x)")]);
    }

    #[test]
    fn test_unmatched_delimiter_stays_open() {
        let mut state = InlineState::default();
        let first = lex_with_state("start *open", &mut state);
        assert_eq!(
            first,
            vec![plain("start "), InlineRun::Italic("open".to_string())]
        );
        assert!(state.is_open());

        let second = lex_with_state("still italic", &mut state);
        assert_eq!(second, vec![InlineRun::Italic("still italic".to_string())]);
    }
}
