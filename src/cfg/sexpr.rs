//! Reader for the s-expression syntax of keymap files.
//!
//! Only lists and bare atoms exist. `;;` starts a comment that runs to the end of the line and
//! `#| ... |#` delimits a block comment.

use std::fmt;
use std::rc::Rc;

use super::error::{span_start_len, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file_name: Rc<str>,
    pub file_content: Rc<str>,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            file_name: Rc::from(""),
            file_content: Rc::from(""),
        }
    }
}

impl Span {
    fn new(start: usize, end: usize, file_name: &Rc<str>, file_content: &Rc<str>) -> Span {
        debug_assert!(start <= end);
        Span {
            start,
            end,
            file_name: file_name.clone(),
            file_content: file_content.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span containing both `self` and `other`. Both must come from the same file.
    pub fn cover(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            file_name: self.file_name.clone(),
            file_content: self.file_content.clone(),
        }
    }

    pub fn file_name(&self) -> String {
        self.file_name.to_string()
    }

    pub fn file_content(&self) -> String {
        self.file_content.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spanned<T> {
    pub t: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(t: T, span: Span) -> Spanned<T> {
        Spanned { t, span }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum SExpr {
    Atom(Spanned<String>),
    List(Spanned<Vec<SExpr>>),
}

impl SExpr {
    pub fn atom(&self) -> Option<&str> {
        match self {
            SExpr::Atom(a) => Some(a.t.as_str()),
            SExpr::List(_) => None,
        }
    }

    pub fn list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(l) => Some(&l.t),
            SExpr::Atom(_) => None,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            SExpr::Atom(a) => &a.span,
            SExpr::List(l) => &l.span,
        }
    }
}

impl fmt::Debug for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(a) => write!(f, "{}", a.t),
            SExpr::List(l) => {
                write!(f, "(")?;
                for (i, e) in l.t.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{e:?}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A top-level form: the items of one outermost list, with the span of the whole list.
pub type TopLevel = Spanned<Vec<SExpr>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Atom,
}

/// Error message with the byte range it applies to.
type LexError = (String, usize, usize);

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'(' | b')') || b.is_ascii_whitespace()
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.pos + ahead).copied()
    }

    fn skip_while(&mut self, f: impl Fn(u8) -> bool) {
        while let Some(b) = self.peek(0) {
            if !f(b) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Skip whitespace and comments in front of the next token.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => {
                    self.skip_while(|b| b.is_ascii_whitespace());
                }
                (Some(b';'), Some(b';')) => self.skip_while(|b| b != b'\n'),
                (Some(b'#'), Some(b'|')) => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match (self.peek(0), self.peek(1)) {
                            (Some(b'|'), Some(b'#')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => {
                                let msg = "Unterminated multiline comment. \
                                    Add |# after the end of your comment.";
                                return Err((msg.to_string(), start, start + 2));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Option<Result<(Token, usize, usize), LexError>> {
        if let Err(e) = self.skip_trivia() {
            return Some(Err(e));
        }
        let start = self.pos;
        let token = match self.peek(0)? {
            b'(' => {
                self.pos += 1;
                Token::Open
            }
            b')' => {
                self.pos += 1;
                Token::Close
            }
            _ => {
                self.skip_while(|b| !is_delimiter(b));
                Token::Atom
            }
        };
        Some(Ok((token, start, self.pos)))
    }
}

/// Parse `text` into its top-level forms. `file_name` only labels error reports.
pub fn parse(text: &str, file_name: &str) -> Result<Vec<TopLevel>, ParseError> {
    let file_name: Rc<str> = Rc::from(file_name);
    let file_content: Rc<str> = Rc::from(text);
    let to_error = |(msg, start, end): LexError| ParseError {
        err_span: Some(span_start_len(start, end - start)),
        help_msg: msg,
        file_name: Some(file_name.to_string()),
        file_content: Some(file_content.to_string()),
    };

    let mut lexer = Lexer::new(text);
    // Open lists, innermost last. Each entry carries the span of its opening parenthesis.
    let mut stack: Vec<Spanned<Vec<SExpr>>> = vec![];
    let mut top_level = vec![];
    while let Some(tok) = lexer.next_token() {
        let (token, start, end) = tok.map_err(&to_error)?;
        let span = Span::new(start, end, &file_name, &file_content);
        match token {
            Token::Open => stack.push(Spanned::new(vec![], span)),
            Token::Close => {
                let Some(list) = stack.pop() else {
                    return Err(to_error((
                        "Unexpected closing parenthesis".to_string(),
                        start,
                        end,
                    )));
                };
                let list = Spanned::new(list.t, list.span.cover(&span));
                match stack.last_mut() {
                    Some(parent) => parent.t.push(SExpr::List(list)),
                    None => top_level.push(list),
                }
            }
            Token::Atom => {
                let atom = SExpr::Atom(Spanned::new(text[start..end].to_string(), span));
                match stack.last_mut() {
                    Some(parent) => parent.t.push(atom),
                    None => {
                        return Err(to_error((
                            "Everything must be in a list".to_string(),
                            start,
                            end,
                        )))
                    }
                }
            }
        }
    }
    if let Some(unclosed) = stack.last() {
        return Err(to_error((
            "Unclosed opening parenthesis".to_string(),
            unclosed.span.start,
            unclosed.span.end,
        )));
    }
    Ok(top_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lists_and_comments() {
        let text = "
;; line comment
(defholdtap #| block
comment |# f (f lsft))";
        let forms = parse(text, "test").unwrap();
        assert_eq!(forms.len(), 1);
        let items = &forms[0].t;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].atom(), Some("defholdtap"));
        assert_eq!(items[1].atom(), Some("f"));
        assert_eq!(format!("{:?}", items[2]), "(f lsft)");
        assert_eq!(
            &text[forms[0].span.start..forms[0].span.end],
            "(defholdtap #| block\ncomment |# f (f lsft))"
        );
        let inner = items[2].span();
        assert_eq!(&text[inner.start..inner.end], "(f lsft)");
    }

    #[test]
    fn single_semicolon_is_part_of_atom() {
        let forms = parse("(a ;b)", "test").unwrap();
        assert_eq!(forms[0].t[1].atom(), Some(";b"));
    }

    #[test]
    fn syntax_errors() {
        for (text, msg) in [
            ("(a", "Unclosed opening parenthesis"),
            ("(a))", "Unexpected closing parenthesis"),
            ("a (b)", "Everything must be in a list"),
            ("(a) #| no end", "Unterminated multiline comment"),
        ] {
            let e = parse(text, "test").unwrap_err();
            assert!(e.help_msg.starts_with(msg), "{text}: {}", e.help_msg);
            assert!(e.err_span.is_some());
            assert_eq!(e.file_name.as_deref(), Some("test"));
        }
    }
}
