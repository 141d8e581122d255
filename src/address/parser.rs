use super::AddressError;

const LOCAL: &str = "local part";
const DOMAIN: &str = "domain";
const QUOTED: &str = "quoted-string";

pub(crate) struct AddrSpec {
    pub local: String,
    pub domain: String,
}

pub(crate) struct Mailbox {
    pub spec: AddrSpec,
    pub display_name: Option<String>,
}

/// Cursor over a single RFC 5322 `mailbox` production.
pub(crate) struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// `mailbox = name-addr / addr-spec`. The bare addr-spec is tried first
    /// since its grammar is the narrower one.
    pub(crate) fn mailbox(&mut self) -> Result<Mailbox, AddressError> {
        let start = self.pos;
        let spec_err = match self.addr_spec() {
            Ok(spec) => {
                self.skip_ws();
                if self.is_eof() {
                    return Ok(Mailbox {
                        spec,
                        display_name: None,
                    });
                }
                return Err(self.trailing());
            }
            Err(AddressError::MissingAt) => AddressError::MissingAt,
            Err(err) => return Err(err),
        };

        self.pos = start;
        let display_name = self.phrase()?;
        self.skip_ws();
        if !self.eat('<') {
            return Err(match self.peek() {
                Some(':') => AddressError::AddressList,
                None => spec_err,
                Some(_) if display_name.is_empty() => spec_err,
                Some(_) => AddressError::NoAngleAddr,
            });
        }

        self.skip_ws();
        let spec = self.addr_spec()?;
        self.skip_ws();
        if !self.eat('>') {
            return Err(match self.peek() {
                Some('(') => AddressError::Comment,
                _ => AddressError::UnclosedAngleAddr,
            });
        }
        self.skip_ws();
        if !self.is_eof() {
            return Err(self.trailing());
        }

        Ok(Mailbox {
            spec,
            display_name: (!display_name.is_empty()).then_some(display_name),
        })
    }

    fn addr_spec(&mut self) -> Result<AddrSpec, AddressError> {
        let (local, quoted) = if self.peek() == Some('"') {
            (canonical_local(self.quoted_string()?), true)
        } else {
            (self.dot_atom_run().to_string(), false)
        };

        if !self.eat('@') {
            return Err(match self.peek() {
                Some('(') => AddressError::Comment,
                _ => AddressError::MissingAt,
            });
        }
        if local.is_empty() {
            return Err(AddressError::MissingLocalPart);
        }
        if !quoted {
            check_dots(&local, LOCAL)?;
        }

        let domain = match self.peek() {
            Some('[') => self.domain_literal()?,
            _ => {
                let run = self.dot_atom_run();
                if run.is_empty() {
                    return Err(AddressError::MissingDomain);
                }
                check_dots(run, DOMAIN)?;
                run.to_string()
            }
        };

        Ok(AddrSpec { local, domain })
    }

    fn phrase(&mut self) -> Result<String, AddressError> {
        let mut words = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('"') => words.push(self.quoted_string()?),
                Some('(') => return Err(AddressError::Comment),
                // obs-phrase lets dots through, as in "John Q. Public"
                Some(ch) if is_atext(ch) || ch == '.' => {
                    words.push(self.dot_atom_run().to_string())
                }
                _ => break,
            }
        }
        Ok(words.join(" "))
    }

    fn quoted_string(&mut self) -> Result<String, AddressError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(AddressError::UnclosedQuotedString),
                Some('"') => return Ok(out),
                // quoted-pair = "\" (VCHAR / WSP)
                Some('\\') => match self.bump() {
                    Some(ch) if is_vchar(ch) || is_wsp(ch) => out.push(ch),
                    Some(ch) => return Err(AddressError::invalid_char(QUOTED, ch)),
                    None => return Err(AddressError::UnclosedQuotedString),
                },
                Some(ch) if is_qtext(ch) || is_wsp(ch) => out.push(ch),
                Some(ch) => return Err(AddressError::invalid_char(QUOTED, ch)),
            }
        }
    }

    fn domain_literal(&mut self) -> Result<String, AddressError> {
        self.bump();
        let mut out = String::from("[");
        loop {
            match self.bump() {
                None => return Err(AddressError::UnclosedDomainLiteral),
                Some(']') => {
                    out.push(']');
                    return Ok(out);
                }
                Some(ch) if is_dtext(ch) || is_wsp(ch) => out.push(ch),
                Some(ch) => return Err(AddressError::invalid_char(DOMAIN, ch)),
            }
        }
    }

    fn dot_atom_run(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !(is_atext(ch) || ch == '.') {
                break;
            }
            self.pos += ch.len_utf8();
        }
        &self.input[start..self.pos]
    }

    fn trailing(&self) -> AddressError {
        match self.peek() {
            Some(',' | ';' | ':') => AddressError::AddressList,
            Some('(') => AddressError::Comment,
            _ => AddressError::TrailingData(self.rest().to_string()),
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(is_wsp) {
            self.bump();
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

/// atext from RFC 5322, widened with non-ASCII characters per RFC 6532.
pub(crate) fn is_atext(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
        || (!ch.is_ascii() && !ch.is_control() && !ch.is_whitespace())
}

fn is_dtext(ch: char) -> bool {
    ('!'..='Z').contains(&ch)
        || ('^'..='~').contains(&ch)
        || (!ch.is_ascii() && !ch.is_control() && !ch.is_whitespace())
}

/// Printable ASCII, or any non-control character outside ASCII.
fn is_vchar(ch: char) -> bool {
    ('!'..='~').contains(&ch) || (!ch.is_ascii() && !ch.is_control())
}

fn is_qtext(ch: char) -> bool {
    is_vchar(ch) && ch != '"' && ch != '\\'
}

fn is_wsp(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

fn check_dots(run: &str, part: &'static str) -> Result<(), AddressError> {
    if run.starts_with('.') || run.ends_with('.') || run.contains("..") {
        return Err(AddressError::misplaced_dot(part));
    }
    Ok(())
}

fn is_dot_atom(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|ch| is_atext(ch) || ch == '.')
        && check_dots(text, LOCAL).is_ok()
}

/// Quoted local parts that are plain dot-atoms lose their quotes; anything
/// else is re-quoted with `"` and `\` escaped.
fn canonical_local(content: String) -> String {
    if is_dot_atom(&content) {
        return content;
    }
    let mut out = String::with_capacity(content.len() + 2);
    out.push('"');
    for ch in content.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
