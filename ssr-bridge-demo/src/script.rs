//! Line-based command scripts.
//!
//! ```text
//! # comment
//! init 2 {block_size=64, loudspeakers=4}
//! source_position [1 -1; 2 2] source_mute [false true]
//! out = process ones(64,2)
//! [bs] = block_size
//! ```

use anyhow::{Result, anyhow, bail};
use ssr_bridge::Sample;
use ssr_bridge::protocol::{Arg, Array};
use std::collections::BTreeMap;

/// One parsed line: the output names on the left of `=` and the arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub outputs: Vec<String>,
    pub args: Vec<Arg>,
}

/// Parse a script line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Call>> {
    let mut parser = Parser::new(line);
    parser.skip_space();
    if parser.at_end() {
        return Ok(None);
    }

    let outputs = parser.assignment().unwrap_or_default();
    let mut args = Vec::new();
    loop {
        parser.skip_space();
        if parser.at_end() {
            break;
        }
        args.push(parser.value()?);
    }
    if args.is_empty() && !outputs.is_empty() {
        bail!("missing command after '='");
    }
    Ok(Some(Call { outputs, args }))
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// Skip whitespace and a trailing `#` comment.
    fn skip_space(&mut self) {
        while let Some(c) = self.peek() {
            if c == '#' {
                self.pos = self.chars.len();
            } else if c.is_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, wanted: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => bail!("expected '{}', found '{}'", wanted, c),
            None => bail!("expected '{}', found end of line", wanted),
        }
    }

    fn identifier(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return None,
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    /// `[a, b] =` or `a =`. Rewinds and returns `None` if the line does not
    /// start with an assignment.
    fn assignment(&mut self) -> Option<Vec<String>> {
        let start = self.pos;
        let names = if self.peek() == Some('[') {
            self.pos += 1;
            let mut names = Vec::new();
            loop {
                self.skip_space();
                match self.peek() {
                    Some(']') => {
                        self.pos += 1;
                        break;
                    }
                    Some(',') => self.pos += 1,
                    _ => match self.identifier() {
                        Some(name) => names.push(name),
                        None => {
                            self.pos = start;
                            return None;
                        }
                    },
                }
            }
            names
        } else {
            match self.identifier() {
                Some(name) => vec![name],
                None => return None,
            }
        };

        self.skip_space();
        if self.peek() == Some('=') {
            self.pos += 1;
            Some(names)
        } else {
            self.pos = start;
            None
        }
    }

    fn value(&mut self) -> Result<Arg> {
        match self.peek() {
            Some('\'') | Some('"') => self.quoted().map(Arg::Text),
            Some('[') => self.matrix().map(Arg::Array),
            Some('{') => self.structure().map(Arg::Struct),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                Ok(Arg::Array(Array::scalar(self.number()?)))
            }
            Some(_) => {
                let word = self
                    .identifier()
                    .ok_or_else(|| anyhow!("unexpected character '{}'", self.chars[self.pos]))?;
                if self.peek() == Some('(') {
                    self.filled(&word).map(Arg::Array)
                } else {
                    Ok(Arg::Text(word))
                }
            }
            None => bail!("unexpected end of line"),
        }
    }

    fn quoted(&mut self) -> Result<String> {
        let quote = self.bump().ok_or_else(|| anyhow!("expected a quote"))?;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
                None => bail!("unterminated string"),
            }
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse()
            .map_err(|_| anyhow!("invalid number '{}'", text))
    }

    /// `[1 2; 3 4]` becomes a 2×2 double matrix, `[true false]` a logical
    /// row vector.
    fn matrix(&mut self) -> Result<Array> {
        self.expect('[')?;
        let mut rows: Vec<Vec<Element>> = vec![Vec::new()];
        loop {
            self.skip_space();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(';') => {
                    self.pos += 1;
                    rows.push(Vec::new());
                }
                Some(',') => self.pos += 1,
                Some(c) if c.is_ascii_alphabetic() => {
                    let word = self.identifier().unwrap_or_default();
                    let element = match word.as_str() {
                        "true" => Element::Logical(true),
                        "false" => Element::Logical(false),
                        other => bail!("unexpected '{}' in matrix", other),
                    };
                    push_element(&mut rows, element);
                }
                Some(_) => {
                    let value = self.number()?;
                    push_element(&mut rows, Element::Number(value));
                }
                None => bail!("unterminated matrix"),
            }
        }

        if rows.last().is_some_and(Vec::is_empty) && rows.len() > 1 {
            rows.pop();
        }
        build_matrix(rows)
    }

    /// `{key=value, ...}`; values may be quoted.
    fn structure(&mut self) -> Result<BTreeMap<String, String>> {
        self.expect('{')?;
        let mut fields = BTreeMap::new();
        loop {
            self.skip_space();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(fields);
                }
                Some(',') => self.pos += 1,
                Some(_) => {
                    let key = self
                        .identifier()
                        .ok_or_else(|| anyhow!("expected a field name"))?;
                    self.skip_space();
                    self.expect('=')?;
                    self.skip_space();
                    let value = if matches!(self.peek(), Some('\'') | Some('"')) {
                        self.quoted()?
                    } else {
                        let start = self.pos;
                        while matches!(self.peek(), Some(c) if c != ',' && c != '}') {
                            self.pos += 1;
                        }
                        self.chars[start..self.pos].iter().collect::<String>().trim().to_string()
                    };
                    fields.insert(key, value);
                }
                None => bail!("unterminated structure"),
            }
        }
    }

    /// `zeros(r,c)` and `ones(r,c)` in the compiled sample precision.
    fn filled(&mut self, function: &str) -> Result<Array> {
        let value: Sample = match function {
            "zeros" => 0.0,
            "ones" => 1.0,
            other => bail!("unknown function '{}'", other),
        };
        self.expect('(')?;
        self.skip_space();
        let rows = self.dimension()?;
        self.skip_space();
        self.expect(',')?;
        self.skip_space();
        let cols = self.dimension()?;
        self.skip_space();
        self.expect(')')?;
        Ok(Array::from_samples(rows, cols, vec![value; rows * cols])?)
    }

    fn dimension(&mut self) -> Result<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse()
            .map_err(|_| anyhow!("invalid dimension '{}'", text))
    }
}

#[derive(Debug, Clone, Copy)]
enum Element {
    Number(f64),
    Logical(bool),
}

fn push_element(rows: &mut [Vec<Element>], element: Element) {
    if let Some(row) = rows.last_mut() {
        row.push(element);
    }
}

fn build_matrix(rows: Vec<Vec<Element>>) -> Result<Array> {
    let elements: Vec<Element> = rows.iter().flatten().copied().collect();
    if elements.is_empty() {
        return Ok(Array::double(0, 0, Vec::new())?);
    }

    let all_logical = elements.iter().all(|e| matches!(e, Element::Logical(_)));
    if all_logical {
        let row_count = rows.len();
        let col_count = rows[0].len();
        if rows.iter().any(|r| r.len() != col_count) {
            bail!("all rows must have the same length");
        }
        let mut values = Vec::with_capacity(elements.len());
        for col in 0..col_count {
            for row in &rows {
                if let Element::Logical(b) = row[col] {
                    values.push(b);
                }
            }
        }
        return Ok(Array::logical(row_count, col_count, values)?);
    }

    let numbers = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|e| match e {
                    Element::Number(n) => Ok(*n),
                    Element::Logical(_) => Err(anyhow!("cannot mix logical and numeric values")),
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;
    Ok(Array::from_rows(&numbers)?)
}
