//! Streaming statement splitter.
//!
//! The splitter is a character-level state machine. It never looks ahead and
//! never fails: every character is appended to a buffer and the buffer is cut
//! whenever it ends with the current delimiter outside of a string literal.

use std::fmt;

/// The default statement terminator.
pub const DEFAULT_DELIMITER: &str = ";";

/// The directive keyword that redefines the delimiter.
const DELIMITER_KEYWORD: &str = "delimiter";

/// Callback invoked with every complete statement.
pub type StatementHandler = Box<dyn FnMut(String) + Send>;

/// The kind of string literal the cursor is inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `'...'`
    Single,
    /// `"..."`
    Double,
}

impl Quote {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            _ => None,
        }
    }
}

/// Mutable state of one splitter.
///
/// A fresh state is created for every file and is never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserState {
    /// Current statement terminator. Never empty.
    pub delimiter: String,
    /// Open string literal, if any.
    pub quote: Option<Quote>,
    /// Whether the previous character was an unescaped backslash.
    pub escaped: bool,
    /// Characters seen since the last boundary or delimiter change.
    pub buffer: String,
    /// Set between a `DELIMITER` keyword and the end of its line.
    pub seeking_delimiter: bool,
}

impl ParserState {
    /// Creates a state terminating statements with `delimiter`.
    ///
    /// An empty delimiter falls back to [`DEFAULT_DELIMITER`].
    #[must_use]
    pub fn new(delimiter: &str) -> Self {
        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };
        Self {
            delimiter: delimiter.to_string(),
            quote: None,
            escaped: false,
            buffer: String::new(),
            seeking_delimiter: false,
        }
    }

    /// Advances the state machine by one character.
    ///
    /// Returns the trimmed statement text when `c` completes a statement.
    pub fn advance(&mut self, c: char) -> Option<String> {
        // Escape tracking looks at the character before `c`.
        self.escaped = if self.buffer.ends_with('\\') {
            !self.escaped
        } else {
            false
        };

        self.buffer.push(c);

        if self.quote.is_none() && self.is_directive_keyword() {
            self.seeking_delimiter = true;
            self.buffer.clear();
            return None;
        }

        if self.seeking_delimiter {
            if c == '\n' || c == '\r' {
                let delimiter = self.buffer.trim();
                if !delimiter.is_empty() {
                    self.delimiter = delimiter.to_string();
                }
                self.seeking_delimiter = false;
                self.buffer.clear();
            }
            return None;
        }

        if !self.escaped {
            if let Some(quote) = Quote::from_char(c) {
                match self.quote {
                    Some(open) if open == quote => self.quote = None,
                    None => self.quote = Some(quote),
                    Some(_) => {}
                }
            }
        }

        if self.quote.is_none() && self.buffer.ends_with(self.delimiter.as_str()) {
            let end = self.buffer.len() - self.delimiter.len();
            let statement = self.buffer[..end].trim().to_string();
            self.buffer.clear();
            return Some(statement);
        }

        None
    }

    fn is_directive_keyword(&self) -> bool {
        let trimmed = self.buffer.trim();
        trimmed.len() == DELIMITER_KEYWORD.len() && trimmed.eq_ignore_ascii_case(DELIMITER_KEYWORD)
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

/// Splits a character stream into SQL statements.
///
/// # Example
///
/// ```rust
/// use oxide_dump_core::StatementSplitter;
///
/// let mut splitter = StatementSplitter::new();
/// let mut statements = Vec::new();
/// for c in "INSERT INTO t VALUES('a;b'); SELECT 1;".chars() {
///     if let Some(statement) = splitter.feed_char(c) {
///         statements.push(statement);
///     }
/// }
/// assert_eq!(statements, ["INSERT INTO t VALUES('a;b')", "SELECT 1"]);
/// ```
#[derive(Default)]
pub struct StatementSplitter {
    state: ParserState,
    handler: Option<StatementHandler>,
}

impl StatementSplitter {
    /// Creates a splitter using the `;` delimiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a splitter starting with a custom delimiter.
    #[must_use]
    pub fn with_delimiter(delimiter: &str) -> Self {
        Self {
            state: ParserState::new(delimiter),
            handler: None,
        }
    }

    /// Registers the handler called synchronously for every statement.
    ///
    /// Replaces any previously registered handler.
    pub fn on_statement<F>(&mut self, handler: F)
    where
        F: FnMut(String) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Feeds one character.
    ///
    /// Empty statements (e.g. `;;`) are emitted as well; callers decide
    /// whether to run them.
    pub fn feed_char(&mut self, c: char) -> Option<String> {
        let statement = self.state.advance(c)?;
        if let Some(handler) = self.handler.as_mut() {
            handler(statement.clone());
        }
        Some(statement)
    }

    /// Feeds every character of `input`, in order.
    pub fn feed_str(&mut self, input: &str) {
        for c in input.chars() {
            self.feed_char(c);
        }
    }

    /// The current delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.state.delimiter
    }

    /// The string literal the cursor is inside of.
    #[must_use]
    pub const fn quote(&self) -> Option<Quote> {
        self.state.quote
    }

    /// Whether a `DELIMITER` directive line is being read.
    #[must_use]
    pub const fn is_seeking_delimiter(&self) -> bool {
        self.state.seeking_delimiter
    }

    /// Buffered text not yet terminated by a delimiter.
    ///
    /// Whatever is left here at end of input is never emitted.
    #[must_use]
    pub fn residual(&self) -> &str {
        &self.state.buffer
    }

    /// Read access to the full parser state.
    #[must_use]
    pub const fn state(&self) -> &ParserState {
        &self.state
    }
}

impl fmt::Debug for StatementSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementSplitter")
            .field("state", &self.state)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Splits a complete input into statements.
#[must_use]
pub fn split(input: &str) -> Vec<String> {
    let mut state = ParserState::default();
    input.chars().filter_map(|c| state.advance(c)).collect()
}
