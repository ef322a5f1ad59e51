//! Turns one line of user input into a [`Command`].
//!
//! Grammar (keywords are lowercase):
//!
//! ```text
//! create_table <name> <col:type>...
//! drop_table <name>
//! list_tables
//! insert into <table> values (v1, v2, ...)
//! select from <table> [where col = val]
//! update <table> set col = val where col = val
//! delete from <table> where col = val
//! info <table>
//! help
//! exit
//! ```

use crate::{
    db::engine::{Assignment, Condition},
    error::{Error, Result},
};

/// One parsed user command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTable {
        name: String,
        columns: Vec<String>,
    },
    DropTable {
        name: String,
    },
    ListTables,
    Insert {
        table: String,
        values: Vec<String>,
    },
    Select {
        table: String,
        condition: Option<Condition>,
    },
    Update {
        table: String,
        assignment: Assignment,
        condition: Condition,
    },
    Delete {
        table: String,
        condition: Condition,
    },
    Info {
        table: String,
    },
    Help,
    Exit,
}

impl Command {
    /// Parses one input line
    pub fn parse(line: &str) -> Result<Self> {
        let tokens = tokenize(line);
        let mut tokens = Tokens::new(&tokens);

        let command = match tokens.next()?.as_str() {
            "create_table" => {
                let name = tokens.next_or("create_table expects a table name")?;
                let columns = tokens.rest();
                Command::CreateTable { name, columns }
            }
            "drop_table" => Command::DropTable {
                name: tokens.next_or("drop_table expects a table name")?,
            },
            "list_tables" => Command::ListTables,
            "insert" => {
                tokens.expect("into")?;
                let table = tokens.next_or("insert expects a table name")?;
                tokens.expect("values")?;
                let values = tokens.value_list()?;
                Command::Insert { table, values }
            }
            "select" => {
                tokens.expect("from")?;
                let table = tokens.next_or("select expects a table name")?;
                let condition = match tokens.peek() {
                    None => None,
                    Some("where") => {
                        tokens.expect("where")?;
                        Some(parse_condition(&tokens.rest())?)
                    }
                    Some(other) => {
                        return Err(Error::Validation(format!(
                            "unexpected token \"{}\" after select",
                            other
                        )));
                    }
                };
                Command::Select { table, condition }
            }
            "update" => {
                let table = tokens.next_or("update expects a table name")?;
                tokens.expect("set")?;
                let assignment = parse_assignment(&tokens.take(3)?)?;
                tokens.expect("where")?;
                let condition = parse_condition(&tokens.rest())?;
                Command::Update {
                    table,
                    assignment,
                    condition,
                }
            }
            "delete" => {
                tokens.expect("from")?;
                let table = tokens.next_or("delete expects a table name")?;
                tokens.expect("where")?;
                let condition = parse_condition(&tokens.rest())?;
                Command::Delete { table, condition }
            }
            "info" => Command::Info {
                table: tokens.next_or("info expects a table name")?,
            },
            "help" => Command::Help,
            "exit" => Command::Exit,
            other => {
                return Err(Error::Validation(format!("unknown command: {}", other)));
            }
        };

        match command {
            // Trailing tokens after a complete command are an error, except
            // for create_table which consumed the rest as column specs.
            Command::CreateTable { .. } | Command::Select { .. } => Ok(command),
            _ if !tokens.is_done() => Err(Error::Validation(format!(
                "unexpected trailing input: {}",
                tokens.rest().join(" ")
            ))),
            _ => Ok(command),
        }
    }

    /// True for operations the shell should confirm before executing
    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::DropTable { .. } | Command::Delete { .. })
    }

    /// Command keyword, as typed by the user
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateTable { .. } => "create_table",
            Command::DropTable { .. } => "drop_table",
            Command::ListTables => "list_tables",
            Command::Insert { .. } => "insert",
            Command::Select { .. } => "select",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Info { .. } => "info",
            Command::Help => "help",
            Command::Exit => "exit",
        }
    }
}

/// Parses a `col = val` WHERE clause (exactly three tokens)
fn parse_condition(tokens: &[String]) -> Result<Condition> {
    let (column, value) = parse_pair(tokens, "WHERE")?;
    Ok(Condition::new(column, value))
}

/// Parses a `col = val` SET clause (exactly three tokens)
fn parse_assignment(tokens: &[String]) -> Result<Assignment> {
    let (column, value) = parse_pair(tokens, "SET")?;
    Ok(Assignment::new(column, value))
}

fn parse_pair<'a>(tokens: &'a [String], clause: &str) -> Result<(&'a str, &'a str)> {
    match tokens {
        [column, eq, value] if eq == "=" => Ok((column, strip_quotes(value))),
        _ => Err(Error::Validation(format!(
            "malformed {} clause, expected: column = value",
            clause
        ))),
    }
}

/// Strips one pair of surrounding double quotes, if both are present
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Splits a line into word, quoted-string and punctuation tokens.
///
/// Quoted strings keep their quotes so the coercion layer can tell quoted
/// from bare text. `(`, `)`, `,` and `=` always stand alone.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' | '=' => {
                tokens.push(c.to_string());
                chars.next();
            }
            '"' => {
                chars.next();
                let mut token = String::from('"');
                for c in chars.by_ref() {
                    token.push(c);
                    if c == '"' {
                        break;
                    }
                }
                tokens.push(token);
            }
            _ => {
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | ',' | '=' | '"') {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
                tokens.push(token);
            }
        }
    }

    tokens
}

/// Cursor over the token list
struct Tokens<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|t| t.as_str())
    }

    fn next(&mut self) -> Result<String> {
        self.next_or("empty command")
    }

    fn next_or(&mut self, message: &str) -> Result<String> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(Error::Validation(message.to_string())),
        }
    }

    /// Consumes the given keyword or fails
    fn expect(&mut self, keyword: &str) -> Result<()> {
        match self.peek() {
            Some(token) if token == keyword => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(Error::Validation(format!("expected \"{}\"", keyword))),
        }
    }

    /// Takes exactly n tokens
    fn take(&mut self, n: usize) -> Result<Vec<String>> {
        if self.pos + n > self.tokens.len() {
            return Err(Error::Validation("unexpected end of command".to_string()));
        }
        let taken = self.tokens[self.pos..self.pos + n].to_vec();
        self.pos += n;
        Ok(taken)
    }

    /// Consumes all remaining tokens
    fn rest(&mut self) -> Vec<String> {
        let rest = self.tokens[self.pos..].to_vec();
        self.pos = self.tokens.len();
        rest
    }

    fn is_done(&self) -> bool {
        self.pos == self.tokens.len()
    }

    /// Parses a parenthesised comma-separated value list
    fn value_list(&mut self) -> Result<Vec<String>> {
        self.expect("(")
            .map_err(|_| Error::Validation("expected \"(\" after values".to_string()))?;

        let mut values = Vec::new();
        loop {
            match self.next_or("unterminated value list")?.as_str() {
                ")" if values.is_empty() => break,
                "," | ")" => {
                    return Err(Error::Validation(
                        "malformed value list, expected: (v1, v2, ...)".to_string(),
                    ));
                }
                value => values.push(value.to_string()),
            }
            match self.next_or("unterminated value list")?.as_str() {
                ")" => break,
                "," => {}
                other => {
                    return Err(Error::Validation(format!(
                        "expected \",\" or \")\" in value list, got \"{}\"",
                        other
                    )));
                }
            }
        }

        Ok(values)
    }
}
