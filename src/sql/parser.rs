//! Command parser
//!
//! Turns one line of shell input into a [`Command`]. The leading keyword
//! picks the command; its arguments are parsed with `nom` combinators.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till, take_while1},
    character::complete::{char, multispace0, multispace1, none_of},
    combinator::{all_consuming, opt, recognize, rest},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use super::ast::Command;
use super::clause::{parse_assignment_list, parse_where, WhereClause};
use crate::error::{Error, Result};

const CREATE_USAGE: &str = "create_table <name> <column:type> ...";
const INSERT_USAGE: &str = "insert into <table> values (<value>, ...)";
const SELECT_USAGE: &str = "select from <table> [where <column> = <value>]";
const UPDATE_USAGE: &str = "update <table> set <column> = <value>, ... where <column> = <value>";
const DELETE_USAGE: &str = "delete from <table> where <column> = <value>";

/// Parse a single command line
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (keyword, args) = match line.split_once(char::is_whitespace) {
        Some((keyword, args)) => (keyword, args.trim()),
        None => (line, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "" => Err(Error::Parse("empty command".to_string())),
        "create_table" => parse_create_table(args),
        "drop_table" => single_table(args, "drop_table <name>")
            .map(|table| Command::DropTable { table }),
        "list_tables" => no_args(args, Command::ListTables),
        "insert" => parse_insert(args),
        "select" => parse_select(args),
        "update" => parse_update(args),
        "delete" => parse_delete(args),
        "info" => single_table(args, "info <table>").map(|table| Command::Info { table }),
        "check" => single_table(args, "check <table>").map(|table| Command::Check { table }),
        "help" => no_args(args, Command::Help),
        "exit" | "quit" => no_args(args, Command::Exit),
        other => Err(Error::Parse(format!(
            "unknown command '{}', type 'help' for the list",
            other
        ))),
    }
}

/// Table and column names
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Anything up to the next whitespace
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// A quoted literal, quotes included
fn quoted(input: &str) -> IResult<&str, &str> {
    recognize(alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
    )))(input)
}

/// One raw insert value; commas and parentheses only count outside quotes
fn raw_value(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((quoted, recognize(none_of(",()\"'"))))))(input)
}

fn finish<O>(result: IResult<&str, O>, usage: &str) -> Result<O> {
    result
        .map(|(_, output)| output)
        .map_err(|_| Error::Parse(format!("usage: {}", usage)))
}

fn no_args(args: &str, command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(Error::Parse(format!(
            "'{}' takes no arguments",
            command.name()
        )))
    }
}

fn single_table(args: &str, usage: &str) -> Result<String> {
    finish(all_consuming(identifier)(args), usage).map(str::to_string)
}

fn where_clause(text: &str) -> Result<WhereClause> {
    parse_where(text).ok_or_else(|| {
        Error::Parse(format!(
            "invalid WHERE clause '{}', expected <column> = <value>",
            text
        ))
    })
}

/// Split `set-part where where-part` on the first standalone `where`.
fn split_where(text: &str) -> Option<(&str, &str)> {
    // ASCII lowercasing keeps byte offsets valid for `text`
    let lower = text.to_ascii_lowercase();
    let bounded = |c: Option<char>| c.map_or(false, char::is_whitespace);
    lower.match_indices("where").find_map(|(at, keyword)| {
        let end = at + keyword.len();
        let standalone =
            bounded(text[..at].chars().next_back()) && bounded(text[end..].chars().next());
        standalone.then(|| (text[..at].trim(), text[end..].trim()))
    })
}

fn parse_create_table(args: &str) -> Result<Command> {
    let (table, columns) = finish(
        all_consuming(pair(identifier, many0(preceded(multispace1, word))))(args),
        CREATE_USAGE,
    )?;
    Ok(Command::CreateTable {
        table: table.to_string(),
        columns: columns.into_iter().map(str::to_string).collect(),
    })
}

fn parse_insert(args: &str) -> Result<Command> {
    let (_, _, table, _, _, _, values) = finish(
        all_consuming(tuple((
            tag_no_case("into"),
            multispace1,
            identifier,
            multispace1,
            tag_no_case("values"),
            multispace0,
            delimited(char('('), separated_list0(char(','), raw_value), char(')')),
        )))(args),
        INSERT_USAGE,
    )?;

    let mut values: Vec<String> = values.into_iter().map(|v| v.trim().to_string()).collect();
    // `()` reads as a single empty value
    if values.len() == 1 && values[0].is_empty() {
        values.clear();
    }

    Ok(Command::Insert {
        table: table.to_string(),
        values,
    })
}

fn parse_select(args: &str) -> Result<Command> {
    let (_, _, table, filter) = finish(
        all_consuming(tuple((
            tag_no_case("from"),
            multispace1,
            identifier,
            opt(preceded(
                tuple((multispace1, tag_no_case("where"), multispace1)),
                rest,
            )),
        )))(args),
        SELECT_USAGE,
    )?;

    Ok(Command::Select {
        table: table.to_string(),
        filter: filter.map(where_clause).transpose()?,
    })
}

fn parse_update(args: &str) -> Result<Command> {
    let (table, _, _, _, body) = finish(
        all_consuming(tuple((
            identifier,
            multispace1,
            tag_no_case("set"),
            multispace1,
            rest,
        )))(args),
        UPDATE_USAGE,
    )?;

    let (set_text, where_text) = split_where(body)
        .ok_or_else(|| Error::Parse(format!("usage: {}", UPDATE_USAGE)))?;
    let assignments = parse_assignment_list(set_text);
    if assignments.is_empty() {
        return Err(Error::Parse(format!(
            "invalid SET clause '{}', expected <column> = <value>, ...",
            set_text
        )));
    }

    Ok(Command::Update {
        table: table.to_string(),
        assignments,
        filter: where_clause(where_text)?,
    })
}

fn parse_delete(args: &str) -> Result<Command> {
    let (_, _, table, _, _, _, where_text) = finish(
        all_consuming(tuple((
            tag_no_case("from"),
            multispace1,
            identifier,
            multispace1,
            tag_no_case("where"),
            multispace1,
            rest,
        )))(args),
        DELETE_USAGE,
    )?;

    Ok(Command::Delete {
        table: table.to_string(),
        filter: where_clause(where_text)?,
    })
}
