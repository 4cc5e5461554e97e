// src/browse.rs
// =============================================================================
// Interactive paging/filtering on top of a DashboardSession.
//
// Each line typed on stdin is one command; after every command the current
// page is printed again. The session owns the page state, so a filter change
// automatically sends the user back to page 1.
// =============================================================================

use anyhow::Result;
use clap::ValueEnum;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::catalog::{DashboardSession, SortKey, VisibilityFilter};
use crate::render;

pub const HELP: &str = "\
Commands:
  n, next          next page
  p, prev          previous page
  f, first         first page
  l, last          last page
  g N, page N      jump to page N
  /TEXT            search name or description (a lone / clears the search)
  sort KEY         recently-updated | least-recently-updated | name-asc | name-desc
  vis KEY          all | public | private
  h, help          show this help
  q, quit          exit";

/// One thing the user can ask for at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    First,
    Last,
    /// Jump to a page (clamped by the session)
    GoTo(usize),
    /// New search text; empty clears the search
    Search(String),
    Sort(SortKey),
    Visibility(VisibilityFilter),
    Help,
    Quit,
}

// Parses one input line
//
// Returns Err with a short message for anything we don't understand.
pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();

    // "/text" is the only command without a keyword
    if let Some(query) = line.strip_prefix('/') {
        return Ok(BrowseCommand::Search(query.trim().to_string()));
    }

    // Split "sort name-asc" into the keyword and its argument
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    // Keywords are case-insensitive, like the sort/visibility values below
    match word.to_lowercase().as_str() {
        "n" | "next" => Ok(BrowseCommand::Next),
        "p" | "prev" | "previous" => Ok(BrowseCommand::Previous),
        "f" | "first" => Ok(BrowseCommand::First),
        "l" | "last" => Ok(BrowseCommand::Last),
        "g" | "page" => rest
            .parse()
            .map(BrowseCommand::GoTo)
            .map_err(|_| format!("'{rest}' is not a page number")),
        // Same names as the --sort / --visibility flags (ValueEnum parsing)
        "sort" => SortKey::from_str(rest, true).map(BrowseCommand::Sort),
        "vis" | "visibility" => VisibilityFilter::from_str(rest, true).map(BrowseCommand::Visibility),
        "h" | "help" | "?" => Ok(BrowseCommand::Help),
        "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{other}'")),
    }
}

// Applies a command to the session
//
// Returns false when the user asked to quit.
pub fn apply_command(session: &mut DashboardSession, command: BrowseCommand) -> bool {
    match command {
        BrowseCommand::Next => session.next_page(),
        BrowseCommand::Previous => session.previous_page(),
        BrowseCommand::First => session.first_page(),
        BrowseCommand::Last => session.last_page(),
        BrowseCommand::GoTo(page) => session.go_to_page(page),
        BrowseCommand::Search(query) => session.set_query(query),
        BrowseCommand::Sort(sort) => session.set_sort(sort),
        BrowseCommand::Visibility(visibility) => session.set_visibility(visibility),
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Quit => return false,
    }
    true
}

// Reads commands from stdin until "quit" or end of input
pub async fn run(mut session: DashboardSession) -> Result<()> {
    // Show the first screen before waiting for any input
    render::print_view(&session.view(), false)?;
    println!("\nType 'h' for help.");

    // Async line reader over stdin; next_line() yields None at end of input
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(command) => {
                // Help prints its own text; no need to repeat the page
                let redraw = !matches!(command, BrowseCommand::Help);
                if !apply_command(&mut session, command) {
                    break;
                }
                if redraw {
                    println!();
                    render::print_view(&session.view(), false)?;
                }
            }
            Err(message) => {
                // Bad input never ends the session, it just shows the help
                println!("⚠️  {message}");
                println!("{HELP}");
            }
        }
    }

    Ok(())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is parsing separate from applying?
//    - parse_command is a pure function: string in, command out
//    - That makes it trivial to test every spelling without a terminal
//
// 2. Why does apply_command return bool instead of exiting?
//    - The loop decides when to stop; the command just says "I'm done"
//    - run() then returns normally and main() picks the exit code
//
// 3. Why tokio's BufReader and not std::io::stdin().lines()?
//    - std's reader blocks the thread; inside an async runtime that stalls
//      every other task on it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("n", BrowseCommand::Next)]
    #[case("  NEXT ", BrowseCommand::Next)]
    #[case("p", BrowseCommand::Previous)]
    #[case("first", BrowseCommand::First)]
    #[case("l", BrowseCommand::Last)]
    #[case("g 3", BrowseCommand::GoTo(3))]
    #[case("page   12", BrowseCommand::GoTo(12))]
    #[case("/Stock", BrowseCommand::Search("Stock".to_string()))]
    #[case("/", BrowseCommand::Search(String::new()))]
    #[case("sort name-asc", BrowseCommand::Sort(SortKey::NameAsc))]
    #[case("sort Least-Recently-Updated", BrowseCommand::Sort(SortKey::LeastRecentlyUpdated))]
    #[case("vis private", BrowseCommand::Visibility(VisibilityFilter::Private))]
    #[case("?", BrowseCommand::Help)]
    #[case("q", BrowseCommand::Quit)]
    fn test_parse_command(#[case] line: &str, #[case] expected: BrowseCommand) {
        assert_eq!(parse_command(line), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("jump")]
    #[case("g two")]
    #[case("sort sideways")]
    #[case("vis hidden")]
    fn test_parse_command_rejects(#[case] line: &str) {
        assert!(parse_command(line).is_err());
    }

    #[test]
    fn test_quit_stops_and_search_resets_page() {
        use crate::enrich::EnrichedRecord;
        use crate::github::{RepositoryRecord, Visibility};
        use std::num::NonZeroUsize;

        let records = (0..12)
            .map(|i| {
                EnrichedRecord::unenriched(RepositoryRecord {
                    name: format!("repo-{i}"),
                    description: None,
                    url: String::new(),
                    visibility: Visibility::Public,
                    updated_at: String::new(),
                    is_fork: false,
                    default_branch: "main".to_string(),
                    created_at: None,
                    homepage: None,
                    topics: Vec::new(),
                    language: None,
                })
            })
            .collect();
        let mut session = DashboardSession::new(records, NonZeroUsize::new(5).unwrap());

        assert!(apply_command(&mut session, BrowseCommand::Last));
        assert_eq!(session.page_state().current(), 3);

        assert!(apply_command(&mut session, BrowseCommand::Search("repo".to_string())));
        assert_eq!(session.page_state().current(), 1);

        assert!(!apply_command(&mut session, BrowseCommand::Quit));
    }
}
