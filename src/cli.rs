//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// Save, list and delete articles from The Hacker News homepage.
///
/// ```sh
/// hn-tracker --new          # show the latest homepage articles
/// hn-tracker --add 2 4      # store articles #2 and #4 of that listing
/// hn-tracker --list         # show stored articles
/// hn-tracker --del 1        # delete stored article #1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("mode").args(["new", "list", "add", "delete"])))]
pub struct Cli {
    /// Display the latest articles from the homepage
    #[arg(short, long)]
    pub new: bool,

    /// List the articles stored in the database
    #[arg(short, long)]
    pub list: bool,

    /// Add article(s) from the latest homepage listing to the database
    #[arg(short, long, value_name = "ID", num_args = 1.., allow_negative_numbers = true)]
    pub add: Option<Vec<i64>>,

    /// Delete article(s) from the database
    #[arg(
        short = 'd',
        long = "del",
        value_name = "ID",
        num_args = 1..,
        allow_negative_numbers = true
    )]
    pub delete: Option<Vec<i64>>,

    /// Database file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Homepage to scrape instead of the configured one
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Ignore the config file and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Print --new and --list output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    New,
    List,
    Add(Vec<i64>),
    Delete(Vec<i64>),
}

impl Cli {
    /// The selected mode, if any. Clap guarantees at most one.
    pub fn mode(&self) -> Option<Mode> {
        if self.new {
            Some(Mode::New)
        } else if self.list {
            Some(Mode::List)
        } else if let Some(ids) = &self.add {
            Some(Mode::Add(ids.clone()))
        } else {
            self.delete.as_ref().map(|ids| Mode::Delete(ids.clone()))
        }
    }
}
