//! Terminal presentation. Colors and tables live here and nowhere else.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::style::Stylize;

use crate::error::Result;
use crate::models::{ArticleRecord, StoredArticle};
use crate::workflow::{Console, Notice, Pending};

mod table;

const RECORD_HEADERS: [&str; 4] = ["ID", "Date", "Title", "URL"];

pub struct TerminalConsole {
    colored: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            colored: io::stdout().is_terminal(),
        }
    }

    fn heading(&self, text: &str) {
        if self.colored {
            println!("\n{}", text.dark_yellow().underlined());
        } else {
            println!("\n{text}");
        }
    }

    fn status(&self, text: &str) {
        if self.colored {
            println!("{}", text.dark_yellow());
        } else {
            println!("{text}");
        }
    }

    fn alert(&self, text: &str) {
        if self.colored {
            println!("{}", text.red());
        } else {
            println!("{text}");
        }
    }

    pub fn show_scrape(&self, records: &[ArticleRecord]) {
        if records.is_empty() {
            self.alert("The homepage doesn't contain any article.");
            return;
        }
        self.heading("Latest articles from the homepage");
        print!("{}", table::render(&RECORD_HEADERS, &scrape_rows(records)));
    }

    pub fn show_stored(&self, rows: &[StoredArticle]) {
        if rows.is_empty() {
            self.status("\nNo article stored in the database\n");
            return;
        }
        self.heading("Articles stored in the database");
        println!("{}", table::render(&RECORD_HEADERS, &stored_rows(rows)));
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn notice(&mut self, notice: Notice<'_>) {
        self.status(&notice.to_string());
    }

    fn show_pending(&mut self, pending: Pending<'_>) {
        match pending {
            Pending::Insert(records) => {
                self.heading("Article(s) to be added to the database");
                print!("{}", table::render(&RECORD_HEADERS, &scrape_rows(records)));
            }
            Pending::Delete(rows) => {
                self.heading("Article(s) to be deleted from the database");
                print!("{}", table::render(&RECORD_HEADERS, &stored_rows(rows)));
            }
        }
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let question = "Are you sure (y/n) ? ";
        if self.colored {
            print!("{}", question.red());
        } else {
            print!("{question}");
        }
        io::stdout().flush()?;

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(answer))
    }
}

fn scrape_rows(records: &[ArticleRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.source_id.to_string(),
                r.published_date.clone(),
                r.title.clone(),
                r.url.clone(),
            ]
        })
        .collect()
}

fn stored_rows(rows: &[StoredArticle]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.display_date(),
                a.title.clone(),
                a.url.clone(),
            ]
        })
        .collect()
}

/// Print rows as pretty JSON for scripting.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
