pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "meander")]
#[command(about = "An endless encyclopedia discovery feed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch random discovery batches and print the cards
    Feed {
        /// Number of continuation batches to fetch
        #[arg(short, long, default_value_t = 1)]
        batches: u32,
    },
    /// Search articles by keyword
    Search {
        /// Search term
        term: String,
    },
    /// List articles related to a page
    Related {
        /// Page id to traverse outbound links from
        page_id: i64,
    },
}
