use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use coinverse_api::endpoints::{
    transactions::{IncomeCategory, OutcomeCategory},
    BookId,
};

#[derive(Parser, Debug)]
#[command(
    name = "coinverse",
    version,
    about = "Command-line client for a CoinVerse account-book server"
)]
pub struct Cli {
    /// Settings file (TOML); missing files are ignored
    #[arg(long, env = "COINVERSE_CONFIG", default_value = "coinverse.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show where the app would land on startup
    Status,

    /// Inspect or change the server address
    #[command(subcommand)]
    Server(ServerCommands),

    /// Create a new account
    Register {
        name: String,
        email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and store the session token
    Login {
        /// Account name or email
        name_or_email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Switch to this server before logging in
        #[arg(long)]
        server: Option<String>,
    },

    /// Swap the stored token for a fresh one
    Refresh,

    /// End the session and forget the token
    Logout,

    /// Show the logged-in account
    Profile,

    /// Change an account password
    ChangePassword {
        /// Account name or email
        name_or_email: String,

        #[arg(long)]
        old_password: Option<String>,

        #[arg(long)]
        new_password: Option<String>,
    },

    /// Account book commands
    #[command(subcommand)]
    Books(BookCommands),

    /// Record income in a book
    Income {
        book_id: BookId,

        /// Amount received
        amount: f64,

        /// One of salary, bonus, invest, other
        #[arg(short, long, default_value = "other")]
        category: IncomeCategory,

        /// When it happened (e.g. 2024-05-01T09:30:00); defaults to now
        #[arg(short, long)]
        time: Option<NaiveDateTime>,

        #[arg(short, long)]
        note: Option<String>,
    },

    /// Record an expense in a book
    Outcome {
        book_id: BookId,

        /// Amount spent; stored as a negative amount
        amount: f64,

        /// One of food, rent, transport, entertain, other
        #[arg(short, long, default_value = "other")]
        category: OutcomeCategory,

        /// When it happened (e.g. 2024-05-01T09:30:00); defaults to now
        #[arg(short, long)]
        time: Option<NaiveDateTime>,

        #[arg(short, long)]
        note: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServerCommands {
    /// Print the current server address
    Get,

    /// Point the client at another server
    Set { url: String },

    /// Go back to the configured default
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// List books with balances
    List,

    /// Create a book
    Create { name: String },

    /// Delete a book and its transactions
    Remove { book_id: BookId },

    /// List a book's transactions
    Show {
        book_id: BookId,

        /// Only transactions at or after this time
        #[arg(long)]
        from: Option<NaiveDateTime>,

        /// Only transactions at or before this time
        #[arg(long)]
        to: Option<NaiveDateTime>,

        /// Only transactions whose note contains this text
        #[arg(long)]
        note: Option<String>,
    },
}
