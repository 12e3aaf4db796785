use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::fmt::Write;

use coinverse_api::Request;
use coinverse_session::{Route, Services};

use crate::cli::{BookCommands, Commands, ServerCommands};

/// Run one command and return what should be printed.
pub async fn execute(command: Commands, services: &Services) -> Result<String> {
    match command {
        Commands::Status => {
            let route = services.startup_router().resolved().await;
            Ok(match route {
                Route::ToHome => format!("Logged in (server {})", services.endpoints.get_address()),
                _ => "Not logged in".to_string(),
            })
        }

        Commands::Server(command) => Ok(execute_server(command, services)),

        Commands::Register {
            name,
            email,
            password,
        } => {
            let pwd_hash = hash(services, password_or_prompt(password, "Password: ")?);
            let envelope = services
                .session
                .perform(Request::auth().register(&name, &email, &pwd_hash))
                .await
                .into_result()?;
            Ok(message_or(envelope.message, "Registered"))
        }

        Commands::Login {
            name_or_email,
            password,
            server,
        } => {
            if let Some(server) = server {
                services.endpoints.set_address(server.trim_end_matches('/'));
            }
            let pwd_hash = hash(services, password_or_prompt(password, "Password: ")?);

            let envelope = services
                .session
                .perform(Request::auth().login(&name_or_email, &pwd_hash))
                .await
                .into_result()?;

            if envelope.payload.access_token.is_none() {
                bail!("Server accepted the login but issued no token");
            }
            Ok(format!(
                "Logged in as {} on {}",
                name_or_email,
                services.endpoints.get_address()
            ))
        }

        Commands::Refresh => {
            let token = require_token(services)?;
            let envelope = services
                .session
                .perform(Request::auth().refresh(&token))
                .await
                .into_result()?;

            match envelope.payload.access_token.filter(|t| !t.is_empty()) {
                Some(fresh) => {
                    services.credentials.save(Some(&fresh));
                    Ok("Token refreshed".to_string())
                }
                None => bail!("Server issued no token"),
            }
        }

        Commands::Logout => {
            let token = require_token(services)?;
            let envelope = services
                .session
                .perform(Request::auth().logout(&token))
                .await
                .into_result()?;
            services.credentials.clear();
            Ok(message_or(envelope.message, "Logged out"))
        }

        Commands::Profile => {
            let token = require_token(services)?;
            let profile = services
                .session
                .perform(Request::auth().profile(&token))
                .await
                .into_result()?
                .payload;
            Ok(format!(
                "{} <{}>",
                profile.name.unwrap_or_default(),
                profile.email.unwrap_or_default()
            ))
        }

        Commands::ChangePassword {
            name_or_email,
            old_password,
            new_password,
        } => {
            let old = hash(services, password_or_prompt(old_password, "Old password: ")?);
            let new = hash(services, password_or_prompt(new_password, "New password: ")?);
            let envelope = services
                .session
                .perform(Request::auth().change_password(&name_or_email, &old, &new))
                .await
                .into_result()?;
            Ok(message_or(envelope.message, "Password changed"))
        }

        Commands::Books(command) => execute_books(command, services).await,

        Commands::Income {
            book_id,
            amount,
            category,
            time,
            note,
        } => {
            let token = require_token(services)?;
            let mut request = Request::transactions()
                .with_token(&token)
                .with_book(book_id)
                .income(amount, category);
            if let Some(time) = time {
                request = request.time(time);
            }
            if let Some(note) = note {
                request = request.note(note);
            }

            let envelope = services.session.perform(request).await.into_result()?;
            Ok(message_or(envelope.message, "Income recorded"))
        }

        Commands::Outcome {
            book_id,
            amount,
            category,
            time,
            note,
        } => {
            let token = require_token(services)?;
            // Expenses are negative on the wire
            let mut request = Request::transactions()
                .with_token(&token)
                .with_book(book_id)
                .outcome(-amount.abs(), category);
            if let Some(time) = time {
                request = request.time(time);
            }
            if let Some(note) = note {
                request = request.note(note);
            }

            let envelope = services.session.perform(request).await.into_result()?;
            Ok(message_or(envelope.message, "Expense recorded"))
        }
    }
}

fn execute_server(command: ServerCommands, services: &Services) -> String {
    match command {
        ServerCommands::Get => services.endpoints.get_address(),
        ServerCommands::Set { url } => {
            services.endpoints.set_address(url.trim_end_matches('/'));
            format!("Server set to {}", services.endpoints.get_address())
        }
        ServerCommands::Reset => {
            services.endpoints.reset();
            format!("Server reset to {}", services.endpoints.get_address())
        }
    }
}

async fn execute_books(command: BookCommands, services: &Services) -> Result<String> {
    let token = require_token(services)?;
    let books = Request::books().with_token(&token);

    match command {
        BookCommands::List => {
            let listed = services
                .session
                .perform(books.list())
                .await
                .into_result()?
                .payload
                .books;
            if listed.is_empty() {
                return Ok("No books".to_string());
            }

            let mut out = String::new();
            for book in listed {
                writeln!(out, "{:>6}  {:<24} {:>12.2}", book.id, book.name, book.balance)?;
            }
            Ok(out.trim_end().to_string())
        }

        BookCommands::Create { name } => {
            let envelope = services
                .session
                .perform(books.create(&name))
                .await
                .into_result()?;
            Ok(message_or(envelope.message, "Book created"))
        }

        BookCommands::Remove { book_id } => {
            let envelope = services
                .session
                .perform(books.remove(book_id))
                .await
                .into_result()?;
            Ok(message_or(envelope.message, "Book removed"))
        }

        BookCommands::Show {
            book_id,
            from,
            to,
            note,
        } => {
            let mut request = books.detail(book_id);
            if let Some(from) = from {
                request = request.start_time(from);
            }
            if let Some(to) = to {
                request = request.end_time(to);
            }
            if let Some(note) = note {
                request = request.note(note);
            }

            let transactions = services
                .session
                .perform(request)
                .await
                .into_result()?
                .payload
                .transactions;
            if transactions.is_empty() {
                return Ok("No transactions".to_string());
            }

            let mut out = String::new();
            for tx in transactions {
                writeln!(
                    out,
                    "{:>6}  {:<10} {:>12.2}  {}",
                    tx.id,
                    tx.category,
                    tx.amount,
                    tx.note.unwrap_or_default()
                )?;
            }
            Ok(out.trim_end().to_string())
        }
    }
}

fn require_token(services: &Services) -> Result<String> {
    services
        .credentials
        .get()
        .filter(|token| !token.trim().is_empty())
        .context("Not logged in; run `coinverse login` first")
}

fn password_or_prompt(given: Option<String>, prompt: &str) -> Result<SecretString> {
    let password = match given {
        Some(password) => password,
        None => rpassword::prompt_password(prompt).context("Failed to read password")?,
    };
    Ok(SecretString::from(password))
}

fn hash(services: &Services, password: SecretString) -> String {
    services.hasher.hash(&password)
}

fn message_or(message: Option<String>, fallback: &str) -> String {
    message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
