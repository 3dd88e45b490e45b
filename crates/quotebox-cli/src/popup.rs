// Line-oriented popup: show a quote, then react to one command at a time
use quotebox_core::{
    limiter::limit_message, FavoriteOutcome, Intent, PopupSession, QuoteOutcome,
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::error;

const HELP: &str = "Commands: [n]ext, [f]avorite, [l]ist, [d]elete <number>, [c]lear, [h]elp, [q]uit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Intent(Intent),
    DeleteIndex(usize),
    List,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" => Command::Empty,
        "n" | "next" => Command::Intent(Intent::NextQuote),
        "f" | "fav" | "favorite" => Command::Intent(Intent::FavoriteQuote),
        "c" | "clear" => Command::Intent(Intent::ClearFavorites),
        "l" | "list" => Command::List,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "d" | "delete" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::DeleteIndex(n),
            _ => Command::Unknown(line.to_string()),
        },
        // Full intent names, e.g. "delete-quote:<text>"
        _ => match line.parse::<Intent>() {
            Ok(intent) => Command::Intent(intent),
            Err(_) => Command::Unknown(line.to_string()),
        },
    }
}

pub async fn run_popup(mut session: PopupSession) -> anyhow::Result<()> {
    let outcome = session.open().await;
    print_outcome(&session, &outcome);
    show_favorites(&session).await;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Intent(intent) => handle_intent(&mut session, intent, &mut lines).await?,
            Command::DeleteIndex(n) => match session.favorites().await {
                Ok(favorites) => match favorites.get(n - 1) {
                    Some(quote) => {
                        let intent = Intent::DeleteQuote(quote.clone());
                        handle_intent(&mut session, intent, &mut lines).await?
                    }
                    None => println!("No favorite number {}", n),
                },
                Err(e) => error!("Error loading quotes: {}", e),
            },
            Command::List => show_favorites(&session).await,
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(input) => println!("Unknown command: {}. {}", input, HELP),
        }
    }

    Ok(())
}

async fn handle_intent<R>(
    session: &mut PopupSession,
    intent: Intent,
    lines: &mut Lines<R>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    match intent {
        Intent::NextQuote => match session.next_quote().await {
            Ok(outcome) => print_outcome(session, &outcome),
            Err(e) => error!("Error generating quote: {}", e),
        },
        Intent::FavoriteQuote => match session.favorite_current().await {
            Ok(FavoriteOutcome::Added(favorites)) => {
                println!("♥ Saved to favorites");
                print_favorites(&favorites);
            }
            Ok(FavoriteOutcome::AlreadySaved) => println!("Already in your favorites"),
            Ok(FavoriteOutcome::NothingToSave) => println!("No quote to save yet"),
            Err(e) => error!("Error saving quote: {}", e),
        },
        Intent::ClearFavorites => {
            prompt("Are you sure you want to clear all favorite quotes? [y/N] ")?;
            let answer = lines.next_line().await?.unwrap_or_default();
            let confirmed = matches!(answer.trim(), "y" | "Y" | "yes");

            match session.clear_favorites(confirmed).await {
                Ok(true) => print_favorites(&[]),
                Ok(false) => {}
                Err(e) => error!("Error clearing quotes: {}", e),
            }
        }
        Intent::DeleteQuote(quote) => match session.delete_favorite(&quote).await {
            Ok(remaining) => print_favorites(&remaining),
            Err(e) => error!("Error deleting quote: {}", e),
        },
    }

    Ok(())
}

fn print_outcome(session: &PopupSession, outcome: &QuoteOutcome) {
    match outcome {
        QuoteOutcome::Limited { minutes_remaining } => {
            println!("{}", limit_message(session.max_quotes(), *minutes_remaining));
        }
        _ => {
            if let Some(text) = outcome.display_text() {
                println!("\n  {}\n", text);
            }
            println!("Quotes viewed: {}", session.quotes_viewed());
        }
    }
}

async fn show_favorites(session: &PopupSession) {
    match session.favorites().await {
        Ok(favorites) => print_favorites(&favorites),
        Err(e) => error!("Error loading quotes: {}", e),
    }
}

pub fn print_favorites(favorites: &[String]) {
    if favorites.is_empty() {
        println!("No favorite quotes yet");
        return;
    }

    println!("Favorites:");
    for (i, quote) in favorites.iter().enumerate() {
        println!("  {}. {}", i + 1, quote);
    }
}

fn prompt(text: &str) -> std::io::Result<()> {
    print!("{}", text);
    std::io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_commands() {
        assert_eq!(parse_command("n"), Command::Intent(Intent::NextQuote));
        assert_eq!(parse_command("  next  "), Command::Intent(Intent::NextQuote));
        assert_eq!(parse_command("f"), Command::Intent(Intent::FavoriteQuote));
        assert_eq!(parse_command("clear"), Command::Intent(Intent::ClearFavorites));
        assert_eq!(parse_command("l"), Command::List);
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command(""), Command::Empty);
    }

    #[test]
    fn test_delete_by_number() {
        assert_eq!(parse_command("d 2"), Command::DeleteIndex(2));
        assert_eq!(parse_command("delete   1"), Command::DeleteIndex(1));
        assert!(matches!(parse_command("d 0"), Command::Unknown(_)));
        assert!(matches!(parse_command("d two"), Command::Unknown(_)));
    }

    #[test]
    fn test_full_intent_names() {
        assert_eq!(parse_command("next-quote"), Command::Intent(Intent::NextQuote));
        assert_eq!(
            parse_command("delete-quote:Stay hungry - Stewart Brand"),
            Command::Intent(Intent::DeleteQuote(
                "Stay hungry - Stewart Brand".to_string()
            ))
        );
        assert!(matches!(parse_command("refresh"), Command::Unknown(_)));
    }
}
