//! The interactive line-oriented chat loop.

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::core::chatbot::{ChatBot, ChatBotSettings};
use crate::core::message::{Message, Severity};
use crate::core::session::{Session, Submission};

const PROMPT: &str = "> ";

pub async fn run_chat(settings: ChatBotSettings) -> Result<(), Box<dyn Error>> {
    let mut session = Session::new(ChatBot::new(settings));
    for message in session.chat.messages() {
        print_message(message);
    }
    println!("{}", session.connection_status().await);
    println!("Type /h for help, Ctrl-D to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match session.submit(&line).await {
            Submission::Ignored => {}
            // The echo is what was just typed; show only the response.
            Submission::Handled => {
                if let Some(response) = session.chat.messages().last() {
                    print_message(response);
                }
            }
            Submission::NotConnected(banner) => print_message(&banner),
            Submission::Streaming(stream) => {
                let mut stdout = io::stdout();
                let mut write_error = None;
                let reply = session
                    .consume(stream, |fragment| {
                        if write_error.is_none() {
                            write_error = write_fragment(&mut stdout, fragment).err();
                        }
                    })
                    .await;
                // The reply is already recorded; stop once the terminal is gone.
                if let Some(e) = write_error {
                    return Err(e.into());
                }
                println!();
                if reply.severity() != Severity::Info {
                    print_message(&reply);
                }
            }
        }
    }

    debug!("Chat loop finished");
    Ok(())
}

fn write_fragment(out: &mut impl Write, fragment: &str) -> io::Result<()> {
    out.write_all(fragment.as_bytes())?;
    out.flush()
}

fn print_message(message: &Message) {
    println!("{}", message.to_display_text());
}
