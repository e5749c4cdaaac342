//! Line-oriented driver (default binary).
//!
//! Reads one command per line from stdin and writes one JSON object per line to
//! stdout. Every state change and line clear published by the session is written too,
//! so gravity steps show up without polling.
//!
//! Configuration comes from the environment; see `blockfall::runtime::RuntimeConfig`.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use blockfall::runtime::protocol::{parse_input, Input, Output};
use blockfall::runtime::{session, RuntimeConfig, SessionHandle};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    let session = session::spawn(config);
    let mut events = session.subscribe();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let output = match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle(&session, input).await?,
                    Err(e) => Output::Error {
                        message: format!("{:#}", e),
                    },
                };
                write_line(&mut stdout, &output).await?;
            }
            event = events.recv() => {
                match event {
                    Ok(event) => write_line(&mut stdout, &Output::from(event)).await?,
                    Err(RecvError::Lagged(skipped)) => {
                        eprintln!("[Driver] Output lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    session.shutdown().await?;
    Ok(())
}

async fn handle(session: &SessionHandle, input: Input) -> Result<Output> {
    let output = match input {
        Input::Command(command) => Output::Ack {
            command: command.name(),
            ok: session.command(command).await?,
        },
        Input::State => Output::State {
            state: session.state().await?,
        },
        Input::Ghost => Output::Ghost {
            ghost: session.ghost_position().await?,
        },
        Input::PlayTime => Output::PlayTime {
            ms: session.play_time().await?.as_millis() as u64,
        },
        Input::Config => Output::Config {
            config: session.config().await?,
        },
        Input::Quit => Output::Ack {
            command: "quit",
            ok: true,
        },
    };
    Ok(output)
}

async fn write_line(stdout: &mut tokio::io::Stdout, output: &Output) -> Result<()> {
    let mut line = output.to_line()?;
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
