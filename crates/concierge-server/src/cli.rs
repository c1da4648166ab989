use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// concierge: routes each question to the handler best suited to answer it.
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Port override.
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer one message and print the reply.
    Ask {
        message: String,

        /// Session to continue.
        #[arg(long)]
        session: Option<String>,
    },
    /// Print the resolved configuration as JSON.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let args = Args::try_parse_from(["concierge"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn ask_takes_message_and_session() {
        let args = Args::try_parse_from(["concierge", "ask", "What is 2+2?", "--session", "s1"]).unwrap();
        match args.command {
            Some(Command::Ask { message, session }) => {
                assert_eq!(message, "What is 2+2?");
                assert_eq!(session.as_deref(), Some("s1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_subcommand_takes_global_path() {
        let args = Args::try_parse_from(["concierge", "config", "--config", "/etc/concierge.toml"]).unwrap();
        assert!(matches!(args.command, Some(Command::Config)));
        assert_eq!(args.config.as_deref(), Some(std::path::Path::new("/etc/concierge.toml")));
    }

    #[test]
    fn serve_accepts_port_and_global_flags() {
        let args =
            Args::try_parse_from(["concierge", "serve", "--port", "8088", "--log-level", "debug"]).unwrap();
        assert!(matches!(args.command, Some(Command::Serve { port: Some(8088) })));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
