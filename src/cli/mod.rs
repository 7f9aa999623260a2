pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pickazoo")]
#[command(about = "Bookmark and watch live zoo camera feeds", long_about = None)]
pub struct Cli {
    /// Directory holding feeds.toml and config.toml (default: ./.pickazoo)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log discovery details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover the stream behind a URL and save it as a feed
    Add {
        /// Stream URL or web page showing the camera
        url: String,

        /// Name for the new feed
        #[arg(short, long)]
        name: String,

        /// Which stream to keep when the page offers several (1-based)
        #[arg(short, long)]
        pick: Option<usize>,

        /// Save without checking that the stream is reachable (rtsp/rtmp streams are never checked)
        #[arg(long)]
        no_validate: bool,
    },
    /// List saved feeds
    List,
    /// Show the stream candidates found behind a URL
    Discover {
        /// Stream URL or web page
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a stream URL is reachable
    Check {
        /// Stream URL
        url: String,
    },
    /// Change the playback window size of a feed
    Resize {
        /// Feed name
        name: String,
        width: u32,
        height: u32,
    },
    /// Open a saved feed in the system's default player
    Open {
        /// Feed name
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "pickazoo",
            "--data-dir",
            "/tmp/zoo",
            "add",
            "https://zoo.example.org/cams",
            "--name",
            "Panda Cam",
            "--pick",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/zoo")));
        match cli.command {
            Commands::Add {
                url,
                name,
                pick,
                no_validate,
            } => {
                assert_eq!(url, "https://zoo.example.org/cams");
                assert_eq!(name, "Panda Cam");
                assert_eq!(pick, Some(2));
                assert!(!no_validate);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_add_requires_name() {
        assert!(Cli::try_parse_from(["pickazoo", "add", "https://example.org/a.m3u8"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pickazoo", "list", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List));
    }
}
