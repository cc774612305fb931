use crate::upload::scan::DEFAULT_MAX_FILE_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "easyimage")]
#[command(about = "Upload images to an Easy Image compatible service")]
#[command(version)]
#[command(arg_required_else_help = true)]
#[command(after_help = r#"
EXAMPLES:
  Upload a directory, signing the token locally:
    easyimage upload ./photos https://upload.example.com/ -e ENV_ID -k ACCESS_KEY

  Upload a single file with a token from a token endpoint:
    easyimage upload cat.png https://upload.example.com/ -t https://example.com/token

  Save the result to a file:
    easyimage upload ./photos https://upload.example.com/ -t https://example.com/token \
      -o result.json

ALLOWED FORMATS:
  png, jpeg, jpg, bmp, tiff, webp, gif
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a file or every image in a directory
    Upload {
        /// File or directory to upload
        file_path: PathBuf,

        /// Upload endpoint
        upload_url: String,

        /// Environment id (issuer of the locally signed token)
        #[arg(short = 'e', long, env = "EASYIMAGE_ENVIRONMENT")]
        environment: Option<String>,

        /// Access key used to sign the token
        #[arg(short = 'k', long, env = "EASYIMAGE_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Endpoint that issues tokens
        #[arg(
            short = 't',
            long = "tokenUrl",
            visible_alias = "token-url",
            env = "EASYIMAGE_TOKEN_URL"
        )]
        token_url: Option<String>,

        /// File where the result should be saved
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Maximum file size in bytes (0 disables the limit)
        #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
        max_size: u64,

        /// Skip TLS certificate validation (self-signed test environments only)
        #[arg(long)]
        insecure: bool,

        /// Do not show the progress bar
        #[arg(short = 'q', long)]
        quiet: bool,
    },
}
