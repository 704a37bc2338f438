use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clashgen")]
#[command(about = "Generate per-user Clash subscription configs from a template", long_about = None)]
pub struct Cli {
    /// Path to the JSON file mapping user names to credentials
    #[arg(short, long)]
    pub users_path: PathBuf,

    /// Path to the subscription template
    #[arg(short, long)]
    pub template_path: PathBuf,

    /// SNI host injected into every rendered config
    #[arg(short, long)]
    pub sni_host: String,

    /// Directory the generated configs are written to
    #[arg(short, long)]
    pub output_dir: PathBuf,
}
