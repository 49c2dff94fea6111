use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "linkbox")]
#[command(about = "linkbox CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted dispatch session against fake collaborators
    Demo(DemoArgs),
}

#[derive(clap::Args, Debug)]
pub struct DemoArgs {
    /// Link delivered as the cold-start initial link
    #[arg(long)]
    pub initial_link: Option<String>,

    /// Link delivered on the live stream (repeatable, in order)
    #[arg(long = "link")]
    pub links: Vec<String>,

    /// Start the session already authenticated
    #[arg(long)]
    pub authenticated: bool,
}
