use anyhow::Result;
use blog_backend::auth::UserProfile;
use blog_backend::cli;
use blog_backend::config::BlogConfig;
use blog_backend::node::BlogNode;
use blog_backend::telemetry;
use blog_backend::utils;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Personal blog backend and admin CLI")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for REST/API access
    Serve,
    /// Start the interactive CLI for posts, comments and blog info
    Cli,
    /// Sign a user in and print a session token for the gated endpoints
    Login {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Revoke a session token
    Logout { token: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::print_banner();
    telemetry::init_tracing();

    let args = Args::parse();

    let config = BlogConfig::from_env()?;
    let node = BlogNode::start(config).await?;
    tracing::info!(
        api_port = node.config().api_port,
        "bootstrap complete"
    );

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => node.run_http_server().await,
        Command::Cli => cli::run_cli(node.blog()).await,
        Command::Login {
            user_id,
            email,
            first_name,
            last_name,
        } => {
            let issued = node.sessions().sign_in(UserProfile {
                id: user_id,
                email,
                first_name,
                last_name,
                profile_image_url: None,
            })?;
            println!("user:    {}", issued.user.id);
            println!("expires: {}", issued.expires_at);
            println!("token:   {}", issued.token);
            println!(
                "use it as 'Authorization: Bearer <token>' or the '{}' cookie",
                node.config().session.cookie_name
            );
            Ok(())
        }
        Command::Logout { token } => {
            if node.sessions().sign_out(&token)? {
                println!("Session revoked");
            } else {
                println!("No such session");
            }
            Ok(())
        }
    }
}
