mod logging;
mod notifier;
mod persister;
mod token;

use anyhow::{Context, Result};
use board_client::cache::{COMMENTS, GET_TOKEN, REVIEWS};
use board_client::comments::{resolve_view, CommentActions};
use board_client::http_client::HttpClient;
use board_client::models::{Comment, Review, UserRef};
use board_client::reviews::{cached_token, ReviewActions, ReviewForm};
use board_client::{
    ApiError, AuthContext, BoardApi, ClientConfig, MutationOutcome, QueryCache, QueryKey, Session,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use notifier::TerminalNotifier;
use persister::FileCachePersister;
use std::path::PathBuf;
use std::rc::Rc;
use token::TokenManager;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API base URL (falls back to BOARD_API_URL)
    #[arg(short, long)]
    server: Option<String>,

    #[arg(long)]
    token_file: Option<PathBuf>,

    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Answer "yes" to confirmations
    #[arg(short, long)]
    yes: bool,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a token issued by the backend
    Login {
        #[arg(short, long)]
        token: String,
    },

    Logout,

    Status,

    Comments {
        #[arg(short, long)]
        post: String,
    },

    EditComment {
        #[arg(short, long)]
        post: String,

        #[arg(short, long)]
        id: String,

        #[arg(short, long)]
        content: String,
    },

    DeleteComment {
        #[arg(short, long)]
        post: String,

        #[arg(short, long)]
        id: String,
    },

    Reviews {
        #[arg(short, long)]
        post: String,
    },

    Review {
        #[arg(short, long)]
        post: String,

        #[arg(short, long, default_value = "")]
        content: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let api_base = cli
        .server
        .clone()
        .or_else(|| std::env::var("BOARD_API_URL").ok());
    let config = match api_base {
        Some(api_base) => ClientConfig::new(api_base),
        None => ClientConfig::default(),
    };

    let token_manager = TokenManager::new(cli.token_file.clone())?;
    let persister = FileCachePersister::new(cli.cache_file.clone())?;
    let cache = QueryCache::new(&config).with_persister(Rc::new(persister));
    cache.restore(Utc::now());
    cache.collect_garbage(Utc::now());

    let auth = AuthContext::load(&token_manager, Utc::now());
    let api = HttpClient::new(config.api_base.clone());
    let notifier = TerminalNotifier::new(cli.yes);

    match &cli.command {
        Commands::Login { token } => match Session::from_token(token.trim()) {
            Ok(session) => {
                token_manager.save_token(session.token())?;
                println!("✅ Logged in as user {}", session.user_id());
                println!("   Token saved to {:?}", token_manager.path());
            }
            Err(e) => {
                println!("❌ Token rejected: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Logout => {
            cache.remove_partition(GET_TOKEN);
            if token_manager.clear_token()? {
                println!("✅ Token file removed");
            } else {
                println!("No token to remove");
            }
        }

        Commands::Status => match auth.session() {
            Some(session) => {
                println!("🔑 Token file: {:?}", token_manager.path());
                println!("   User ID: {}", session.user_id());
                if let Some(username) = &session.claims().data.username {
                    println!("   Username: {}", username);
                }
                match session.expires_at() {
                    Some(expires_at) => println!("   Expires: {}", expires_at.to_rfc3339()),
                    None => println!("   Expires: never"),
                }
            }
            None => {
                println!("❌ No token found");
                println!("   Please login first: board login --token <token>");
            }
        },

        Commands::Comments { post } => {
            let comments = load_comments(&cache, &api, post).await?;
            println!("📋 {} comments on post {}", comments.len(), post);

            if auth.session().is_none() {
                println!("   Login to see comments: board login --token <token>");
            }

            for comment in &comments {
                if let Some(view) = resolve_view(comment, &auth, Utc::now()) {
                    let marker = if view.can_manage { " (yours)" } else { "" };
                    println!("   [{}]{} {}", comment.id, marker, comment.content);
                }
            }
        }

        Commands::EditComment { post, id, content } => {
            let token = owned_comment_token(&cache, &api, &auth, post, id).await?;
            let actions = CommentActions::new(&api, &notifier, &cache);
            exit_on_failure(actions.update(id, &token, content).await);
        }

        Commands::DeleteComment { post, id } => {
            let token = owned_comment_token(&cache, &api, &auth, post, id).await?;
            let actions = CommentActions::new(&api, &notifier, &cache);
            exit_on_failure(actions.delete(id, &token).await);
        }

        Commands::Reviews { post } => {
            let reviews = load_reviews(&cache, &api, post).await?;
            println!("📋 {} reviews on post {}", reviews.len(), post);
            for review in &reviews {
                println!("   {}: {}", author(&review.user), review.content);
            }
        }

        Commands::Review { post, content } => {
            let Some(session) = auth.session() else {
                println!("❌ Unauthorized. Please login first:");
                println!("   board login --token <token>");
                std::process::exit(1);
            };

            let mut form = ReviewForm::new(post.clone(), session.user_id());
            form.set_content(content.clone());

            let token = cached_token(&cache, &token_manager).await;
            let actions = ReviewActions::new(&api, &notifier, &cache);
            exit_on_failure(actions.submit(&form, token).await);
        }
    }

    Ok(())
}

async fn load_comments(cache: &QueryCache, api: &HttpClient, post: &str) -> Result<Vec<Comment>> {
    let comments: Result<Vec<Comment>, ApiError> = cache
        .fetch(QueryKey::scoped(COMMENTS, [post]), || api.comments_for_post(post))
        .await;
    comments.with_context(|| format!("Failed to load comments of post {}", post))
}

async fn load_reviews(cache: &QueryCache, api: &HttpClient, post: &str) -> Result<Vec<Review>> {
    let reviews: Result<Vec<Review>, ApiError> = cache
        .fetch(QueryKey::scoped(REVIEWS, [post]), || api.reviews_for_post(post))
        .await;
    reviews.with_context(|| format!("Failed to load reviews of post {}", post))
}

/// Token to act with, or exit if the viewer does not own the comment.
async fn owned_comment_token(
    cache: &QueryCache,
    api: &HttpClient,
    auth: &AuthContext,
    post: &str,
    id: &str,
) -> Result<String> {
    if auth.session().is_none() {
        println!("❌ Unauthorized. Please login first:");
        println!("   board login --token <token>");
        std::process::exit(1);
    }

    let comments = load_comments(cache, api, post).await?;
    let Some(comment) = comments.iter().find(|c| c.id == id) else {
        println!("❌ Comment {} not found on post {}", id, post);
        println!("   Tip: Use 'comments --post {}' to see available comments", post);
        std::process::exit(1);
    };

    match resolve_view(comment, auth, Utc::now()) {
        Some(view) if view.can_manage => Ok(view.token.to_string()),
        _ => {
            println!("❌ You can only change your own comments");
            std::process::exit(1);
        }
    }
}

fn author(user: &UserRef) -> String {
    match user {
        UserRef::Id(id) => id.clone(),
        UserRef::Populated(user) => user.username.clone().unwrap_or_else(|| user.id.clone()),
    }
}

fn exit_on_failure(outcome: MutationOutcome) {
    match outcome {
        MutationOutcome::Succeeded(_) => {}
        MutationOutcome::Dismissed => println!("Cancelled"),
        MutationOutcome::Failed(_) => std::process::exit(1),
    }
}
