//! Medium API command-line client
//!
//! The `medium` command queries the Medium API on RapidAPI and prints the
//! results as JSON.
//!
//! ## Commands
//!
//! - `user`: profile of a user, optionally with article ids
//! - `article`: story metadata, optionally with content or markdown
//! - `publication`: publication metadata, articles, newsletter
//! - `topfeeds`, `top-writers`, `latest`, `related-tags`: feeds
//! - `article-id`: extract the id from a story URL (offline)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medium_api::{
    extract_article_id, Fetch, FeedMode, MediumClient, MediumConfig, PublicationRef, UserRef,
};
use serde_json::{json, Value};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "medium")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query the Medium API from the command line", long_about = None)]
struct Cli {
    /// RapidAPI key
    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Api(ApiCommand),

    /// Print the article id contained in a story URL (no API key needed)
    ArticleId {
        /// Story URL
        url: String,
    },
}

/// Commands that call the API
#[derive(Subcommand)]
enum ApiCommand {
    /// Show a user's profile
    User {
        /// Username, e.g. nishu-jain
        username: Option<String>,

        /// User id (takes precedence over username)
        #[arg(long)]
        id: Option<String>,

        /// Include the ids of the user's articles
        #[arg(long)]
        articles: bool,
    },

    /// Show an article by id or URL
    Article {
        /// Article id or a story URL
        target: String,

        /// Include the plain-text content
        #[arg(long)]
        content: bool,

        /// Include the markdown content
        #[arg(long)]
        markdown: bool,
    },

    /// Show a publication by slug or id
    Publication {
        /// Publication slug, e.g. towards-artificial-intelligence
        slug: Option<String>,

        /// Publication id (takes precedence over slug)
        #[arg(long)]
        id: Option<String>,

        /// Include the ids of recent articles
        #[arg(long)]
        articles: bool,

        /// Include the newsletter
        #[arg(long)]
        newsletter: bool,
    },

    /// Ranked articles for a tag
    Topfeeds {
        /// Tag, e.g. blockchain
        tag: String,

        /// hot, new, top_year, top_month, top_week or top_all_time
        #[arg(short, long, default_value = "hot")]
        mode: FeedMode,
    },

    /// Top writers for a topic
    TopWriters {
        /// Topic slug, e.g. artificial-intelligence
        topic: String,

        /// Fetch every writer's profile
        #[arg(long)]
        fetch: bool,
    },

    /// Latest posts within a topic
    Latest {
        /// Topic slug
        topic: String,

        /// Fetch every article's metadata
        #[arg(long)]
        fetch: bool,
    },

    /// Tags related to a tag
    RelatedTags {
        /// Tag, e.g. blockchain
        tag: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    medium_api::init_tracing(cli.json, level);

    match cli.command {
        Commands::ArticleId { url } => cmd_article_id(&url),
        Commands::Api(command) => {
            let client = build_client(cli.api_key.as_deref())?;
            let output = run(&client, command).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);

            info!(
                calls = client.calls(),
                remaining = ?client.remaining_calls(),
                "Done"
            );
            Ok(())
        }
    }
}

fn build_client(api_key: Option<&str>) -> Result<MediumClient> {
    let key = api_key.context("No API key: pass --api-key or set RAPIDAPI_KEY")?;
    MediumClient::new(MediumConfig::new(key)).context("Failed to create Medium API client")
}

async fn run(client: &MediumClient, command: ApiCommand) -> Result<Value> {
    match command {
        ApiCommand::User {
            username,
            id,
            articles,
        } => cmd_user(client, username, id, articles).await,
        ApiCommand::Article {
            target,
            content,
            markdown,
        } => cmd_article(client, &target, content, markdown).await,
        ApiCommand::Publication {
            slug,
            id,
            articles,
            newsletter,
        } => cmd_publication(client, slug, id, articles, newsletter).await,
        ApiCommand::Topfeeds { tag, mode } => cmd_topfeeds(client, &tag, mode).await,
        ApiCommand::TopWriters { topic, fetch } => cmd_top_writers(client, &topic, fetch).await,
        ApiCommand::Latest { topic, fetch } => cmd_latest(client, &topic, fetch).await,
        ApiCommand::RelatedTags { tag } => {
            let tags = client
                .related_tags(&tag)
                .await
                .with_context(|| format!("Failed to get tags related to '{tag}'"))?;
            Ok(json!({ "tag": tag, "related_tags": tags }))
        }
    }
}

fn cmd_article_id(url: &str) -> Result<()> {
    match extract_article_id(url) {
        Some(id) => {
            println!("{id}");
            Ok(())
        }
        None => anyhow::bail!("No article id found in '{url}'"),
    }
}

/// Accept either a bare id or anything containing a story URL
fn resolve_article_target(target: &str) -> Result<String> {
    if target.contains("://") {
        extract_article_id(target).with_context(|| format!("No article id found in '{target}'"))
    } else {
        Ok(target.trim().to_string())
    }
}

async fn cmd_user(
    client: &MediumClient,
    username: Option<String>,
    id: Option<String>,
    articles: bool,
) -> Result<Value> {
    let user_ref = UserRef::from_parts(username, id)?;
    let user = client
        .user(user_ref, Fetch::Eager)
        .await
        .context("Failed to get user")?;

    let mut output = json!({
        "id": user.id(),
        "info": user.info(),
    });
    if articles {
        output["articles"] = json!(user.article_ids().await.context("Failed to get articles")?);
    }
    Ok(output)
}

async fn cmd_article(
    client: &MediumClient,
    target: &str,
    content: bool,
    markdown: bool,
) -> Result<Value> {
    let article_id = resolve_article_target(target)?;
    let mut article = client
        .article(&article_id, Fetch::Eager)
        .await
        .with_context(|| format!("Failed to get article {article_id}"))?;

    if content {
        article.fetch_content().await.context("Failed to get content")?;
    }
    if markdown {
        article
            .fetch_markdown()
            .await
            .context("Failed to get markdown")?;
    }

    Ok(json!({
        "id": article.id(),
        "info": article.info(),
        "content": article.content(),
        "markdown": article.markdown(),
    }))
}

async fn cmd_publication(
    client: &MediumClient,
    slug: Option<String>,
    id: Option<String>,
    articles: bool,
    newsletter: bool,
) -> Result<Value> {
    let publication_ref = PublicationRef::from_parts(slug, id)?;
    let publication = client
        .publication(publication_ref, Fetch::Eager)
        .await
        .context("Failed to get publication")?;

    let mut output = json!({
        "id": publication.id(),
        "info": publication.info(),
    });
    if articles {
        output["articles"] = json!(publication
            .article_ids()
            .await
            .context("Failed to get publication articles")?);
    }
    if newsletter {
        output["newsletter"] = json!(publication
            .newsletter()
            .await
            .context("Failed to get newsletter")?);
    }
    Ok(output)
}

async fn cmd_topfeeds(client: &MediumClient, tag: &str, mode: FeedMode) -> Result<Value> {
    let mut feed = client.topfeeds(tag, mode);
    let ids = feed
        .ids()
        .await
        .with_context(|| format!("Failed to get {mode} feed for '{tag}'"))?;
    Ok(json!({ "tag": tag, "mode": mode, "articles": ids }))
}

async fn cmd_top_writers(client: &MediumClient, topic: &str, fetch: bool) -> Result<Value> {
    let mut writers = client.top_writers(topic);
    let mut users = writers
        .users()
        .await
        .with_context(|| format!("Failed to get top writers for '{topic}'"))?;

    if fetch {
        client
            .fetch_users(&mut users)
            .await
            .context("Failed to fetch writer profiles")?;
    }

    let entries: Vec<Value> = users
        .iter()
        .map(|u| json!({ "id": u.id(), "info": u.info() }))
        .collect();
    Ok(json!({ "topic": topic, "top_writers": entries }))
}

async fn cmd_latest(client: &MediumClient, topic: &str, fetch: bool) -> Result<Value> {
    let mut latest = client.latestposts(topic);
    let mut articles = latest
        .articles()
        .await
        .with_context(|| format!("Failed to get latest posts for '{topic}'"))?;

    if fetch {
        client
            .fetch_articles(&mut articles, false)
            .await
            .context("Failed to fetch article metadata")?;
    }

    let entries: Vec<Value> = articles
        .iter()
        .map(|a| json!({ "id": a.id(), "info": a.info() }))
        .collect();
    Ok(json!({ "topic": topic, "latestposts": entries }))
}
