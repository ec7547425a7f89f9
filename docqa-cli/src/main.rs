//! `docqa` — ingest a knowledge base and ask questions against it.
//!
//! Clients are wired from environment variables:
//!
//! - `OPENAI_API_KEY` — embeddings and chat (required)
//! - `PINECONE_HOST`, `PINECONE_API_KEY` — vector index (required)
//! - `GOOGLE_SEARCH_API_KEY`, `GOOGLE_SEARCH_ENGINE_ID` — web search
//!   (required unless `--no-web-search`)
//! - `DOCQA_CHAT_MODEL` (default `gpt-4o-mini`),
//!   `DOCQA_EMBED_MODEL` (default `text-embedding-3-small`),
//!   `DOCQA_EMBED_DIMENSIONS` (default `1536`),
//!   `DOCQA_CHAT_BASE_URL` / `DOCQA_EMBED_BASE_URL` for
//!   OpenAI-compatible servers

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docqa_model::OpenAiChatClient;
use docqa_rag::{
    GoogleWebSearch, OpenAiEmbeddingProvider, PineconeVectorStore, RagConfig, RagPipeline,
    WordWindowChunker,
};

#[derive(Parser)]
#[command(name = "docqa", version, about = "Ask questions over your own documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a directory of documents into the vector index.
    Ingest {
        /// Directory holding the knowledge base (pdf, docx, pptx, txt, md).
        #[arg(long)]
        kb: PathBuf,
        /// Namespace (one per user) to ingest into.
        #[arg(long)]
        namespace: String,
    },
    /// Ask a question against an ingested namespace.
    Ask {
        /// The question to answer.
        query: String,
        /// Namespace to query.
        #[arg(long)]
        namespace: String,
        /// Answer from retrieval context only, without web augmentation.
        #[arg(long)]
        no_web_search: bool,
    },
    /// Delete everything stored under a namespace.
    Purge {
        /// Namespace to purge.
        #[arg(long)]
        namespace: String,
    },
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn build_pipeline(with_web_search: bool) -> anyhow::Result<RagPipeline> {
    let dimensions: usize = env_or("DOCQA_EMBED_DIMENSIONS", "1536")
        .parse()
        .context("DOCQA_EMBED_DIMENSIONS must be a positive integer")?;

    let config = RagConfig::builder().dimensions(dimensions).build()?;

    let mut embedder = OpenAiEmbeddingProvider::from_env()?
        .with_model(env_or("DOCQA_EMBED_MODEL", "text-embedding-3-small"))
        .with_dimensions(dimensions);
    if let Ok(base_url) = std::env::var("DOCQA_EMBED_BASE_URL") {
        embedder = embedder.with_base_url(base_url);
    }

    let chat_model = env_or("DOCQA_CHAT_MODEL", "gpt-4o-mini");
    let model: Arc<OpenAiChatClient> = match std::env::var("DOCQA_CHAT_BASE_URL") {
        Ok(base_url) => {
            let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
            Arc::new(OpenAiChatClient::compatible(api_key, base_url, chat_model)?)
        }
        Err(_) => Arc::new(OpenAiChatClient::from_env(chat_model)?),
    };

    let mut builder = RagPipeline::builder()
        .config(config.clone())
        .embedding_provider(Arc::new(embedder))
        .vector_store(Arc::new(PineconeVectorStore::from_env()?))
        .chunker(Arc::new(WordWindowChunker::new(config.chunk_size, config.chunk_overlap)?))
        .judge_model(model.clone())
        .synthesis_model(model);

    if with_web_search {
        builder = builder.web_search(Arc::new(GoogleWebSearch::from_env()?));
    }

    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Ingest { kb, namespace } => {
            let pipeline = build_pipeline(false)?;
            let count = pipeline.ingest_directory(&namespace, &kb).await?;
            println!("Ingested {count} chunks into namespace '{namespace}'.");
        }
        Command::Ask { query, namespace, no_web_search } => {
            let pipeline = build_pipeline(!no_web_search)?;
            let answer = pipeline.answer(&namespace, &query).await?;
            println!("{}", answer.text);
            if !answer.references.is_empty() {
                println!("\nSources:");
                for reference in &answer.references {
                    println!("  - {reference}");
                }
            }
        }
        Command::Purge { namespace } => {
            let pipeline = build_pipeline(false)?;
            pipeline.purge(&namespace).await?;
            println!("Purged namespace '{namespace}'.");
        }
    }

    Ok(())
}
