//! route-chain CLI.
//!
//! Loads a route table from a TOML config and lets you inspect it or push a
//! single request through it:
//!
//! ```text
//! route-chain check    routes.toml
//! route-chain resolve  routes.toml GET /api/users/42 [--json]
//! route-chain dispatch routes.toml POST /echo -H content-type:text/plain --body hi
//! route-chain watch    routes.toml
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use clap::{Parser, Subcommand};
use serde_json::json;

use route_chain::config::{load_config, ConfigWatcher};
use route_chain::observability::logging;
use route_chain::{DispatchError, Dispatcher, HandlerRegistry, Request, SharedDispatcher, WriterOutput};

#[derive(Parser)]
#[command(name = "route-chain")]
#[command(about = "Inspect and exercise route-chain configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config and print its route table
    Check { config: PathBuf },
    /// Print the handler chain a request resolves to
    Resolve {
        config: PathBuf,
        method: String,
        path: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one request through the dispatcher and print the response
    Dispatch {
        config: PathBuf,
        method: String,
        path: String,
        /// Request header, as `name:value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// Request body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Watch a config file and apply every valid change
    Watch { config: PathBuf },
}

impl Commands {
    fn config_path(&self) -> &Path {
        match self {
            Commands::Check { config }
            | Commands::Resolve { config, .. }
            | Commands::Dispatch { config, .. }
            | Commands::Watch { config } => config.as_path(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.command.config_path().to_path_buf();

    let config = load_config(&config_path)?;
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let registry = HandlerRegistry::with_builtins();
    let dispatcher = Dispatcher::from_config(&config, &registry)?;

    tracing::debug!(
        path = ?config_path,
        routes = dispatcher.router().routes().len(),
        order = ?dispatcher.order(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Check { .. } => {
            print_routes(&dispatcher);
        }
        Commands::Resolve {
            method, path, json, ..
        } => {
            resolve(&dispatcher, Request::new(method, path), json)?;
        }
        Commands::Dispatch {
            method,
            path,
            headers,
            body,
            ..
        } => {
            let mut req = Request::new(method, path);
            for header in &headers {
                let (name, value) = parse_header(header)?;
                req = req.with_header(name, value);
            }
            if let Some(body) = body {
                req = req.with_body(body);
            }

            let stdout = io::stdout();
            let mut out = WriterOutput::new(stdout.lock());
            dispatcher.start(req, &mut out)?;
            println!();
        }
        Commands::Watch { .. } => {
            let shared = SharedDispatcher::new(dispatcher);
            let (watcher, updates) = ConfigWatcher::new(&config_path);
            let _watcher = watcher.run()?;

            let follow = tokio::spawn(shared.clone().follow(updates, Arc::new(registry)));

            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutdown signal received");
            follow.abort();
            print_routes(&shared.load());
        }
    }

    Ok(())
}

fn print_routes(dispatcher: &Dispatcher) {
    let routes = dispatcher.router().routes();
    if routes.is_empty() {
        println!("(no routes)");
        return;
    }
    for route in routes {
        println!("{:<8} {:<32} {}", route.method, route.pattern, route.handler);
    }
}

fn resolve(dispatcher: &Dispatcher, req: Request, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let resolved = dispatcher.resolve(&req);
    if resolved.is_empty() {
        return Err(DispatchError::RouteNotFound {
            method: req.method().to_string(),
            path: req.path().to_string(),
        }
        .into());
    }

    if as_json {
        let handlers: Vec<_> = resolved
            .iter()
            .map(|r| {
                let params: serde_json::Map<String, serde_json::Value> = r
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), json!(v)))
                    .collect();
                json!({
                    "handler": r.name(),
                    "params": params,
                    "rest": r.params.rest(),
                })
            })
            .collect();
        let doc = json!({
            "method": req.method(),
            "path": req.path(),
            "handlers": handlers,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{} {}", req.method(), req.path());
    for (i, r) in resolved.iter().enumerate() {
        let params: Vec<String> = r.params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        if params.is_empty() {
            println!("  {}. {}", i + 1, r.name());
        } else {
            println!("  {}. {}  {{{}}}", i + 1, r.name(), params.join(", "));
        }
    }
    Ok(())
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), Box<dyn std::error::Error>> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header `{}`, expected name:value", raw))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())?;
    let value = HeaderValue::from_str(value.trim())?;
    Ok((name, value))
}
