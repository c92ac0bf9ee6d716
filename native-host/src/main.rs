//! Native Messaging Host - WebSnip snippet resolver
//!
//! Receives page snapshots from the browser extension via stdin/stdout,
//! resolves them into AI-ready snippets and replies on the same channel.
//! Stdout carries the framed protocol, so all logging goes to stderr.

mod protocol;

use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};

use serde::Deserialize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snippet_engine::{Config, SelectionResolver, SnipError, SnipRequest, SnipResponse};

use crate::protocol::{read_message, write_message, FrameError};

/// Messages the extension may send
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum HostMessage {
    Snip(SnipRequest),
}

struct Host {
    resolver: SelectionResolver,
    enabled: bool,
}

impl Host {
    fn new(config: &Config) -> Self {
        Self {
            resolver: SelectionResolver::new(config),
            enabled: config.general.enabled,
        }
    }

    /// Decode, resolve and build the response for one message
    fn handle(&self, message: &[u8]) -> SnipResponse {
        if !self.enabled {
            debug!("Snippets disabled, ignoring {} byte message", message.len());
            return SnipResponse::disabled();
        }

        let request = match serde_json::from_slice::<HostMessage>(message) {
            Ok(HostMessage::Snip(request)) => request,
            Err(e) => {
                warn!("Failed to parse message: {}", e);
                return self.failure(SnipError::InvalidRequest(e.to_string()));
            }
        };

        info!("Snip request for {} ({} bytes of HTML)", request.page_url, request.html.len());

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.resolver.resolve(&request)))
            .unwrap_or_else(|payload| Err(SnipError::Internal(panic_message(payload))));

        match result {
            Ok(snippet) => {
                info!("Resolved {} snippet ({} chars)", snippet.record.category().as_str(), snippet.output.chars().count());
                SnipResponse::ok(snippet.output, self.resolver.success_notice())
            }
            Err(e) => self.failure(e),
        }
    }

    fn failure(&self, e: SnipError) -> SnipResponse {
        match &e {
            SnipError::Internal(_) => error!("{}", e),
            _ => warn!("{}", e),
        }
        SnipResponse::error(&e.to_string(), self.resolver.error_notice(&e))
    }

    /// Serialize a response, replacing it with an error when it cannot be sent
    fn encode(&self, response: &SnipResponse) -> Vec<u8> {
        let encoded = serde_json::to_vec(response)
            .map_err(|e| SnipError::Internal(e.to_string()))
            .and_then(|bytes| {
                if bytes.len() > protocol::MAX_OUTBOUND {
                    Err(SnipError::Internal(format!("response of {} bytes is too large", bytes.len())))
                } else {
                    Ok(bytes)
                }
            });

        match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                let fallback = self.failure(e);
                serde_json::to_vec(&fallback).unwrap_or_else(|_| br#"{"status":"error"}"#.to_vec())
            }
        }
    }

    /// Serve framed messages until the extension closes the pipe
    fn run<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> Result<(), FrameError> {
        loop {
            let Some(message) = read_message(reader)? else {
                info!("Connection closed");
                return Ok(());
            };
            debug!("Received {} bytes from extension", message.len());

            let response = self.handle(&message);
            write_message(writer, &self.encode(&response))?;
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic while resolving snippet".to_string()
    }
}

fn main() {
    let config = Config::load();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();

    info!("Native host started (locale {:?})", config.output.locale);

    let host = Host::new(&config);
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    if let Err(e) = host.run(&mut stdin, &mut stdout) {
        error!("Native host stopped: {}", e);
        std::process::exit(1);
    }
}
