//! Line-protocol TCP session adapter.
//!
//! A minimal concrete `SessionConnector` for line-oriented chat servers.
//!
//! ## Protocol
//!
//! ```text
//! client -> server   <identity>\n          (once, right after connecting)
//! client -> server   <payload>\n           (each sent payload)
//! server -> client   <sender>: <message>\n (chat)
//! server -> client   !kick <reason>\n      (forced disconnect)
//! ```
//!
//! Any other inbound line is ignored. The session reports `Spawned` as soon
//! as the identity line is written, and always finishes with `Ended`.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::Instrument;

use crate::ports::{
    Session, SessionConnector, SessionError, SessionEvent, SessionEvents, SessionRequest,
};

/// Longest inbound line accepted before the connection is treated as faulty.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

const KICK_COMMAND: &str = "!kick";

/// Parsed form of one inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundLine {
    Chat { sender: String, message: String },
    Kick { reason: String },
    Notice(String),
}

pub fn parse_inbound(line: &str) -> InboundLine {
    let line = line.trim_end_matches('\r');

    if let Some(rest) = line.strip_prefix(KICK_COMMAND) {
        if rest.is_empty() || rest.starts_with(' ') {
            let reason = rest.trim();
            return InboundLine::Kick {
                reason: if reason.is_empty() {
                    "no reason given".to_owned()
                } else {
                    reason.to_owned()
                },
            };
        }
    }

    match line.split_once(": ") {
        Some((sender, message))
            if !sender.is_empty() && !sender.contains(char::is_whitespace) =>
        {
            InboundLine::Chat {
                sender: sender.to_owned(),
                message: message.to_owned(),
            }
        }
        _ => InboundLine::Notice(line.to_owned()),
    }
}

enum Outbound {
    Line(String),
    Close,
}

struct LineSession {
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Session for LineSession {
    fn send(&self, payload: &str) -> Result<(), SessionError> {
        self.outbound
            .send(Outbound::Line(payload.to_owned()))
            .map_err(|_| SessionError::Closed)
    }

    fn disconnect(&self) -> Result<(), SessionError> {
        // Closing a finished connection is a no-op.
        let _ = self.outbound.send(Outbound::Close);
        Ok(())
    }
}

/// Opens line-protocol sessions over plain TCP.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineSessionConnector;

impl LineSessionConnector {
    pub fn new() -> Self {
        Self
    }
}

impl SessionConnector for LineSessionConnector {
    fn open(&self, request: SessionRequest) -> (Box<dyn Session>, SessionEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let span = tracing::debug_span!(
            "line_session",
            identity = %request.identity,
            version = %request.protocol_version
        );
        tokio::spawn(
            async move {
                run_connection(request, outbound_rx, &events_tx).await;
                let _ = events_tx.send(SessionEvent::Ended);
                tracing::debug!("connection finished");
            }
            .instrument(span),
        );

        (
            Box::new(LineSession {
                outbound: outbound_tx,
            }),
            events_rx,
        )
    }
}

async fn run_connection(
    request: SessionRequest,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: &mpsc::UnboundedSender<SessionEvent>,
) {
    let emit = |event: SessionEvent| {
        let _ = events.send(event);
    };
    let fault = |message: String| emit(SessionEvent::Error { message });

    let stream = tokio::select! {
        connected = TcpStream::connect((request.host.as_str(), request.port)) => match connected {
            Ok(stream) => stream,
            Err(err) => {
                fault(format!("connect to {}:{} failed: {}", request.host, request.port, err));
                return;
            }
        },
        // Disconnect requested (or handle dropped) before the connection came up.
        _ = outbound.recv() => return,
    };

    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    if let Err(err) = framed.send(request.identity.as_str()).await {
        fault(format!("handshake failed: {}", err));
        return;
    }
    emit(SessionEvent::Spawned);

    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Line(payload)) => {
                    if let Err(err) = framed.send(payload).await {
                        fault(format!("write failed: {}", err));
                        return;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = SinkExt::<String>::close(&mut framed).await;
                    return;
                }
            },
            inbound = framed.next() => match inbound {
                Some(Ok(line)) => match parse_inbound(&line) {
                    InboundLine::Chat { sender, message } => {
                        emit(SessionEvent::Chat { sender, message });
                    }
                    InboundLine::Kick { reason } => {
                        emit(SessionEvent::Kicked { reason });
                        return;
                    }
                    InboundLine::Notice(text) => tracing::trace!(%text, "ignoring notice"),
                },
                Some(Err(err)) => {
                    fault(format!("read failed: {}", err));
                    return;
                }
                None => return,
            },
        }
    }
}
