//! Connection loop: one socket at a time, reconnecting forever.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use client::{ConnectionState, Reconnector, Session, SessionEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::autopilot::Autopilot;
use crate::config::HeadlessConfig;
use crate::transport::SocketTransport;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How a connection ended.
enum Exit {
    Shutdown,
    Closed { code: u16, reason: String },
}

/// Drive the session until `shutdown` completes.
pub async fn run<F>(config: HeadlessConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut session = Session::new(config.player_name.clone());
    session.steer(config.steer);
    let mut reconnect = Reconnector::new(config.reconnect_delay_ms);
    let mut autopilot = Autopilot::new(&config);

    loop {
        let connected = tokio::select! {
            result = connect_async(config.server_url.as_str()) => result,
            _ = shutdown.as_mut() => return Ok(()),
        };

        let (code, reason) = match connected {
            Ok((socket, _)) => {
                info!(url = %config.server_url, "connected");
                reconnect.opened();
                autopilot.reset();
                match drive(socket, &mut session, &mut autopilot, &config, shutdown.as_mut()).await {
                    Exit::Shutdown => return Ok(()),
                    Exit::Closed { code, reason } => (code, reason),
                }
            }
            Err(e) => {
                warn!(url = %config.server_url, error = %e, "connect failed");
                (1006, e.to_string())
            }
        };

        session.dispatch(SessionEvent::Closed { code, reason }, &SocketTransport::disconnected());

        let Some(ticket) = reconnect.schedule() else {
            continue;
        };
        debug!(attempt = ticket.attempt, delay_ms = ticket.delay_ms, "reconnect scheduled");
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(ticket.delay_ms as u64)) => {}
            _ = shutdown.as_mut() => return Ok(()),
        }
        if !reconnect.fire(ticket) {
            debug!(attempt = ticket.attempt, "stale reconnect ticket");
        }
    }
}

/// Pump one open socket: inbound frames, queued commands, the input tick and
/// shutdown, all on this task.
async fn drive<F>(
    socket: Socket,
    session: &mut Session,
    autopilot: &mut Autopilot,
    config: &HeadlessConfig,
    mut shutdown: Pin<&mut F>,
) -> Exit
where
    F: Future<Output = ()>,
{
    let (mut write, mut read) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let transport = SocketTransport::new(tx);

    session.dispatch(SessionEvent::Opened, &transport);
    autopilot.step(session, &transport);

    let mut ticker = tokio::time::interval(Duration::from_millis(config.input_tick_ms.max(1) as u64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let exit = loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        session.dispatch(SessionEvent::Frame(text.as_str().to_string()), &transport);
                        autopilot.step(session, &transport);
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame
                            .map(|f| (u16::from(f.code), f.reason.as_str().to_string()))
                            .unwrap_or((1005, String::new()));
                        break Exit::Closed { code, reason };
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        session.dispatch(SessionEvent::Errored(e.to_string()), &transport);
                        break Exit::Closed { code: 1006, reason: e.to_string() };
                    }
                    None => break Exit::Closed { code: 1006, reason: String::new() },
                }
            }
            Some(frame) = rx.recv() => {
                if let Err(e) = write.send(Message::text(frame)).await {
                    warn!(error = %e, "failed to write frame");
                    break Exit::Closed { code: 1006, reason: e.to_string() };
                }
            }
            _ = ticker.tick() => {
                session.tick_input(&transport);
            }
            _ = shutdown.as_mut() => {
                let _ = write.send(Message::Close(None)).await;
                break Exit::Shutdown;
            }
        }
    };

    transport.set_state(ConnectionState::Closed);
    exit
}
