use std::sync::mpsc;
use std::thread;

use engine::{Command, Engine, EngineErrorEvent, Event, MediaBackend};
use iced::futures::{SinkExt, StreamExt, channel::mpsc as futures_mpsc, executor};
use iced::{Subscription, stream};
use tracing::{debug, warn};

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 8;
const SUBSCRIPTION_CHANNEL_CAPACITY: usize = 32;

/// Sender used by the UI thread to dispatch commands to the engine thread.
pub type EngineCommandSender = mpsc::SyncSender<Command>;

/// Receiver used by the UI thread to read events emitted by the engine thread.
pub type EngineEventReceiver = mpsc::Receiver<Event>;

/// Messages emitted by the engine bridge subscription.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    Ready(EngineCommandSender),
    Event(Event),
    Disconnected,
}

/// Builds a subscription that starts the engine bridge and forwards events.
pub fn engine_subscription() -> Subscription<BridgeEvent> {
    Subscription::run(bridge_worker_stream)
}

fn bridge_worker_stream() -> impl iced::futures::Stream<Item = BridgeEvent> {
    bridge_worker_stream_with(spawn_ffmpeg_bridge)
}

fn bridge_worker_stream_with(
    spawn_bridge: fn() -> (EngineCommandSender, EngineEventReceiver),
) -> impl iced::futures::Stream<Item = BridgeEvent> {
    stream::channel(
        SUBSCRIPTION_CHANNEL_CAPACITY,
        move |mut output| async move {
            let (engine_tx, engine_rx) = spawn_bridge();
            let _ = output.send(BridgeEvent::Ready(engine_tx)).await;

            let (forward_tx, mut forward_rx) =
                futures_mpsc::channel::<BridgeEvent>(SUBSCRIPTION_CHANNEL_CAPACITY);

            thread::spawn(move || {
                let mut forward_tx = forward_tx;
                while let Ok(event) = engine_rx.recv() {
                    if executor::block_on(forward_tx.send(BridgeEvent::Event(event))).is_err() {
                        return;
                    }
                }
                let _ = executor::block_on(forward_tx.send(BridgeEvent::Disconnected));
            });

            while let Some(event) = forward_rx.next().await {
                if output.send(event).await.is_err() {
                    break;
                }
            }
        },
    )
}

/// Spawns the production bridge around the ffmpeg-backed engine.
pub fn spawn_ffmpeg_bridge() -> (EngineCommandSender, EngineEventReceiver) {
    spawn_engine_bridge(Engine::with_ffmpeg())
}

/// Spawns a worker thread that applies commands in arrival order.
///
/// Command failures are turned into [`Event::Error`] so the UI always hears
/// back about a request.
pub fn spawn_engine_bridge<M>(mut engine: Engine<M>) -> (EngineCommandSender, EngineEventReceiver)
where
    M: MediaBackend + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::sync_channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::sync_channel::<Event>(EVENT_CHANNEL_CAPACITY);

    thread::spawn(move || {
        while let Ok(command) = command_rx.recv() {
            debug!(?command, "engine command");
            match engine.handle_command(command) {
                Ok(events) => {
                    for event in events {
                        if event_tx.send(event).is_err() {
                            return;
                        }
                    }
                }
                Err(error) => {
                    warn!(%error, "engine command failed");
                    if event_tx
                        .send(Event::Error(EngineErrorEvent::from_error(&error)))
                        .is_err()
                    {
                        return;
                    }
                }
            }
        }
        debug!("engine command channel closed");
    });

    (command_tx, event_rx)
}
