//! The client runtime: one update loop over one server connection.
//!
//! ```text
//!   reader task ──Inbound──► channel ──► frame(delta)
//!                                          1. retry rescheduled replies
//!                                          2. dispatch new replies, in order
//!                                          3. run update tasks
//! ```
//!
//! The world is owned here and only ever touched from `frame`, so nothing
//! in it needs a lock.

use std::sync::Arc;
use std::time::Duration;

use lumen_transport::Connection;
use lumen_update::{DrainReport, FrameClock, UpdateTaskManager};
use lumen_world::World;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::LumenError;
use crate::config::ClientConfig;
use crate::dispatch::{Dispatcher, RetryReport};
use crate::execute::ExecContext;
use crate::network::{Inbound, ServerConnection, spawn_reader};

/// What one call to [`ClientRuntime::frame`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub retry: RetryReport,
    /// New replies taken off the channel this frame.
    pub dispatched: usize,
    pub tasks: DrainReport,
    /// The connection is gone; later frames only drain update tasks.
    pub disconnected: bool,
}

pub struct ClientRuntime<W: World> {
    world: W,
    dispatcher: Dispatcher,
    tasks: UpdateTaskManager<W>,
    inbound: mpsc::Receiver<Inbound>,
    clock: FrameClock,
    connection: Option<Arc<ServerConnection>>,
    reader: Option<JoinHandle<()>>,
    disconnect_reason: Option<String>,
}

impl<W: World> ClientRuntime<W> {
    /// Builds a runtime fed by `inbound` with no connection of its own.
    ///
    /// Whatever holds the matching sender plays the part of the reader
    /// task.
    pub fn new(config: &ClientConfig, world: W, inbound: mpsc::Receiver<Inbound>) -> Self {
        Self {
            world,
            dispatcher: Dispatcher::new(config.retry.clone()),
            tasks: UpdateTaskManager::new(config.update.clone()),
            inbound,
            clock: FrameClock::new(config.frame.clone()),
            connection: None,
            reader: None,
            disconnect_reason: None,
        }
    }

    /// Connects to the configured server and starts reading from it.
    pub async fn connect(config: &ClientConfig, world: W) -> Result<Self, LumenError> {
        let config = config.clone().validated();
        info!(server = %config.server, transport = ?config.transport, "connecting");

        let conn = Arc::new(ServerConnection::open(&config).await?);
        let (sender, receiver) = mpsc::channel(config.inbound_capacity);
        let reader = spawn_reader(Arc::clone(&conn), sender);
        info!(conn_id = %conn.id(), "connected");

        let mut runtime = Self::new(&config, world, receiver);
        runtime.connection = Some(conn);
        runtime.reader = Some(reader);
        Ok(runtime)
    }

    /// Runs one processing pass.
    pub fn frame(&mut self, delta: Duration) -> FrameReport {
        let mut report = FrameReport::default();

        if self.disconnect_reason.is_none() {
            let mut cx = ExecContext::new(&mut self.world, &self.tasks);
            report.retry = self.dispatcher.retry_pending(&mut cx);

            let mut lost = None;
            while lost.is_none() {
                match self.inbound.try_recv() {
                    Ok(Inbound::Reply(reply)) => {
                        report.dispatched += 1;
                        self.dispatcher.dispatch(reply, &mut cx);
                        if cx.disconnect_requested() {
                            lost = Some("logged out by server".to_string());
                        }
                    }
                    Ok(Inbound::Disconnected { reason }) => lost = Some(reason),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => lost = Some("reader task stopped".to_string()),
                }
            }

            if let Some(reason) = lost {
                self.handle_disconnect(reason);
            }
        }

        report.tasks = self.tasks.run_pending(&mut self.world, delta);
        report.disconnected = self.disconnect_reason.is_some();
        trace!(
            retried = report.retry.attempted,
            dispatched = report.dispatched,
            tasks = report.tasks.executed,
            "frame processed"
        );
        report
    }

    /// Drops the reschedule queue and the reader. Update tasks already
    /// queued are the effects of replies that succeeded, so they stay and
    /// run in this frame's drain.
    fn handle_disconnect(&mut self, reason: String) {
        info!(%reason, "disconnected");
        self.dispatcher.on_disconnect();
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.connection = None;
        self.disconnect_reason = Some(reason);
    }

    /// Runs frames on the frame clock until the connection goes away.
    ///
    /// Returns at once in manual mode; call [`frame`](Self::frame)
    /// directly then.
    pub async fn run(&mut self) {
        if self.clock.is_manual() {
            warn!("frame clock is in manual mode, run() has nothing to drive");
            return;
        }

        while self.disconnect_reason.is_none() {
            let info = self.clock.wait_for_frame().await;
            self.frame(info.delta);
            self.clock.record_frame_end();
        }
        debug!(
            frames = self.clock.frame_count(),
            overruns = self.clock.overruns(),
            "update loop finished"
        );
    }

    /// Closes the connection and stops the reader.
    ///
    /// Queued update tasks are kept; a later [`frame`](Self::frame) still
    /// runs them.
    pub async fn shutdown(&mut self) {
        if let Some(conn) = self.connection.take() {
            if let Err(e) = conn.close().await {
                debug!(error = %e, "close failed");
            }
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if self.disconnect_reason.is_none() {
            self.dispatcher.on_disconnect();
            self.disconnect_reason = Some("shut down by client".to_string());
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// A handle to the update task queue, for the GUI side to post work.
    pub fn tasks(&self) -> &UpdateTaskManager<W> {
        &self.tasks
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnect_reason.is_some()
    }

    pub fn disconnect_reason(&self) -> Option<&str> {
        self.disconnect_reason.as_deref()
    }
}
