//! Message queues between the GUI model and whatever carries its traffic.
//!
//! A `Connection<T>` is one direction of a socket as seen from a single
//! execution context: the producer side calls `send`, the consumer side drains
//! with `try_recv`. Nothing here blocks.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Unbounded queue; `send` only fails once the receiver is gone.
    InProcess,
    /// Fixed-capacity queue; `send` fails with `QueueFull` when saturated.
    Bounded,
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub kind: ConnectionKind,
    pub queue_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            kind: ConnectionKind::InProcess,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("send failed")]
    SendFailed,
    #[error("queue full (capacity {0})")]
    QueueFull(usize),
    #[error("receive failed")]
    RecvFailed,
}

pub trait Connection<T>: Send {
    fn send(&self, value: T) -> Result<(), ConnectionError>;
    fn try_recv(&self) -> Result<Option<T>, ConnectionError>;

    /// Pops every queued value in FIFO order.
    fn drain(&self) -> Result<Vec<T>, ConnectionError> {
        let mut values = Vec::new();
        while let Some(value) = self.try_recv()? {
            values.push(value);
        }
        Ok(values)
    }
}

#[derive(Debug)]
pub struct InProcessConnection<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> InProcessConnection<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }
}

impl<T> Default for InProcessConnection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Connection<T> for InProcessConnection<T> {
    fn send(&self, value: T) -> Result<(), ConnectionError> {
        self.sender
            .send(value)
            .map_err(|_| ConnectionError::SendFailed)
    }

    fn try_recv(&self) -> Result<Option<T>, ConnectionError> {
        recv_from(&self.receiver)
    }
}

#[derive(Debug)]
pub struct BoundedConnection<T> {
    capacity: usize,
    sender: SyncSender<T>,
    receiver: Receiver<T>,
}

impl<T> BoundedConnection<T> {
    /// A capacity of zero is clamped to one; a rendezvous queue would reject
    /// every send on a single thread.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::sync_channel(capacity);
        Self {
            capacity,
            sender,
            receiver,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Send + 'static> Connection<T> for BoundedConnection<T> {
    fn send(&self, value: T) -> Result<(), ConnectionError> {
        self.sender.try_send(value).map_err(|err| match err {
            mpsc::TrySendError::Full(_) => {
                log::warn!("outbound queue saturated at {} messages", self.capacity);
                ConnectionError::QueueFull(self.capacity)
            }
            mpsc::TrySendError::Disconnected(_) => ConnectionError::SendFailed,
        })
    }

    fn try_recv(&self) -> Result<Option<T>, ConnectionError> {
        recv_from(&self.receiver)
    }
}

fn recv_from<T>(receiver: &Receiver<T>) -> Result<Option<T>, ConnectionError> {
    match receiver.try_recv() {
        Ok(value) => Ok(Some(value)),
        Err(mpsc::TryRecvError::Empty) => Ok(None),
        Err(mpsc::TryRecvError::Disconnected) => Err(ConnectionError::RecvFailed),
    }
}

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn create<T: Send + 'static>(config: &ConnectionConfig) -> Box<dyn Connection<T>> {
        match config.kind {
            ConnectionKind::InProcess => Box::new(InProcessConnection::new()),
            ConnectionKind::Bounded => Box::new(BoundedConnection::new(config.queue_capacity)),
        }
    }
}
