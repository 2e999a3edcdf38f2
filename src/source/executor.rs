use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use super::{FetchRequest, Match, MatchSource};
use crate::error::Result;

#[derive(Debug)]
pub struct FetchCompletion {
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<Match>>,
}

/// Runs each fetch on its own worker thread and queues completions for the
/// event loop. Requests are never cancelled; callers filter completions by
/// generation.
pub struct FetchExecutor {
    source: Arc<dyn MatchSource>,
    completion_tx: Sender<FetchCompletion>,
    completion_rx: Receiver<FetchCompletion>,
}

impl FetchExecutor {
    pub fn new(source: Arc<dyn MatchSource>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<FetchCompletion>();
        Self {
            source,
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let result = source.fetch(&request.query);
            let _ = completion_tx.send(FetchCompletion {
                generation: request.generation,
                query: request.query,
                result,
            });
        });
    }

    pub fn drain_ready(&self) -> Vec<FetchCompletion> {
        let mut out = Vec::<FetchCompletion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Blocks for at most `timeout` waiting for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchCompletion> {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
