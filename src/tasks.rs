//! Background fetch plumbing
//!
//! Fetches run off the UI thread and come back as [`TaskResult`] messages.
//! Each message carries the selector it was issued for so the receiving
//! controller can drop answers to questions nobody is asking any more.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::api::{Genre, MovieDetail, MovieId, MoviePage, MovieSource};
use crate::error::ApiError;

/// Background task messages
#[derive(Debug)]
pub enum TaskResult {
    GenresLoaded(Result<Vec<Genre>, ApiError>),
    PageLoaded {
        page: u32,
        result: Result<MoviePage, ApiError>,
    },
    DetailLoaded {
        id: MovieId,
        result: Result<MovieDetail, ApiError>,
    },
}

pub type Job = Box<dyn FnOnce() -> TaskResult + Send + 'static>;

/// Runs jobs somewhere and gets their results back to the UI thread
pub trait Scheduler {
    fn spawn(&self, job: Job);
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// One thread per job, results sent down an mpsc channel
pub struct ThreadScheduler {
    sender: Sender<TaskResult>,
    waker: Option<Waker>,
}

impl ThreadScheduler {
    pub fn new() -> (Self, Receiver<TaskResult>) {
        let (sender, receiver) = channel();
        (Self { sender, waker: None }, receiver)
    }

    /// Called after every delivered result, e.g. to request a repaint
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }
}

impl Scheduler for ThreadScheduler {
    fn spawn(&self, job: Job) {
        let sender = self.sender.clone();
        let waker = self.waker.clone();

        thread::spawn(move || {
            // Receiver gone means the app is shutting down
            if sender.send(job()).is_ok() {
                if let Some(wake) = waker {
                    wake();
                }
            }
        });
    }
}

/// Context for background fetch operations
pub struct FetchContext {
    source: Arc<dyn MovieSource>,
    scheduler: Box<dyn Scheduler>,
}

impl FetchContext {
    pub fn new(source: Arc<dyn MovieSource>, scheduler: Box<dyn Scheduler>) -> Self {
        Self { source, scheduler }
    }

    /// Run `fetch` against the source in the background
    pub fn spawn<F>(&self, fetch: F)
    where
        F: FnOnce(&dyn MovieSource) -> TaskResult + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        self.scheduler.spawn(Box::new(move || fetch(source.as_ref())));
    }
}
