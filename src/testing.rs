//! Test doubles: a canned movie source and a scheduler the test drives by hand

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{Genre, MovieDetail, MovieId, MoviePage, MovieSource, MovieSummary};
use crate::error::ApiError;
use crate::tasks::{Job, Scheduler, TaskResult};

#[derive(Default)]
pub struct FakeSource {
    genres: Vec<Genre>,
    fail_genres: bool,
    failing_pages: HashSet<u32>,
    missing_movies: HashSet<MovieId>,
    pub genre_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
    pub movie_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            genres: vec![
                Genre { id: 28, name: "Action".into() },
                Genre { id: 12, name: "Adventure".into() },
                Genre { id: 878, name: "Science Fiction".into() },
            ],
            ..Self::default()
        }
    }

    pub fn failing_genres(mut self) -> Self {
        self.fail_genres = true;
        self
    }

    pub fn failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    pub fn missing_movie(mut self, id: MovieId) -> Self {
        self.missing_movies.insert(id);
        self
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Two movies per page, ids `page * 100 + 1` and `page * 100 + 2`
    pub fn movies_for(page: u32) -> Vec<MovieSummary> {
        (1..=2)
            .map(|n| MovieSummary {
                id: i64::from(page) * 100 + n,
                title: format!("Page {} Movie {}", page, n),
                poster_path: Some(format!("/p{}-{}.jpg", page, n)),
                overview: "x".repeat(300),
                genre_ids: vec![28, 99],
            })
            .collect()
    }
}

impl MovieSource for FakeSource {
    fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        self.genre_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_genres {
            return Err(ApiError::Status(401));
        }
        Ok(self.genres.clone())
    }

    fn popular(&self, page: u32) -> Result<MoviePage, ApiError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_pages.contains(&page) {
            return Err(ApiError::Timeout);
        }
        Ok(MoviePage {
            results: Self::movies_for(page),
            page,
            total_pages: 500,
        })
    }

    fn movie(&self, id: MovieId) -> Result<MovieDetail, ApiError> {
        self.movie_calls.fetch_add(1, Ordering::SeqCst);
        if self.missing_movies.contains(&id) {
            return Err(ApiError::NotFound);
        }
        Ok(MovieDetail {
            id: Some(id),
            title: Some(format!("Movie {}", id)),
            ..MovieDetail::default()
        })
    }
}

/// Queues jobs instead of running them; the test decides the completion order
#[derive(Clone, Default)]
pub struct ManualScheduler {
    jobs: Rc<RefCell<VecDeque<Job>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.jobs.borrow().len()
    }

    /// Run the job queued at `index` (0 = oldest)
    pub fn run(&self, index: usize) -> TaskResult {
        let job = self
            .jobs
            .borrow_mut()
            .remove(index)
            .expect("no job queued at that index");
        job()
    }

    pub fn run_oldest(&self) -> TaskResult {
        self.run(0)
    }

    pub fn run_newest(&self) -> TaskResult {
        let last = self.pending().checked_sub(1).expect("no jobs queued");
        self.run(last)
    }

    pub fn run_all(&self) -> Vec<TaskResult> {
        let mut results = Vec::new();
        while self.pending() > 0 {
            results.push(self.run_oldest());
        }
        results
    }
}

impl Scheduler for ManualScheduler {
    fn spawn(&self, job: Job) {
        self.jobs.borrow_mut().push_back(job);
    }
}
