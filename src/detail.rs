//! Single-movie detail loading

use crate::api::{MovieDetail, MovieId};
use crate::error::{ApiError, ErrorKind};
use crate::genres::GenreResolver;
use crate::models::DetailViewState;
use crate::tasks::{FetchContext, TaskResult};

#[derive(Debug, Default)]
pub struct DetailController {
    current_id: Option<MovieId>,
    state: DetailViewState,
    // Local only; resets with every load
    wishlisted: bool,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show movie `id`. Whatever was loaded or loading before is abandoned.
    pub fn load_detail(&mut self, id: MovieId, ctx: &FetchContext, genres: &mut GenreResolver) {
        if let Some(previous) = self.current_id.filter(|prev| *prev != id) {
            log::debug!("Leaving movie {} for {}", previous, id);
        }

        self.current_id = Some(id);
        self.state = DetailViewState::Loading;
        self.wishlisted = false;

        genres.resolve(ctx);

        log::info!("Loading movie {}", id);
        ctx.spawn(move |source| TaskResult::DetailLoaded {
            id,
            result: source.movie(id),
        });
    }

    /// Apply a detail fetch. Returns false when `id` is not the movie
    /// currently requested and the result was dropped.
    pub fn apply_detail(&mut self, id: MovieId, result: Result<MovieDetail, ApiError>) -> bool {
        if self.current_id != Some(id) || self.state != DetailViewState::Loading {
            log::debug!(
                "Discarding stale response for movie {} (current {:?})",
                id,
                self.current_id
            );
            return false;
        }

        self.state = match result {
            Ok(detail) if detail.id.is_some() => {
                log::info!(
                    "Loaded movie {}: {}",
                    id,
                    detail.title.as_deref().unwrap_or("<untitled>")
                );
                DetailViewState::Success(Box::new(detail))
            }
            Ok(_) => {
                log::warn!("Movie {} response carried no record", id);
                DetailViewState::NotFound
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::NotFound => log::warn!("Movie {} not found", id),
                    ErrorKind::FetchFailure => log::warn!("Failed to fetch movie {}: {}", id, e),
                }
                DetailViewState::NotFound
            }
        };
        true
    }

    /// The detail view was closed; late results for it are dropped
    pub fn deactivate(&mut self) {
        self.current_id = None;
        self.state = DetailViewState::Idle;
        self.wishlisted = false;
    }

    pub fn toggle_wishlist(&mut self) -> bool {
        self.wishlisted = !self.wishlisted;
        self.wishlisted
    }

    pub fn is_wishlisted(&self) -> bool {
        self.wishlisted
    }

    pub fn current_id(&self) -> Option<MovieId> {
        self.current_id
    }

    pub fn state(&self) -> &DetailViewState {
        &self.state
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.state.detail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSource, ManualScheduler};
    use std::sync::Arc;

    struct Harness {
        scheduler: ManualScheduler,
        ctx: FetchContext,
        genres: GenreResolver,
        detail: DetailController,
    }

    impl Harness {
        fn new(source: FakeSource) -> Self {
            let scheduler = ManualScheduler::new();
            let ctx = FetchContext::new(Arc::new(source), Box::new(scheduler.clone()));
            Self {
                scheduler,
                ctx,
                genres: GenreResolver::new(),
                detail: DetailController::new(),
            }
        }

        fn load(&mut self, id: MovieId) {
            self.detail.load_detail(id, &self.ctx, &mut self.genres);
        }

        fn deliver(&mut self, result: TaskResult) -> bool {
            match result {
                TaskResult::GenresLoaded(result) => {
                    self.genres.apply(result);
                    true
                }
                TaskResult::DetailLoaded { id, result } => self.detail.apply_detail(id, result),
                other => panic!("unexpected result: {:?}", other),
            }
        }

        /// Run the queued detail fetches, newest first
        fn deliver_details_reversed(&mut self) {
            let mut results = self.scheduler.run_all();
            results.reverse();
            for result in results {
                self.deliver(result);
            }
        }
    }

    #[test]
    fn test_load_success() {
        let mut h = Harness::new(FakeSource::new());
        h.load(27205);
        assert_eq!(h.detail.state(), &DetailViewState::Loading);

        for result in h.scheduler.run_all() {
            h.deliver(result);
        }
        let detail = h.detail.detail().unwrap();
        assert_eq!(detail.id, Some(27205));
        assert_eq!(detail.title.as_deref(), Some("Movie 27205"));
    }

    #[test]
    fn test_last_requested_id_wins_in_order() {
        let mut h = Harness::new(FakeSource::new());
        h.load(27205);
        h.detail.toggle_wishlist();
        h.load(157336);

        for result in h.scheduler.run_all() {
            h.deliver(result);
        }
        assert_eq!(h.detail.detail().unwrap().id, Some(157336));
        assert!(!h.detail.is_wishlisted());
    }

    #[test]
    fn test_last_requested_id_wins_reversed() {
        let mut h = Harness::new(FakeSource::new());
        h.load(27205);
        assert!(h.detail.toggle_wishlist());
        h.load(157336);

        h.deliver_details_reversed();
        assert_eq!(h.detail.current_id(), Some(157336));
        assert_eq!(h.detail.detail().unwrap().id, Some(157336));
        assert!(!h.detail.is_wishlisted());
    }

    #[test]
    fn test_superseded_id_never_shown() {
        let mut h = Harness::new(FakeSource::new());
        h.load(27205);
        h.load(157336);

        // Old movie arrives first while the new one is still loading
        let old = h.scheduler.run(1);
        assert!(!h.deliver(old));
        assert_eq!(h.detail.state(), &DetailViewState::Loading);
    }

    #[test]
    fn test_not_found() {
        let mut h = Harness::new(FakeSource::new().missing_movie(42));
        h.load(42);
        for result in h.scheduler.run_all() {
            h.deliver(result);
        }
        assert_eq!(h.detail.state(), &DetailViewState::NotFound);
        assert!(h.detail.detail().is_none());
    }

    #[test]
    fn test_record_without_id_is_not_found() {
        let mut h = Harness::new(FakeSource::new());
        h.load(7);
        assert!(h.detail.apply_detail(7, Ok(MovieDetail::default())));
        assert_eq!(h.detail.state(), &DetailViewState::NotFound);
    }

    #[test]
    fn test_record_with_null_fields_is_shown() {
        let mut h = Harness::new(FakeSource::new());
        h.load(550);
        let record = serde_json::from_str::<MovieDetail>(
            r#"{"id":550,"title":"Fight Club","adult":null,
                "production_companies":[{"id":1,"name":null,"logo_path":null}]}"#,
        );
        assert!(h.detail.apply_detail(550, record.map_err(ApiError::from)));
        assert_eq!(h.detail.detail().unwrap().title.as_deref(), Some("Fight Club"));
    }

    #[test]
    fn test_transport_failure_is_not_found() {
        let mut h = Harness::new(FakeSource::new());
        h.load(7);
        assert!(h.detail.apply_detail(7, Err(ApiError::Timeout)));
        assert_eq!(h.detail.state(), &DetailViewState::NotFound);
    }

    #[test]
    fn test_wishlist_toggles_and_resets() {
        let mut h = Harness::new(FakeSource::new());
        h.load(1);
        assert!(!h.detail.is_wishlisted());
        assert!(h.detail.toggle_wishlist());
        assert!(!h.detail.toggle_wishlist());
        h.detail.toggle_wishlist();

        h.load(1);
        assert!(!h.detail.is_wishlisted());
    }

    #[test]
    fn test_results_after_deactivate_dropped() {
        let mut h = Harness::new(FakeSource::new());
        h.load(5);
        h.detail.deactivate();

        for result in h.scheduler.run_all() {
            h.deliver(result);
        }
        assert_eq!(h.detail.state(), &DetailViewState::Idle);
        assert_eq!(h.detail.current_id(), None);
    }
}
