//! Genre taxonomy, fetched once per session

use crate::api::Genre;
use crate::error::ApiError;
use crate::models::GenreMap;
use crate::tasks::{FetchContext, TaskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveStatus {
    #[default]
    Unresolved,
    InFlight,
    Resolved,
    /// Terminal: the map stays empty for the rest of the session
    Failed,
}

#[derive(Debug, Default)]
pub struct GenreResolver {
    status: ResolveStatus,
    map: GenreMap,
}

impl GenreResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the taxonomy fetch if nobody has yet, and return the map as it
    /// stands. Callers arriving while the fetch is in flight join it.
    pub fn resolve(&mut self, ctx: &FetchContext) -> &GenreMap {
        if self.status == ResolveStatus::Unresolved {
            log::info!("Fetching genre list");
            self.status = ResolveStatus::InFlight;
            ctx.spawn(|source| TaskResult::GenresLoaded(source.genres()));
        }
        &self.map
    }

    pub fn apply(&mut self, result: Result<Vec<Genre>, ApiError>) {
        match result {
            Ok(genres) => {
                self.map.extend(genres);
                self.status = ResolveStatus::Resolved;
                log::info!("Loaded {} genres", self.map.len());
            }
            Err(e) => {
                self.status = ResolveStatus::Failed;
                log::warn!("Failed to fetch genres: {}; genre tags will be empty", e);
            }
        }
    }

    pub fn map(&self) -> &GenreMap {
        &self.map
    }

    pub fn status(&self) -> ResolveStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSource, ManualScheduler};
    use std::sync::Arc;

    fn context(source: &Arc<FakeSource>) -> (FetchContext, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let ctx = FetchContext::new(source.clone(), Box::new(scheduler.clone()));
        (ctx, scheduler)
    }

    fn deliver(resolver: &mut GenreResolver, result: TaskResult) {
        match result {
            TaskResult::GenresLoaded(result) => resolver.apply(result),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_resolves_share_one_request() {
        let source = Arc::new(FakeSource::new());
        let (ctx, scheduler) = context(&source);
        let mut resolver = GenreResolver::new();

        assert!(resolver.resolve(&ctx).is_empty());
        assert!(resolver.resolve(&ctx).is_empty());
        assert_eq!(resolver.status(), ResolveStatus::InFlight);
        assert_eq!(scheduler.pending(), 1);

        deliver(&mut resolver, scheduler.run_oldest());
        assert_eq!(FakeSource::calls(&source.genre_calls), 1);

        let first = resolver.resolve(&ctx).clone();
        let second = resolver.resolve(&ctx).clone();
        assert_eq!(first, second);
        assert_eq!(first.get(28), Some("Action"));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_failure_leaves_empty_map_and_does_not_retry() {
        let source = Arc::new(FakeSource::new().failing_genres());
        let (ctx, scheduler) = context(&source);
        let mut resolver = GenreResolver::new();

        resolver.resolve(&ctx);
        deliver(&mut resolver, scheduler.run_oldest());

        assert_eq!(resolver.status(), ResolveStatus::Failed);
        assert!(resolver.map().is_empty());

        resolver.resolve(&ctx);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(FakeSource::calls(&source.genre_calls), 1);
    }
}
