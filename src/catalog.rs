//! Paginated popular-movies listing

use crate::api::MoviePage;
use crate::error::ApiError;
use crate::formatter::truncate_overview;
use crate::genres::GenreResolver;
use crate::models::{CatalogViewState, MovieCard, PaginationState, ScrollRequest};
use crate::scroll::ScrollPositionStore;
use crate::tasks::{FetchContext, TaskResult};

/// Scroll store key of the catalog view
pub const CATALOG_VIEW_KEY: &str = "home";

#[derive(Debug)]
pub struct CatalogController {
    pagination: PaginationState,
    state: CatalogViewState,
    overview_limit: usize,
    pending_scroll: Option<ScrollRequest>,
}

impl CatalogController {
    pub fn new(total_pages: u32, overview_limit: usize) -> Self {
        Self {
            pagination: PaginationState::new(total_pages),
            state: CatalogViewState::Idle,
            overview_limit,
            pending_scroll: None,
        }
    }

    /// The catalog view was (re)opened: refetch the current page and queue a
    /// restore of the saved scroll offset for once the list is there.
    pub fn activate(
        &mut self,
        ctx: &FetchContext,
        genres: &mut GenreResolver,
        store: &ScrollPositionStore,
    ) {
        self.pending_scroll = store.restore(CATALOG_VIEW_KEY).map(ScrollRequest::Restore);
        self.fetch_current(ctx, genres);
    }

    /// The catalog view is being left with the viewport at `offset`
    pub fn deactivate(&mut self, offset: u32, store: &mut ScrollPositionStore) {
        store.save(CATALOG_VIEW_KEY, offset);
        self.pending_scroll = None;
    }

    /// Switch to `page`. Out-of-range pages are ignored and return false.
    pub fn request_page(&mut self, page: u32, ctx: &FetchContext, genres: &mut GenreResolver) -> bool {
        if !self.pagination.set_page(page) {
            log::debug!(
                "Ignoring page {} (valid: 1-{})",
                page,
                self.pagination.total_pages()
            );
            return false;
        }
        self.pending_scroll = Some(ScrollRequest::Top);
        self.fetch_current(ctx, genres);
        true
    }

    pub fn next_page(&mut self, ctx: &FetchContext, genres: &mut GenreResolver) -> bool {
        let page = self.pagination.current_page() + 1;
        self.request_page(page, ctx, genres)
    }

    pub fn previous_page(&mut self, ctx: &FetchContext, genres: &mut GenreResolver) -> bool {
        let page = self.pagination.current_page().saturating_sub(1);
        self.request_page(page, ctx, genres)
    }

    pub fn can_go_back(&self) -> bool {
        self.pagination.has_previous()
    }

    pub fn can_go_forward(&self) -> bool {
        self.pagination.has_next()
    }

    fn fetch_current(&mut self, ctx: &FetchContext, genres: &mut GenreResolver) {
        let page = self.pagination.current_page();
        self.state = CatalogViewState::Loading;

        genres.resolve(ctx);

        log::info!("Loading popular movies, page {}", page);
        ctx.spawn(move |source| TaskResult::PageLoaded {
            page,
            result: source.popular(page),
        });
    }

    /// Apply a page fetch. Returns false when the result was for a page that
    /// is no longer current and got dropped.
    pub fn apply_page(&mut self, page: u32, result: Result<MoviePage, ApiError>) -> bool {
        if page != self.pagination.current_page() || !self.state.is_loading() {
            log::debug!(
                "Discarding stale response for page {} (current page {})",
                page,
                self.pagination.current_page()
            );
            return false;
        }

        match result {
            Ok(movie_page) => {
                let cards: Vec<MovieCard> = movie_page
                    .results
                    .into_iter()
                    .map(|movie| MovieCard {
                        id: movie.id,
                        title: movie.title,
                        poster_path: movie.poster_path,
                        overview: truncate_overview(&movie.overview, self.overview_limit),
                        genre_ids: movie.genre_ids,
                    })
                    .collect();
                log::info!("Loaded {} movies for page {}", cards.len(), page);
                self.state = CatalogViewState::Success(cards);
            }
            Err(e) => {
                log::warn!("Failed to fetch movies for page {}: {}", page, e);
                self.state = CatalogViewState::Error;
            }
        }
        true
    }

    /// Scroll the view should perform now, if any. A restore is held back
    /// while the page is still loading so it lands on a laid-out list.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        match self.pending_scroll {
            Some(ScrollRequest::Restore(_)) if self.state.is_loading() => None,
            _ => self.pending_scroll.take(),
        }
    }

    pub fn cards(&self) -> &[MovieCard] {
        self.state.cards()
    }

    pub fn state(&self) -> &CatalogViewState {
        &self.state
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
