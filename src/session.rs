//! One browsing session: navigation events in, controller calls out

use crate::api::MovieId;
use crate::catalog::CatalogController;
use crate::config::AppConfig;
use crate::detail::DetailController;
use crate::genres::GenreResolver;
use crate::models::{GenreMap, Route};
use crate::scroll::ScrollPositionStore;
use crate::tasks::{FetchContext, TaskResult};

pub struct Session {
    ctx: FetchContext,
    route: Option<Route>,
    genres: GenreResolver,
    scroll: ScrollPositionStore,
    pub catalog: CatalogController,
    pub detail: DetailController,
}

impl Session {
    pub fn new(config: &AppConfig, ctx: FetchContext) -> Self {
        Self {
            ctx,
            route: None,
            genres: GenreResolver::new(),
            scroll: ScrollPositionStore::new(),
            catalog: CatalogController::new(config.total_pages(), config.overview_limit),
            detail: DetailController::new(),
        }
    }

    pub fn route(&self) -> Option<Route> {
        self.route
    }

    pub fn genres(&self) -> &GenreMap {
        self.genres.map()
    }

    /// Leave the current view (reporting its scroll offset) and enter `route`
    pub fn navigate(&mut self, route: Route, scroll_offset: u32) {
        match self.route {
            Some(Route::Catalog) => self.catalog.deactivate(scroll_offset, &mut self.scroll),
            Some(Route::Detail(_)) => self.detail.deactivate(),
            None => {}
        }

        log::debug!("Navigating to {:?}", route);
        self.route = Some(route);

        match route {
            Route::Catalog => self.catalog.activate(&self.ctx, &mut self.genres, &self.scroll),
            Route::Detail(id) => self.detail.load_detail(id, &self.ctx, &mut self.genres),
        }
    }

    pub fn open_catalog(&mut self, scroll_offset: u32) {
        self.navigate(Route::Catalog, scroll_offset);
    }

    pub fn open_detail(&mut self, id: MovieId, scroll_offset: u32) {
        self.navigate(Route::Detail(id), scroll_offset);
    }

    pub fn change_page(&mut self, page: u32) -> bool {
        self.catalog.request_page(page, &self.ctx, &mut self.genres)
    }

    pub fn next_page(&mut self) -> bool {
        self.catalog.next_page(&self.ctx, &mut self.genres)
    }

    pub fn previous_page(&mut self) -> bool {
        self.catalog.previous_page(&self.ctx, &mut self.genres)
    }

    pub fn toggle_wishlist(&mut self) -> bool {
        self.detail.toggle_wishlist()
    }

    /// Hand a finished background task to whoever asked for it.
    /// Returns false if the result was stale and dropped.
    pub fn apply(&mut self, result: TaskResult) -> bool {
        match result {
            TaskResult::GenresLoaded(result) => {
                self.genres.apply(result);
                true
            }
            TaskResult::PageLoaded { page, result } => self.catalog.apply_page(page, result),
            TaskResult::DetailLoaded { id, result } => self.detail.apply_detail(id, result),
        }
    }

    /// End of session: drop everything that only lives this long
    pub fn end(&mut self) {
        self.scroll.clear();
        self.detail.deactivate();
        self.route = None;
    }
}
