//! Data models for the movie catalog

use std::collections::HashMap;

use crate::api::{Genre, MovieDetail, MovieId};

/// Where the shell currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Detail(MovieId),
}

/// Genre id -> name lookup. Only grows; readers must tolerate it being empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreMap {
    names: HashMap<i64, String>,
}

impl GenreMap {
    pub fn get(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Insert-only merge; an id already present keeps its first name.
    /// Nameless entries are skipped.
    pub(crate) fn extend(&mut self, genres: impl IntoIterator<Item = Genre>) {
        for genre in genres.into_iter().filter(|g| !g.name.is_empty()) {
            self.names.entry(genre.id).or_insert(genre.name);
        }
    }
}

/// Movie summary as stored by the catalog (overview already truncated)
#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: String,
    pub genre_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    total_pages: u32,
}

impl PaginationState {
    pub fn new(total_pages: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: total_pages.max(1),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    /// Move to `page` if it is in range. Returns false and leaves the state
    /// untouched otherwise.
    pub fn set_page(&mut self, page: u32) -> bool {
        if !self.contains(page) {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(5)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CatalogViewState {
    #[default]
    Idle,
    Loading,
    Success(Vec<MovieCard>),
    Error,
}

impl CatalogViewState {
    /// Cards to render; empty unless the last fetch succeeded
    pub fn cards(&self) -> &[MovieCard] {
        match self {
            CatalogViewState::Success(cards) => cards,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogViewState::Loading)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailViewState {
    #[default]
    Idle,
    Loading,
    Success(Box<MovieDetail>),
    NotFound,
}

impl DetailViewState {
    pub fn detail(&self) -> Option<&MovieDetail> {
        match self {
            DetailViewState::Success(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Scroll the view should perform on its next frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    Top,
    Restore(u32),
}

impl ScrollRequest {
    pub fn offset(&self) -> f32 {
        match self {
            ScrollRequest::Top => 0.0,
            ScrollRequest::Restore(y) => *y as f32,
        }
    }
}
