//! Movie Catalog
//! Browse TMDb's popular movies page by page and open any of them for details

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

mod api;
mod catalog;
mod config;
mod detail;
mod error;
mod formatter;
mod genres;
mod models;
mod scroll;
mod session;
mod tasks;
#[cfg(test)]
mod testing;

use api::{MovieId, TmdbClient};
use config::{AppConfig, API_KEY_ENV};
use formatter::{image_url, resolve_genre_tags, DetailPresentation};
use models::{CatalogViewState, DetailViewState, MovieCard, Route};
use scroll::offset_from_pixels;
use session::Session;
use tasks::{FetchContext, TaskResult, ThreadScheduler};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 80, 80);

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    if config.api_key.is_empty() {
        log::warn!(
            "No API key configured; set {} or add \"api_key\" to {}",
            API_KEY_ENV,
            AppConfig::config_path().display()
        );
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([700.0, 500.0]),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "Movie Catalog",
        options,
        Box::new(move |cc| {
            if config.dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }
            Ok(Box::new(CatalogApp::new(config, cc.egui_ctx.clone())))
        }),
    )
}

/// Things the user clicked this frame, applied once rendering is done
#[derive(Debug, Clone, Copy)]
enum UiAction {
    OpenCatalog,
    OpenDetail(MovieId),
    Page(u32),
    NextPage,
    PreviousPage,
    ToggleWishlist,
}

struct CatalogApp {
    config: AppConfig,
    session: Session,

    // Background task channel
    task_receiver: Receiver<TaskResult>,

    status_message: String,
    current_scroll_offset: f32, // Track catalog scroll offset
}

impl CatalogApp {
    fn new(config: AppConfig, egui_ctx: egui::Context) -> Self {
        let (scheduler, task_receiver) = ThreadScheduler::new();
        let scheduler = scheduler.with_waker(move || egui_ctx.request_repaint());
        let source = Arc::new(TmdbClient::from_config(&config));
        let ctx = FetchContext::new(source, Box::new(scheduler));

        let mut session = Session::new(&config, ctx);
        session.open_catalog(0);

        Self {
            config,
            session,
            task_receiver,
            status_message: "Loading popular movies...".to_string(),
            current_scroll_offset: 0.0,
        }
    }

    fn handle_result(&mut self, result: TaskResult) {
        let status = match &result {
            TaskResult::GenresLoaded(Err(e)) => Some(format!("Genres unavailable: {}", e)),
            TaskResult::GenresLoaded(Ok(_)) => None,
            TaskResult::PageLoaded { page, result: Ok(movies) } => {
                Some(format!("Loaded {} movies (page {})", movies.results.len(), page))
            }
            TaskResult::PageLoaded { result: Err(e), .. } => Some(format!("Error: {}", e)),
            TaskResult::DetailLoaded { result: Ok(_), .. } => Some("Ready".to_string()),
            TaskResult::DetailLoaded { result: Err(e), .. } => Some(format!("Error: {}", e)),
        };

        if self.session.apply(result) {
            if let Some(status) = status {
                self.status_message = status;
            }
        }
    }

    fn perform(&mut self, action: UiAction) {
        match action {
            UiAction::OpenCatalog => {
                if self.session.route() != Some(Route::Catalog) {
                    self.session.open_catalog(0);
                    self.status_message = "Loading popular movies...".to_string();
                }
            }
            UiAction::OpenDetail(id) => {
                let offset = offset_from_pixels(self.current_scroll_offset);
                self.session.open_detail(id, offset);
                self.status_message = format!("Loading movie {}...", id);
            }
            UiAction::Page(page) => {
                if self.session.change_page(page) {
                    self.status_message = format!("Loading page {}...", page);
                }
            }
            UiAction::NextPage => {
                if self.session.next_page() {
                    self.status_message = "Loading next page...".to_string();
                }
            }
            UiAction::PreviousPage => {
                if self.session.previous_page() {
                    self.status_message = "Loading previous page...".to_string();
                }
            }
            UiAction::ToggleWishlist => {
                self.session.toggle_wishlist();
            }
        }
    }

    fn show_header(&self, ui: &mut egui::Ui, action: &mut Option<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading("🎬 Movie Catalog");
            ui.separator();
            if ui.button("Home").clicked() {
                *action = Some(UiAction::OpenCatalog);
            }
            if let Some(Route::Detail(id)) = self.session.route() {
                ui.label(egui::RichText::new(format!("Movie #{}", id)).weak());
            }
        });
    }

    fn show_loading(ui: &mut egui::Ui) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
    }

    fn show_catalog(&mut self, ui: &mut egui::Ui, action: &mut Option<UiAction>) {
        let scroll_request = self.session.catalog.take_scroll_request();

        let mut scroll_area = egui::ScrollArea::vertical()
            .id_salt("catalog_scroll")
            .auto_shrink([false, false]);

        if let Some(request) = scroll_request {
            scroll_area = scroll_area.vertical_scroll_offset(request.offset());
        }

        let scroll_output = scroll_area.show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            match self.session.catalog.state() {
                CatalogViewState::Idle | CatalogViewState::Loading => Self::show_loading(ui),
                CatalogViewState::Error => {
                    ui.add_space(20.0);
                    ui.label(egui::RichText::new("Could not load movies").color(ERROR_COLOR));
                    ui.separator();
                    self.show_pagination(ui, action);
                }
                CatalogViewState::Success(cards) => {
                    if cards.is_empty() {
                        ui.label(egui::RichText::new("No movies on this page").weak());
                    }
                    for card in cards {
                        self.show_card(ui, card, action);
                    }
                    ui.separator();
                    self.show_pagination(ui, action);
                }
            }
        });

        // Track current scroll position
        self.current_scroll_offset = scroll_output.state.offset.y;
    }

    fn show_card(&self, ui: &mut egui::Ui, card: &MovieCard, action: &mut Option<UiAction>) {
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());

            if ui.link(egui::RichText::new(card.title.as_str()).strong().size(16.0)).clicked() {
                *action = Some(UiAction::OpenDetail(card.id));
            }

            if let Some(url) = image_url(&self.config.poster_base_url, card.poster_path.as_deref()) {
                ui.hyperlink_to("Poster", url);
            }

            ui.label(card.overview.as_str());

            let tags = resolve_genre_tags(&card.genre_ids, self.session.genres());
            if !tags.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for tag in tags {
                        ui.label(
                            egui::RichText::new(tag)
                                .small()
                                .background_color(ui.visuals().faint_bg_color),
                        );
                    }
                });
            }
        });
        ui.add_space(6.0);
    }

    fn show_pagination(&self, ui: &mut egui::Ui, action: &mut Option<UiAction>) {
        let pages = self.session.catalog.pagination();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.session.catalog.can_go_back(), egui::Button::new("Back"))
                .clicked()
            {
                *action = Some(UiAction::PreviousPage);
            }

            for page in 1..=pages.total_pages() {
                if ui
                    .selectable_label(page == pages.current_page(), page.to_string())
                    .clicked()
                {
                    *action = Some(UiAction::Page(page));
                }
            }

            if ui
                .add_enabled(self.session.catalog.can_go_forward(), egui::Button::new("Next"))
                .clicked()
            {
                *action = Some(UiAction::NextPage);
            }
        });
    }

    fn show_detail(&self, ui: &mut egui::Ui, action: &mut Option<UiAction>) {
        if ui.button("← Back").clicked() {
            *action = Some(UiAction::OpenCatalog);
        }

        match self.session.detail.state() {
            DetailViewState::Idle | DetailViewState::Loading => Self::show_loading(ui),
            DetailViewState::NotFound => {
                ui.add_space(20.0);
                ui.label(
                    egui::RichText::new("Movie information could not be found").color(ERROR_COLOR),
                );
            }
            DetailViewState::Success(detail) => {
                let view = DetailPresentation::from_detail(
                    detail,
                    &self.config.poster_base_url,
                    &self.config.backdrop_base_url,
                );
                egui::ScrollArea::vertical()
                    .id_salt("detail_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        self.show_detail_page(ui, &view, action);
                    });
            }
        }
    }

    fn show_detail_page(&self, ui: &mut egui::Ui, view: &DetailPresentation, action: &mut Option<UiAction>) {
        // Hero: title, tagline, rating, wishlist
        ui.horizontal(|ui| {
            ui.heading(view.title.as_str());
            if view.adult {
                ui.label(egui::RichText::new("19+").color(ERROR_COLOR).strong());
            }
        });
        if let Some(tagline) = &view.tagline {
            ui.label(egui::RichText::new(format!("\"{}\"", tagline)).italics());
        }

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("★").size(18.0).color(egui::Color32::GOLD));
            ui.label(egui::RichText::new(view.rating.as_str()).strong());
            ui.label("/10");
            ui.label(egui::RichText::new(format!("({} votes)", view.vote_count)).weak());

            let wishlisted = self.session.detail.is_wishlisted();
            let heart = if wishlisted {
                egui::RichText::new("♥ Wishlisted").color(ERROR_COLOR)
            } else {
                egui::RichText::new("♡ Wishlist")
            };
            if ui.button(heart).clicked() {
                *action = Some(UiAction::ToggleWishlist);
            }
        });

        ui.horizontal(|ui| {
            if let Some(url) = &view.poster_url {
                ui.hyperlink_to("Poster", url);
            }
            if let Some(url) = &view.backdrop_url {
                ui.hyperlink_to("Backdrop", url);
            }
        });

        // Info bar: year | runtime | 19+ | genres
        let mut info = Vec::new();
        if let Some(year) = &view.release_year {
            info.push(year.clone());
        }
        if let Some(minutes) = view.runtime_minutes {
            info.push(format!("{} min", minutes));
        }
        if view.adult {
            info.push("19+".to_string());
        }
        if let Some(genres) = &view.genres {
            info.push(genres.clone());
        }
        if !info.is_empty() {
            ui.label(info.join(" | "));
        }

        ui.separator();
        ui.heading("Overview");
        match &view.overview {
            Some(overview) => ui.label(overview.as_str()),
            None => ui.label(egui::RichText::new("No overview available.").weak()),
        };

        ui.separator();
        ui.heading("Details");
        egui::Grid::new("detail_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                let rows = [
                    ("Original Title", &view.original_title),
                    ("Release Date", &view.release_date),
                    ("Runtime", &view.runtime),
                    ("Country", &view.country),
                    ("Language", &view.language),
                    ("Revenue", &view.revenue),
                    ("Genres", &view.genres),
                ];
                for (label, value) in rows {
                    if let Some(value) = value {
                        ui.label(egui::RichText::new(label).weak());
                        ui.label(value.as_str());
                        ui.end_row();
                    }
                }
            });

        ui.separator();
        ui.heading("Production Companies");
        if view.companies.is_empty() {
            ui.label(egui::RichText::new("No production company information available").weak());
        } else {
            for company in &view.companies {
                ui.horizontal(|ui| {
                    ui.label(company.name.as_str());
                    if let Some(url) = &company.logo_url {
                        ui.hyperlink_to("Logo", url);
                    }
                });
            }
        }
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process background task results (non-blocking)
        while let Ok(result) = self.task_receiver.try_recv() {
            self.handle_result(result);
        }

        let mut action = None;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.show_header(ui, &mut action);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(egui::RichText::new(self.status_message.as_str()).small());
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.session.route() {
            Some(Route::Detail(_)) => self.show_detail(ui, &mut action),
            _ => self.show_catalog(ui, &mut action),
        });

        if let Some(action) = action {
            self.perform(action);
        }
    }
}
