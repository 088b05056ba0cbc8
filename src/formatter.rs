//! Display-ready values derived from raw API fields
//!
//! Everything here is pure. Absent inputs produce a placeholder or `None`,
//! never an error.

use chrono::NaiveDate;

use crate::api::{Genre, MovieDetail, ProductionCompany};
use crate::models::GenreMap;

pub const OVERVIEW_LIMIT: usize = 235;

const NOT_AVAILABLE: &str = "N/A";

/// Cut `text` to `limit` characters and append `"..."` if it is longer
pub fn truncate_overview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `"198 min (3h 18m)"`, or `"N/A"` for absent/zero runtimes
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => NOT_AVAILABLE.to_string(),
        Some(m) => format!("{} min ({}h {}m)", m, m / 60, m % 60),
    }
}

/// `"$760,400,000"`, or `"N/A"` for absent/zero revenue
pub fn format_revenue(amount: Option<u64>) -> String {
    match amount {
        None | Some(0) => NOT_AVAILABLE.to_string(),
        Some(a) => format!("${}", group_thousands(a)),
    }
}

/// `"2014-11-05"` -> `"November 5, 2014"`
pub fn format_release_date(iso_date: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(iso_date.trim(), "%Y-%m-%d").ok()?;
    Some(date.format("%B %-d, %Y").to_string())
}

/// Year part of an ISO date, as shown in the detail info bar
pub fn release_year(iso_date: &str) -> Option<&str> {
    let year = iso_date.split('-').next()?.trim();
    if year.is_empty() { None } else { Some(year) }
}

/// Names for the ids the map knows; unknown ids are skipped
pub fn resolve_genre_tags<'a>(genre_ids: &[i64], genres: &'a GenreMap) -> Vec<&'a str> {
    genre_ids.iter().filter_map(|id| genres.get(*id)).collect()
}

pub fn join_genre_names(genres: &[Genre]) -> String {
    genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ")
}

/// One decimal place; a missing average shows as `"0.0"`
pub fn format_rating(vote_average: Option<f64>) -> String {
    format!("{:.1}", vote_average.unwrap_or(0.0))
}

pub fn format_vote_count(count: Option<u64>) -> String {
    group_thousands(count.unwrap_or(0))
}

/// CDN base + path, `None` when there is no path
pub fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!("{}{}", base.trim_end_matches('/'), path))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Company card on the detail page
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyCard {
    pub name: String,
    pub logo_url: Option<String>,
}

/// Every string the detail page shows, derived in one pass
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPresentation {
    pub title: String,
    pub original_title: Option<String>,
    pub tagline: Option<String>,
    pub adult: bool,
    pub rating: String,
    pub vote_count: String,
    pub release_year: Option<String>,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub runtime: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub revenue: Option<String>,
    pub genres: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub companies: Vec<CompanyCard>,
}

impl DetailPresentation {
    pub fn from_detail(detail: &MovieDetail, poster_base: &str, backdrop_base: &str) -> Self {
        let release = detail.release_date.as_deref().filter(|d| !d.is_empty());
        let runtime = detail.runtime.filter(|m| *m > 0);
        let revenue = detail.revenue.filter(|r| *r > 0);

        Self {
            title: detail
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            original_title: non_empty(detail.original_title.as_deref()),
            tagline: non_empty(detail.tagline.as_deref()),
            adult: detail.adult,
            rating: format_rating(detail.vote_average),
            vote_count: format_vote_count(detail.vote_count),
            release_year: release.and_then(release_year).map(str::to_string),
            release_date: release.and_then(format_release_date),
            runtime_minutes: runtime,
            runtime: runtime.map(|m| format_runtime(Some(m))),
            country: detail
                .production_countries
                .first()
                .and_then(|c| non_empty(c.name.as_deref())),
            language: detail
                .spoken_languages
                .first()
                .and_then(|l| non_empty(l.english_name.as_deref())),
            revenue: revenue.map(|r| format_revenue(Some(r))),
            genres: if detail.genres.is_empty() {
                None
            } else {
                Some(join_genre_names(&detail.genres))
            },
            overview: non_empty(detail.overview.as_deref()),
            poster_url: image_url(poster_base, detail.poster_path.as_deref()),
            backdrop_url: image_url(backdrop_base, detail.backdrop_path.as_deref()),
            companies: detail
                .production_companies
                .iter()
                .map(|c| company_card(c, poster_base))
                .collect(),
        }
    }
}

fn company_card(company: &ProductionCompany, logo_base: &str) -> CompanyCard {
    CompanyCard {
        name: company.name.clone(),
        logo_url: image_url(logo_base, company.logo_path.as_deref()),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}
