//! TMDb API client

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::ApiError;

pub type MovieId = i64;

/// TMDb sends `null` as often as it omits a key; treat both the same
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// Full movie record. TMDb omits or nulls fields freely, so everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(default)]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
}

/// Read-only source of catalog data. Implementations are called from worker threads.
pub trait MovieSource: Send + Sync {
    fn genres(&self) -> Result<Vec<Genre>, ApiError>;
    fn popular(&self, page: u32) -> Result<MoviePage, ApiError>;
    fn movie(&self, id: MovieId) -> Result<MovieDetail, ApiError>;
}

pub struct TmdbClient {
    base_url: String,
    api_key: String,
    language: String,
    agent: ureq::Agent,
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str, language: &str) -> Self {
        Self::with_timeouts(
            base_url,
            api_key,
            language,
            Duration::from_secs(20),
            Duration::from_secs(10),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        api_key: &str,
        language: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .timeout_connect(Some(connect_timeout))
            .build()
            .new_agent();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
            agent,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_timeouts(
            &config.api_base_url,
            &config.api_key,
            &config.language,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}{}?api_key={}&language={}",
            self.base_url, path, self.api_key, self.language
        )
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let mut response = self
            .agent
            .get(url)
            .header("Accept", "application/json")
            .call()?;

        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl MovieSource for TmdbClient {
    fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        let url = self.api_url("/genre/movie/list");
        let list: GenreList = self.get_json(&url)?;
        Ok(list.genres)
    }

    fn popular(&self, page: u32) -> Result<MoviePage, ApiError> {
        let url = format!("{}&page={}", self.api_url("/movie/popular"), page);
        self.get_json(&url)
    }

    fn movie(&self, id: MovieId) -> Result<MovieDetail, ApiError> {
        let url = self.api_url(&format!("/movie/{}", id));
        self.get_json(&url)
    }
}
