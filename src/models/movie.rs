use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub director: String,
    pub cast: String,
    pub release_date: String,
    pub duration: i32,
    pub rating: f64,
    pub language: String,
    pub poster_url: Option<String>,
}
