use serde::Deserialize;

use super::MediaType;

/// Wizard answer meaning "no preference"
pub const NO_PREFERENCE: &str = "dontcare";

/// A bounded set of wizard answers, each backed by a fixed lookup table
pub trait Choice: Sized {
    fn from_key(key: &str) -> Option<Self>;
}

/// Parses a raw wizard answer. Absent, `dontcare` and unrecognized answers all yield `None`.
pub fn choose<T: Choice>(raw: Option<&str>) -> Option<T> {
    match raw {
        None | Some(NO_PREFERENCE) => None,
        Some(key) => T::from_key(key),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Dramatic,
    Intense,
    Gentle,
    Curious,
    Otherworldly,
    Realistic,
}

impl Choice for Mood {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "dramatic" => Some(Mood::Dramatic),
            "intense" => Some(Mood::Intense),
            "gentle" => Some(Mood::Gentle),
            "curious" => Some(Mood::Curious),
            "otherworldly" => Some(Mood::Otherworldly),
            "realistic" => Some(Mood::Realistic),
            _ => None,
        }
    }
}

impl Mood {
    /// Comma-joined TMDb genre IDs for this mood
    pub fn genre_ids(&self) -> &'static str {
        match self {
            // Action, Adventure, Drama, War
            Mood::Dramatic => "28,12,18,10752",
            // Horror, Thriller, Crime
            Mood::Intense => "27,53,80",
            // Comedy, Family, Romance, Animation
            Mood::Gentle => "35,10751,10749,16",
            // Mystery, History, Documentary
            Mood::Curious => "9648,36,99",
            // Fantasy, Science Fiction
            Mood::Otherworldly => "14,878",
            // Documentary, History
            Mood::Realistic => "99,36",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Fresh,
    Recent,
    Modern,
    Golden,
    Throwback,
    Retro,
}

impl Choice for Period {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "fresh" => Some(Period::Fresh),
            "recent" => Some(Period::Recent),
            "modern" => Some(Period::Modern),
            "golden" => Some(Period::Golden),
            "throwback" => Some(Period::Throwback),
            "retro" => Some(Period::Retro),
            _ => None,
        }
    }
}

impl Period {
    /// Inclusive `(start_year, end_year)` range
    pub fn year_range(&self) -> (u16, u16) {
        match self {
            Period::Fresh => (2023, 2025),
            Period::Recent => (2020, 2025),
            Period::Modern => (2015, 2025),
            Period::Golden => (2000, 2015),
            Period::Throwback => (1990, 2000),
            Period::Retro => (1900, 1990),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Masterpiece,
    High,
    Average,
}

impl Choice for Quality {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "masterpiece" => Some(Quality::Masterpiece),
            "high" => Some(Quality::High),
            "average" => Some(Quality::Average),
            _ => None,
        }
    }
}

impl Quality {
    pub fn min_vote_average(&self) -> f64 {
        match self {
            Quality::Masterpiece => 8.0,
            Quality::High => 7.0,
            Quality::Average => 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Quick,
    Standard,
    Epic,
}

impl Choice for Runtime {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "quick" => Some(Runtime::Quick),
            "standard" => Some(Runtime::Standard),
            "epic" => Some(Runtime::Epic),
            _ => None,
        }
    }
}

impl Runtime {
    /// `(min, max)` runtime in minutes
    pub fn minutes(&self) -> (i64, i64) {
        match self {
            Runtime::Quick => (0, 90),
            Runtime::Standard => (90, 150),
            Runtime::Epic => (150, 500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popularity {
    Famous,
    Known,
    Hidden,
}

impl Choice for Popularity {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "famous" => Some(Popularity::Famous),
            "known" => Some(Popularity::Known),
            "hidden" => Some(Popularity::Hidden),
            _ => None,
        }
    }
}

impl Popularity {
    pub fn min_vote_count(&self) -> i64 {
        match self {
            Popularity::Famous => 50000,
            Popularity::Known => 10000,
            Popularity::Hidden => 0,
        }
    }
}

/// Wizard answers after normalization; every field is either a known choice or `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreferenceRecord {
    pub media_type: MediaType,
    pub mood: Option<Mood>,
    pub period: Option<Period>,
    pub quality: Option<Quality>,
    pub runtime: Option<Runtime>,
    pub popularity: Option<Popularity>,
}

/// Raw wizard answers as received on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceParams {
    #[serde(default)]
    pub media_type: MediaType,
    pub mood: Option<String>,
    pub period: Option<String>,
    pub quality: Option<String>,
    pub runtime: Option<String>,
    pub popularity: Option<String>,
}

impl From<&PreferenceParams> for PreferenceRecord {
    fn from(params: &PreferenceParams) -> Self {
        Self {
            media_type: params.media_type,
            mood: choose(params.mood.as_deref()),
            period: choose(params.period.as_deref()),
            quality: choose(params.quality.as_deref()),
            runtime: choose(params.runtime.as_deref()),
            popularity: choose(params.popularity.as_deref()),
        }
    }
}
