//! Media records and the catalog wire format

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry as returned by the search endpoint
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMedia {
    pub wrapper_type: String,
    pub kind: String,
    pub collection_id: Option<i64>,
    pub track_id: i64,
    pub artist_name: String,
    pub collection_name: Option<String>,
    pub track_name: String,
    pub collection_censored_name: Option<String>,
    pub track_censored_name: Option<String>,
    pub collection_artist_id: Option<i64>,
    pub collection_artist_view_url: Option<String>,
    pub collection_view_url: Option<String>,
    pub track_view_url: Option<String>,
    pub preview_url: Option<String>,
    pub artwork_url30: Option<String>,
    pub artwork_url60: Option<String>,
    pub artwork_url100: Option<String>,
    pub collection_price: Option<f64>,
    pub track_price: Option<f64>,
    pub track_rental_price: Option<f64>,
    pub collection_hd_price: Option<f64>,
    pub track_hd_price: Option<f64>,
    pub track_hd_rental_price: Option<f64>,
    pub release_date: Option<String>,
    pub collection_explicitness: Option<String>,
    pub track_explicitness: Option<String>,
    pub track_count: Option<i64>,
    pub track_number: Option<i64>,
    pub track_time_millis: Option<i64>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub primary_genre_name: Option<String>,
    pub content_advisory_rating: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    #[serde(rename = "hasITunesExtras")]
    pub has_itunes_extras: Option<bool>,
}

/// Body of a catalog search response
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub result_count: usize,
    pub results: Vec<RawMedia>,
}

/// A persisted media record, keyed by `track_id`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub track_id: i64,
    pub wrapper_type: String,
    pub kind: String,
    pub collection_id: i64,
    pub artist_name: String,
    pub collection_name: Option<String>,
    pub track_name: String,
    pub collection_censored_name: Option<String>,
    pub track_censored_name: Option<String>,
    pub collection_artist_id: i64,
    pub collection_artist_view_url: Option<String>,
    pub collection_view_url: Option<String>,
    pub track_view_url: Option<String>,
    pub preview_url: Option<String>,
    pub artwork_url_30: Option<String>,
    pub artwork_url_60: Option<String>,
    pub artwork_url_100: Option<String>,
    pub collection_price: f64,
    pub track_price: f64,
    pub track_rental_price: f64,
    pub collection_hd_price: f64,
    pub track_hd_price: f64,
    pub track_hd_rental_price: f64,
    pub release_date: Option<String>,
    pub collection_explicitness: Option<String>,
    pub track_explicitness: Option<String>,
    pub track_count: i64,
    pub track_number: i64,
    pub track_time_millis: i64,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub primary_genre_name: Option<String>,
    pub content_advisory_rating: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub has_itunes_extras: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub last_visit_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MediaRecord {
    pub fn from_raw(raw: &RawMedia, created_at: DateTime<Utc>) -> Self {
        Self {
            track_id: raw.track_id,
            wrapper_type: raw.wrapper_type.clone(),
            kind: raw.kind.clone(),
            collection_id: raw.collection_id.unwrap_or_default(),
            artist_name: raw.artist_name.clone(),
            collection_name: raw.collection_name.clone(),
            track_name: raw.track_name.clone(),
            collection_censored_name: raw.collection_censored_name.clone(),
            track_censored_name: raw.track_censored_name.clone(),
            collection_artist_id: raw.collection_artist_id.unwrap_or_default(),
            collection_artist_view_url: raw.collection_artist_view_url.clone(),
            collection_view_url: raw.collection_view_url.clone(),
            track_view_url: raw.track_view_url.clone(),
            preview_url: raw.preview_url.clone(),
            artwork_url_30: raw.artwork_url30.clone(),
            artwork_url_60: raw.artwork_url60.clone(),
            artwork_url_100: raw.artwork_url100.clone(),
            collection_price: raw.collection_price.unwrap_or_default(),
            track_price: raw.track_price.unwrap_or_default(),
            track_rental_price: raw.track_rental_price.unwrap_or_default(),
            collection_hd_price: raw.collection_hd_price.unwrap_or_default(),
            track_hd_price: raw.track_hd_price.unwrap_or_default(),
            track_hd_rental_price: raw.track_hd_rental_price.unwrap_or_default(),
            release_date: raw.release_date.clone(),
            collection_explicitness: raw.collection_explicitness.clone(),
            track_explicitness: raw.track_explicitness.clone(),
            track_count: raw.track_count.unwrap_or_default(),
            track_number: raw.track_number.unwrap_or_default(),
            track_time_millis: raw.track_time_millis.unwrap_or_default(),
            country: raw.country.clone(),
            currency: raw.currency.clone(),
            primary_genre_name: raw.primary_genre_name.clone(),
            content_advisory_rating: raw.content_advisory_rating.clone(),
            short_description: raw.short_description.clone(),
            long_description: raw.long_description.clone(),
            has_itunes_extras: raw.has_itunes_extras.unwrap_or_default(),
            is_favorite: false,
            last_visit_at: None,
            created_at,
        }
    }

    /// Release year, if the release date parses as an RFC 3339 timestamp or a plain date
    pub fn release_year(&self) -> Option<String> {
        let raw = self.release_date.as_deref()?;
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date.format("%Y").to_string());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%Y").to_string())
    }

    pub fn genre(&self) -> &str {
        self.primary_genre_name.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn raw(track_id: i64, name: &str) -> RawMedia {
        RawMedia {
            wrapper_type: "track".to_string(),
            kind: "feature-movie".to_string(),
            track_id,
            artist_name: "Director".to_string(),
            track_name: name.to_string(),
            track_price: Some(9.99),
            currency: Some("AUD".to_string()),
            primary_genre_name: Some("Sci-Fi & Fantasy".to_string()),
            release_date: Some("2019-12-20T08:00:00Z".to_string()),
            ..Default::default()
        }
    }

    pub fn record(track_id: i64, name: &str) -> MediaRecord {
        MediaRecord::from_raw(&raw(track_id, name), Utc::now())
    }

    pub fn response(raws: Vec<RawMedia>) -> SearchResponse {
        SearchResponse {
            result_count: raws.len(),
            results: raws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "resultCount": 1,
        "results": [{
            "wrapperType": "track",
            "kind": "feature-movie",
            "trackId": 1437031362,
            "artistName": "J.J. Abrams",
            "trackName": "Star Wars: The Rise of Skywalker",
            "trackCensoredName": "Star Wars: The Rise of Skywalker",
            "trackViewUrl": "https://itunes.apple.com/au/movie/id1437031362",
            "previewUrl": "https://video.itunes.apple.com/preview.m4v",
            "artworkUrl30": "https://is1.mzstatic.com/30x30bb.jpg",
            "artworkUrl60": "https://is1.mzstatic.com/60x60bb.jpg",
            "artworkUrl100": "https://is1.mzstatic.com/100x100bb.jpg",
            "collectionPrice": 19.99,
            "trackPrice": 19.99,
            "trackRentalPrice": 6.99,
            "releaseDate": "2019-12-20T08:00:00Z",
            "collectionExplicitness": "notExplicit",
            "trackExplicitness": "notExplicit",
            "trackTimeMillis": 8502000,
            "country": "AUS",
            "currency": "AUD",
            "primaryGenreName": "Sci-Fi & Fantasy",
            "contentAdvisoryRating": "M",
            "longDescription": "The saga concludes.",
            "hasITunesExtras": true
        }]
    }"#;

    #[test]
    fn decodes_catalog_response() {
        let response: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(response.result_count, 1);
        let media = &response.results[0];
        assert_eq!(media.track_id, 1437031362);
        assert_eq!(media.artwork_url100.as_deref(), Some("https://is1.mzstatic.com/100x100bb.jpg"));
        assert_eq!(media.has_itunes_extras, Some(true));
        assert_eq!(media.collection_id, None);
    }

    #[test]
    fn record_defaults_missing_numbers() {
        let response: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        let record = MediaRecord::from_raw(&response.results[0], Utc::now());
        assert_eq!(record.collection_id, 0);
        assert_eq!(record.track_hd_price, 0.0);
        assert!(!record.is_favorite);
        assert!(record.last_visit_at.is_none());
        assert_eq!(record.release_year().as_deref(), Some("2019"));
    }
}
