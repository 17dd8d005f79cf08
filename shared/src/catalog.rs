use crux_http::Http;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::CatalogError;
use crate::event::Event;
use crate::model::{Coordinate, WebcamCatalog, WebcamLinks, WebcamLocation, WebcamSummary};
use crate::navigation::RequestToken;
use crate::{MAX_WEBCAMS, SEARCH_RADIUS_KM, WEBCAM_CATEGORIES};

pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://api.windy.com/webcams/api/v3/webcams";
pub const API_KEY_HEADER: &str = "x-windy-api-key";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CATALOG_ENDPOINT.into(),
            api_key: None,
        }
    }
}

/// Builds the nearby query. Radius, categories and limit are fixed.
#[instrument(skip(config), fields(endpoint = %config.endpoint))]
pub fn catalog_url(config: &CatalogConfig, coordinate: Coordinate) -> Result<Url, CatalogError> {
    let base = Url::parse(&config.endpoint)
        .map_err(|e| CatalogError::InvalidQuery(format!("{}: {e}", config.endpoint)))?;

    if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
        return Err(CatalogError::InvalidQuery(format!(
            "{} is not an http(s) endpoint",
            config.endpoint
        )));
    }

    let nearby = format!(
        "{},{},{}",
        coordinate.latitude(),
        coordinate.longitude(),
        SEARCH_RADIUS_KM
    );
    let limit = MAX_WEBCAMS.to_string();

    let mut url = base;
    url.query_pairs_mut()
        .append_pair("nearby", &nearby)
        .append_pair("categories", WEBCAM_CATEGORIES)
        .append_pair("include", "location,urls")
        .append_pair("limit", &limit);

    debug!(url = %url, "catalog query built");
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    webcams: Vec<WireWebcam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWebcam {
    webcam_id: u64,
    title: String,
    #[serde(default)]
    location: WireLocation,
    #[serde(default)]
    urls: WireUrls,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireLocation {
    city: String,
    country: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireUrls {
    detail: String,
    provider: String,
}

impl From<WireWebcam> for WebcamSummary {
    fn from(w: WireWebcam) -> Self {
        Self {
            id: w.webcam_id,
            title: w.title,
            location: WebcamLocation {
                city: w.location.city,
                country: w.location.country,
            },
            links: WebcamLinks {
                viewer_url: w.urls.detail,
                provider_url: w.urls.provider,
            },
        }
    }
}

/// Decodes a catalog body, keeping server order and at most `MAX_WEBCAMS`
/// entries. An empty list is a valid catalog.
pub fn decode_catalog(body: &[u8]) -> Result<WebcamCatalog, CatalogError> {
    let response: CatalogResponse =
        serde_json::from_slice(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    if response.webcams.len() > MAX_WEBCAMS {
        warn!(
            received = response.webcams.len(),
            kept = MAX_WEBCAMS,
            "catalog truncated"
        );
    }

    Ok(response
        .webcams
        .into_iter()
        .take(MAX_WEBCAMS)
        .map(WebcamSummary::from)
        .collect())
}

/// Turns the HTTP completion into a catalog or a load error. Any failure means
/// "no catalog"; partial data is never returned.
pub fn catalog_from_response(
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
) -> Result<WebcamCatalog, CatalogError> {
    // crux_http reports 4xx/5xx as `Error::Http`, not as a response.
    let mut response = match result {
        Ok(response) => response,
        Err(crux_http::Error::Http(e)) => {
            return Err(CatalogError::Status {
                status: e.code.into(),
            })
        }
        Err(e) => return Err(CatalogError::Transport(e)),
    };

    let status: u16 = response.status().into();
    if !(200..300).contains(&status) {
        return Err(CatalogError::Status { status });
    }

    let body = response.take_body().unwrap_or_default();
    decode_catalog(&body)
}

/// Issues catalog queries through the shell's HTTP capability. The response
/// comes back as `Event::CatalogResponse` tagged with the request token.
pub struct CatalogLoader<'a> {
    http: &'a Http<Event>,
    config: &'a CatalogConfig,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(http: &'a Http<Event>, config: &'a CatalogConfig) -> Self {
        Self { http, config }
    }

    pub fn load(&self, coordinate: Coordinate, token: RequestToken) -> Result<(), CatalogError> {
        let url = catalog_url(self.config, coordinate)?;

        info!(
            token = token.value(),
            lat = coordinate.latitude(),
            lon = coordinate.longitude(),
            "loading webcam catalog"
        );

        let mut request = self.http.get(url.as_str());
        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        request.send(move |result| Event::CatalogResponse { token, result });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn url_carries_fixed_filters() {
        let url = catalog_url(&CatalogConfig::default(), coord(43.5, -116.0)).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.host_str(), Some("api.windy.com"));
        assert!(pairs.contains(&("nearby".into(), format!("43.5,-116,{SEARCH_RADIUS_KM}"))));
        assert!(pairs.contains(&("categories".into(), WEBCAM_CATEGORIES.into())));
        assert!(pairs.contains(&("limit".into(), MAX_WEBCAMS.to_string())));
    }

    #[test]
    fn url_rejects_non_http_endpoint() {
        let config = CatalogConfig {
            endpoint: "ftp://example.com/webcams".into(),
            api_key: None,
        };
        assert!(matches!(
            catalog_url(&config, coord(0.0, 0.0)),
            Err(CatalogError::InvalidQuery(_))
        ));

        let config = CatalogConfig {
            endpoint: "not a url".into(),
            api_key: None,
        };
        assert!(catalog_url(&config, coord(0.0, 0.0)).is_err());
    }

    #[test]
    fn decode_preserves_order_and_maps_fields() {
        let body = json!({
            "total": 3,
            "webcams": [
                {
                    "webcamId": 30,
                    "title": "Boise Foothills",
                    "location": { "city": "Boise", "country": "United States", "region": "Idaho" },
                    "urls": { "detail": "https://www.windy.com/webcams/30", "provider": "https://cams.example.org/30" }
                },
                { "webcamId": 10, "title": "Lucky Peak" },
                { "webcamId": 20, "title": "Bogus Basin", "location": { "city": "Boise" } }
            ]
        });

        let catalog = decode_catalog(&serde_json::to_vec(&body).unwrap()).unwrap();
        let ids: Vec<u64> = catalog.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);

        let first = catalog.find(30).unwrap();
        assert_eq!(first.location.city, "Boise");
        assert_eq!(first.links.viewer_url, "https://www.windy.com/webcams/30");
        assert_eq!(first.links.provider_url, "https://cams.example.org/30");

        let second = catalog.find(10).unwrap();
        assert!(second.location.country.is_empty());
        assert!(second.links.viewer_url.is_empty());
    }

    #[test]
    fn decode_empty_list_is_valid() {
        let catalog = decode_catalog(br#"{"webcams": []}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn decode_failures() {
        assert!(matches!(
            decode_catalog(br#"{"total": 0}"#),
            Err(CatalogError::Decode(_))
        ));
        assert!(matches!(
            decode_catalog(b"<html>oops</html>"),
            Err(CatalogError::Decode(_))
        ));
        assert!(matches!(
            decode_catalog(br#"{"webcams": [{"title": "no id"}]}"#),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn decode_truncates_to_limit() {
        let webcams: Vec<_> = (0..(MAX_WEBCAMS as u64 + 5))
            .map(|id| json!({ "webcamId": id, "title": format!("cam {id}") }))
            .collect();
        let body = serde_json::to_vec(&json!({ "webcams": webcams })).unwrap();

        let catalog = decode_catalog(&body).unwrap();
        assert_eq!(catalog.len(), MAX_WEBCAMS);
        assert_eq!(catalog.as_slice()[0].id, 0);
    }

    #[test]
    fn transport_errors_keep_their_variant() {
        assert_eq!(
            catalog_from_response(Err(crux_http::Error::Timeout)),
            Err(CatalogError::Transport(crux_http::Error::Timeout))
        );
        assert_eq!(
            catalog_from_response(Err(crux_http::Error::Io("reset".into()))),
            Err(CatalogError::Transport(crux_http::Error::Io("reset".into())))
        );
    }
}
