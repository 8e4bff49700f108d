use crate::generation::{ContentBuilder, GenerateContentRequest, GenerationResponse};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue},
    Client, ClientBuilder, RequestBuilder, Response,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};
use std::{fmt, sync::Arc};
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Remote model variants the client knows by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Model {
    #[default]
    Gemini15Flash,
    /// Any other model resource name, e.g. `models/gemini-2.0-flash`.
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini15Flash => "models/gemini-1.5-flash",
            Model::Custom(model) => model,
        }
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        let model = if model.starts_with("models/") {
            model
        } else {
            format!("models/{model}")
        };
        Model::Custom(model)
    }
}

impl AsRef<str> for Model {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to parse API key"))]
    InvalidApiKey { source: InvalidHeaderValue },

    #[snafu(display("failed to construct URL (probably incorrect model name): {suffix}"))]
    ConstructUrl {
        source: url::ParseError,
        suffix: String,
    },

    #[snafu(display("failed to build HTTP client"))]
    BuildClient { source: reqwest::Error },

    #[snafu(display("failed to build request"))]
    BuildRequest { source: reqwest::Error },

    #[snafu(display("failed to perform request to '{url}'"))]
    PerformRequest { source: reqwest::Error, url: Url },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse {
        /// HTTP status code
        code: u16,
        /// HTTP error description
        description: Option<String>,
    },

    #[snafu(display("failed to deserialize JSON response"))]
    Decode { source: serde_json::Error },

    #[snafu(display("failed to obtain response body"))]
    ResponseBody { source: reqwest::Error },
}

/// Internal client for making requests to the Gemini API
#[derive(Debug)]
pub(crate) struct GeminiClient {
    http_client: Client,
    pub model: Model,
    base_url: Url,
}

impl GeminiClient {
    /// Create a new client with custom base URL
    fn with_base_url(api_key: &SecretString, model: Model, base_url: Url) -> Result<Self, Error> {
        let mut api_key =
            HeaderValue::from_str(api_key.expose_secret()).context(InvalidApiKeySnafu)?;
        api_key.set_sensitive(true);

        let headers = HeaderMap::from_iter([(HeaderName::from_static(API_KEY_HEADER), api_key)]);
        let http_client = ClientBuilder::new()
            .default_headers(headers)
            .build()
            .context(BuildClientSnafu)?;

        Ok(Self {
            http_client,
            model,
            base_url,
        })
    }

    /// Generate content
    pub(crate) async fn generate_content_raw(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        let url = self.build_url("generateContent")?;
        self.perform_request(|c| c.post(url).json(&request), Self::decode_json)
            .await
    }

    async fn perform_request<T, F, Fut>(
        &self,
        builder: impl FnOnce(&Client) -> RequestBuilder,
        handler: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(Response) -> Fut,
        Fut: std::future::Future<Output = Result<T, Error>>,
    {
        let request = builder(&self.http_client)
            .build()
            .context(BuildRequestSnafu)?;
        let url = request.url().clone();

        debug!(method = %request.method(), url = %url, "sending request");
        let response = self
            .http_client
            .execute(request)
            .await
            .context(PerformRequestSnafu { url })?;

        let response = Self::check_response(response).await?;
        handler(response).await
    }

    /// Checks if the response status is successful
    async fn check_response(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if !status.is_success() {
            let description = response.text().await.ok();
            debug!(status = status.as_u16(), "request rejected by server");
            return BadResponseSnafu {
                code: status.as_u16(),
                description,
            }
            .fail();
        }
        Ok(response)
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        let bytes = response.bytes().await.context(ResponseBodySnafu)?;
        serde_json::from_slice(&bytes).context(DecodeSnafu)
    }

    /// Build a URL for the API
    fn build_url(&self, endpoint: &str) -> Result<Url, Error> {
        let suffix = format!("{}:{endpoint}", self.model);
        self.base_url
            .join(&suffix)
            .context(ConstructUrlSnafu { suffix })
    }
}

/// Client for the Gemini API
#[derive(Clone, Debug)]
pub struct Gemini {
    client: Arc<GeminiClient>,
}

impl Gemini {
    /// Create a new client with the specified API key
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self, Error> {
        Self::with_model(api_key, Model::default())
    }

    /// Create a new client with the specified API key and model
    pub fn with_model(
        api_key: impl Into<SecretString>,
        model: impl Into<Model>,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_BASE_URL).context(ConstructUrlSnafu {
            suffix: DEFAULT_BASE_URL,
        })?;
        Self::with_model_and_base_url(api_key, model, base_url)
    }

    /// Create a new client with the specified API key, model, and base URL
    pub fn with_model_and_base_url(
        api_key: impl Into<SecretString>,
        model: impl Into<Model>,
        base_url: Url,
    ) -> Result<Self, Error> {
        let client = GeminiClient::with_base_url(&api_key.into(), model.into(), base_url)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Model this client sends requests to
    pub fn model(&self) -> &Model {
        &self.client.model
    }

    /// Start building a content generation request
    pub fn generate_content(&self) -> ContentBuilder {
        ContentBuilder::new(self.client.clone())
    }
}

/// Default endpoint root of the public Gemini API.
pub fn default_base_url() -> &'static str {
    DEFAULT_BASE_URL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names() {
        assert_eq!(Model::default().as_str(), "models/gemini-1.5-flash");
        assert_eq!(Model::Gemini15Flash.to_string(), "models/gemini-1.5-flash");
        assert_eq!(
            Model::from("gemini-2.0-flash".to_string()),
            Model::Custom("models/gemini-2.0-flash".to_string())
        );
        assert_eq!(
            Model::from("models/gemini-2.0-flash".to_string()).as_str(),
            "models/gemini-2.0-flash"
        );
    }

    #[test]
    fn test_build_url_keeps_key_out_of_query() {
        let client = GeminiClient::with_base_url(
            &SecretString::from("secret-key".to_string()),
            Model::default(),
            Url::parse(DEFAULT_BASE_URL).unwrap(),
        )
        .unwrap();

        let url = client.build_url("generateContent").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let result = Gemini::new("bad\nkey".to_string());
        assert!(matches!(result, Err(Error::InvalidApiKey { .. })));
    }
}
