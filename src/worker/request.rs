use serde::{Deserialize, Serialize};

/// What the requester intends to do with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Destination {
    Document,
    Image,
    Style,
    Script,
    Manifest,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestMode {
    /// Top-level page navigation.
    Navigate,
    #[default]
    Fetch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: String,
    pub url: String,
    pub destination: Destination,
    pub mode: RequestMode,
}

impl AssetRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            url: url.into(),
            destination: Destination::Other,
            mode: RequestMode::Fetch,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            destination: Destination::Image,
            ..Self::get(url)
        }
    }

    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            destination: Destination::Document,
            mode: RequestMode::Navigate,
            ..Self::get(url)
        }
    }

    pub fn is_read(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// A read for a non-document resource inside `scope`.
    pub fn is_static_asset(&self, scope: &str) -> bool {
        self.is_read()
            && self.destination != Destination::Document
            && self.mode != RequestMode::Navigate
            && self.url.starts_with(scope)
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
