use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::engine::error::FetchError;
use crate::model::creature::{CreatureRecord, PokemonPayload, SpeciesPayload, SpeciesRecord};

const POKEMON: &str = "pokemon";
const SPECIES: &str = "pokemon-species";

/// Read-only lookups against the creature data service. One round trip per
/// call, no retry and no caching.
pub trait CreatureApi: Send + Sync {
    fn fetch_primary(&self, id: u32) -> Result<CreatureRecord, FetchError>;
    fn fetch_localized(&self, id: u32) -> Result<SpeciesRecord, FetchError>;
}

pub fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("poke_rand/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub struct PokeApiClient {
    http: Client,
    api_base: String,
}

impl PokeApiClient {
    pub fn new(http: Client, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, resource: &str, id: u32) -> String {
        format!("{}/{}/{}", self.api_base, resource, id)
    }

    fn get_json<T: DeserializeOwned>(&self, resource: &'static str, id: u32) -> Result<T, FetchError> {
        let resp = self
            .http
            .get(self.url(resource, id))
            .send()
            .map_err(|e| FetchError::Network {
                resource,
                id,
                reason: e.to_string(),
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::NotFound {
                resource,
                id,
                status: status.as_u16(),
            });
        }
        resp.json::<T>().map_err(|e| {
            if e.is_decode() {
                FetchError::Decode {
                    resource,
                    id,
                    reason: e.to_string(),
                }
            } else {
                FetchError::Network {
                    resource,
                    id,
                    reason: e.to_string(),
                }
            }
        })
    }
}

impl CreatureApi for PokeApiClient {
    fn fetch_primary(&self, id: u32) -> Result<CreatureRecord, FetchError> {
        self.get_json::<PokemonPayload>(POKEMON, id).map(CreatureRecord::from)
    }

    fn fetch_localized(&self, id: u32) -> Result<SpeciesRecord, FetchError> {
        self.get_json::<SpeciesPayload>(SPECIES, id).map(SpeciesRecord::from)
    }
}
