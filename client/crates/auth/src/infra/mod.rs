//! Infrastructure Layer
//!
//! HTTP implementations of the remote gateways.

pub mod http;

pub use http::{
    ApiClient, ApiConfig, HttpCodeDelivery, HttpIdentityGateway, HttpProfileStore,
    HttpTravelPreferencesStore,
};
