//! # Application State
//!
//! Shared state for the Axum application. Payment capabilities (gateway,
//! QR renderer) are resolved once here, at startup; handlers only ever
//! see the orchestrator they were resolved into.

use crate::auth::UserStore;
use crate::qr::PngQrRenderer;
use shop_core::{BoxedGateway, Checkout, DirectTransfer, ProductCatalog};
use shop_razorpay::RazorpayGateway;
use std::sync::Arc;

/// Placeholder UPI id from the example env file; means "not configured".
pub const UPI_ID_PLACEHOLDER: &str = "your-upi-id@paytm";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// UPI payee id for the direct-transfer fallback
    pub upi_id: Option<String>,
    /// Display name shown in the customer's UPI app
    pub merchant_name: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let upi_id = std::env::var("UPI_ID")
            .ok()
            .filter(|v| !v.is_empty() && v != UPI_ID_PLACEHOLDER);

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            upi_id,
            merchant_name: std::env::var("MERCHANT_NAME")
                .unwrap_or_else(|_| "Ecommerce".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout orchestrator with resolved payment capabilities
    pub checkout: Arc<Checkout>,
    /// Product catalog
    pub catalog: ProductCatalog,
    /// User registry
    pub users: UserStore,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the state for a running server: load the catalog and
    /// resolve payment capabilities from the environment.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_product_catalog()?;

        // Gateway availability is a capability, not a requirement: any
        // configuration problem downgrades to the COD/QR path.
        let gateway: Option<BoxedGateway> = match RazorpayGateway::from_env() {
            Ok(gateway) => Some(Arc::new(gateway)),
            Err(e) => {
                tracing::warn!("razorpay unavailable, online payments disabled: {}", e);
                None
            }
        };

        Ok(Self::with_capabilities(config, catalog, gateway))
    }

    /// Assemble state from explicit parts (also the test entry point).
    pub fn with_capabilities(
        config: AppConfig,
        catalog: ProductCatalog,
        gateway: Option<BoxedGateway>,
    ) -> Self {
        let transfer = DirectTransfer::new(config.upi_id.clone(), config.merchant_name.clone());
        let checkout = Checkout::new(gateway, Some(Arc::new(PngQrRenderer)), transfer);

        Self {
            checkout: Arc::new(checkout),
            catalog,
            users: UserStore::new(),
            config,
        }
    }
}

/// Load product catalog from config file
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    // Try to load from config/products.toml
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog: ProductCatalog = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    // Return empty catalog if no config found
    tracing::warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}
