/// Connection settings for the MongoDB store.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
    /// Collection holding post documents.
    pub collection: String,
    pub max_pool_size: u32,
    pub app_name: Option<String>,
}
