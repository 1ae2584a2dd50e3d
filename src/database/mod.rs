use crate::models::{
    LISTINGS_COLLECTION, SEARCH_ALERTS_COLLECTION, TRAINERS_COLLECTION, USERS_COLLECTION,
};
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

const DEFAULT_DB_NAME: &str = "trainer_marketplace";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&database_name(uri));

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the moderation and alert queries rely on
    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        log::info!("🔧 Creating database indexes...");

        let indexes: Vec<(&str, Document, bool)> = vec![
            (TRAINERS_COLLECTION, doc! { "isApproved": 1 }, false),
            (TRAINERS_COLLECTION, doc! { "userId": 1 }, false),
            (LISTINGS_COLLECTION, doc! { "isApproved": 1 }, false),
            (SEARCH_ALERTS_COLLECTION, doc! { "category": 1, "gender": 1 }, false),
            (SEARCH_ALERTS_COLLECTION, doc! { "email": 1 }, false),
            (USERS_COLLECTION, doc! { "email": 1 }, true),
        ];

        for (collection, keys, unique) in indexes {
            let description = format!("{}({:?})", collection, keys.keys().collect::<Vec<_>>());
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(unique).build())
                .build();

            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index created: {}", description),
                Err(e) => log::debug!("   ℹ️  Index already exists: {} ({})", description, e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Database name taken from the URI path, falling back to the default
fn database_name(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DB_NAME)
        .to_string()
}
