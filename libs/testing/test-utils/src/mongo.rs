//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a MongoDB container for testing.

use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database();
/// let names = db.list_collection_names().await.unwrap();
/// assert!(names.is_empty());
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    database_name: String,
    pub connection_string: String,
}

impl TestMongo {
    /// Start a standalone MongoDB 7 container.
    pub async fn new() -> Self {
        Self::with_database("events_test").await
    }

    pub async fn with_database(database_name: &str) -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}", host_port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            client,
            database_name: database_name.to_string(),
            connection_string,
        }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Handle to the test database
    pub fn database(&self) -> Database {
        self.client.database(&self.database_name)
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{Document, doc};

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_mongo_insert_find() {
        let mongo = TestMongo::new().await;
        let coll = mongo.database().collection::<Document>("things");

        coll.insert_one(doc! { "_id": "a", "n": 1 }).await.unwrap();

        let found = coll.find_one(doc! { "_id": "a" }).await.unwrap().unwrap();
        assert_eq!(found.get_i32("n").unwrap(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_mongo_ping() {
        let mongo = TestMongo::new().await;
        let reply = mongo
            .database()
            .run_command(doc! { "ping": 1 })
            .await
            .unwrap();
        assert!(reply.contains_key("ok"));
    }
}
