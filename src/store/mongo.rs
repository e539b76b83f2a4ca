use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Collection};
use tokio::sync::OnceCell;

use crate::config::MongoConfig;
use crate::error::{AppError, AppResult};
use crate::models::{RawDate, RawExpense, UserId};

/// Read-only access to the hosted expense collection.
///
/// The driver client (and its connection pool) is created on first use and
/// then shared by every clone of the store for the life of the process.
#[derive(Clone)]
pub struct MongoStore {
    config: Arc<MongoConfig>,
    client: Arc<OnceCell<Client>>,
}

impl MongoStore {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(OnceCell::new()),
        }
    }

    async fn client(&self) -> AppResult<&Client> {
        let client = self
            .client
            .get_or_try_init(|| async {
                tracing::info!(
                    host = %self.config.host,
                    app_name = %self.config.app_name,
                    "Connecting to document store"
                );
                Client::with_uri_str(self.config.connection_string()).await
            })
            .await?;
        Ok(client)
    }

    pub async fn find_by_user(&self, user: &UserId) -> AppResult<Vec<RawExpense>> {
        let oid = ObjectId::parse_str(user.as_str())
            .map_err(|_| AppError::InvalidUserId(user.to_string()))?;

        let collection: Collection<Document> = self
            .client()
            .await?
            .database(&self.config.database)
            .collection(&self.config.collection);

        let mut cursor = collection.find(doc! { "user": oid }).await?;
        let mut expenses = Vec::new();
        while cursor.advance().await? {
            let document: Document = cursor.deserialize_current()?;
            expenses.push(raw_expense_from_document(&document)?);
        }

        tracing::debug!(
            user = %user,
            count = expenses.len(),
            collection = %self.config.collection,
            "Loaded expenses from document store"
        );
        Ok(expenses)
    }
}

/// Pull the fields the dashboard uses out of one stored document.
///
/// Dates stay raw here; they are parsed during normalisation.
pub fn raw_expense_from_document(document: &Document) -> AppResult<RawExpense> {
    let id = match document.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let date = match document.get("date") {
        Some(Bson::DateTime(dt)) => {
            match chrono::DateTime::from_timestamp_millis(dt.timestamp_millis()) {
                Some(ts) => RawDate::Timestamp(ts.naive_utc()),
                None => RawDate::Text(dt.to_string()),
            }
        }
        Some(Bson::String(s)) => RawDate::Text(s.clone()),
        Some(Bson::Null) | None => RawDate::Missing,
        Some(other) => RawDate::Text(other.to_string()),
    };

    let amount = match document.get("amount") {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        Some(Bson::String(s)) => s.trim().parse().map_err(|_| {
            AppError::MalformedRecord(format!("record {id} has a non-numeric amount {s:?}"))
        })?,
        other => {
            return Err(AppError::MalformedRecord(format!(
                "record {id} has an unusable amount {other:?}"
            )))
        }
    };

    Ok(RawExpense {
        id,
        date,
        amount,
        category_name: string_field(document, "categoryName"),
        paid_to: string_field(document, "paidTo"),
    })
}

fn string_field(document: &Document, key: &str) -> Option<String> {
    match document.get(key) {
        Some(Bson::String(s)) => Some(s.clone()),
        Some(Bson::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}
