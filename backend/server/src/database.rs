//! # DynamoDB
//!
//! Write-only lead capture for the landing page.
//!
//! ## Tables
//! - `DYNAMODB_LANDING_TABLE`: early access sign ups, keyed by `email`
//! - `DYNAMODB_TABLE`: contact messages, keyed by a generated `id`
//!
//! Items are plain string attributes. Nothing here reads them back, that is
//! done from the AWS console.
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, types::AttributeValue};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Lead {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_lowercase(),
            created_at: Utc::now(),
        }
    }

    fn into_item(self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("email".to_string(), AttributeValue::S(self.email)),
            ("created_at".to_string(), AttributeValue::S(timestamp(self.created_at))),
        ])
    }
}

impl ContactMessage {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_lowercase(),
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }

    fn into_item(self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("id".to_string(), AttributeValue::S(self.id)),
            ("name".to_string(), AttributeValue::S(self.name)),
            ("email".to_string(), AttributeValue::S(self.email)),
            ("message".to_string(), AttributeValue::S(self.message)),
            ("created_at".to_string(), AttributeValue::S(timestamp(self.created_at))),
        ])
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn put_lead(&self, lead: Lead) -> Result<(), AppError>;

    async fn put_contact(&self, contact: ContactMessage) -> Result<(), AppError>;
}

pub struct DynamoLeadStore {
    client: Client,
    landing_table: String,
    contact_table: String,
}

impl DynamoLeadStore {
    pub fn new(client: Client, landing_table: &str, contact_table: &str) -> Self {
        Self {
            client,
            landing_table: landing_table.to_string(),
            contact_table: contact_table.to_string(),
        }
    }

    async fn put_item(
        &self,
        table: &str,
        item: HashMap<String, AttributeValue>,
    ) -> Result<(), AppError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("DynamoDB put failed: {e}")))?;

        info!(table, "Stored item");

        Ok(())
    }
}

#[async_trait]
impl LeadStore for DynamoLeadStore {
    async fn put_lead(&self, lead: Lead) -> Result<(), AppError> {
        self.put_item(&self.landing_table, lead.into_item()).await
    }

    async fn put_contact(&self, contact: ContactMessage) -> Result<(), AppError> {
        self.put_item(&self.contact_table, contact.into_item()).await
    }
}
