use std::{sync::Arc, time::Duration};

use aws_config::{BehaviorVersion, Region};
use reqwest::Client;

use super::{
    api::ApiClient,
    config::Config,
    database::{DynamoLeadStore, LeadStore},
    storage::{ObjectStore, S3ObjectStore},
};

const UPSTREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AppState {
    pub config: Config,
    pub http: Client,
    pub api: ApiClient,
    pub objects: Arc<dyn ObjectStore>,
    pub leads: Arc<dyn LeadStore>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let aws = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        let objects = Arc::new(S3ObjectStore::new(
            aws_sdk_s3::Client::new(&aws),
            &config.s3_bucket,
        ));
        let leads = Arc::new(DynamoLeadStore::new(
            aws_sdk_dynamodb::Client::new(&aws),
            &config.dynamodb_landing_table,
            &config.dynamodb_table,
        ));

        Self::with_stores(config, objects, leads)
    }

    pub fn with_stores(
        config: Config,
        objects: Arc<dyn ObjectStore>,
        leads: Arc<dyn LeadStore>,
    ) -> Arc<Self> {
        let http = Client::builder()
            .connect_timeout(UPSTREAM_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        let api = ApiClient::new(http.clone(), &config.gridwalk_api);

        Arc::new(Self {
            config,
            http,
            api,
            objects,
            leads,
        })
    }
}
