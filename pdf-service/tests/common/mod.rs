use pdf_service::config::PdfConfig;
use pdf_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub storage_path: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let storage_path = format!("target/test-storage-{}", Uuid::new_v4());

        let mut config = PdfConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.storage.local_path = storage_path.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            storage_path,
            client,
        }
    }

    /// Create a new document and return its id.
    #[allow(dead_code)]
    pub async fn create_pdf(&self) -> String {
        let response = self
            .client
            .post(format!("{}/api/pdf/create", self.address))
            .send()
            .await
            .expect("Failed to execute request");

        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["pdfId"]
            .as_str()
            .expect("Missing pdfId in response")
            .to_string()
    }

    #[allow(dead_code)]
    pub async fn fetch_pdf(&self, id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/api/pdf/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    #[allow(dead_code)]
    pub async fn add_text(&self, id: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/pdf/{}/add-text", self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Cleanup test storage.
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.storage_path).await;
    }
}
