use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EmbeddingError, EmbeddingProvider};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
///
/// The vector dimension is learned from a probe request in `connect` and every
/// later response is checked against it.
#[derive(Clone)]
pub struct RemoteEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl RemoteEmbedder {
    pub async fn connect(base_url: &str, api_key: String, model: &str) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| EmbeddingError::Init(format!("HTTP client: {e}")))?;

        let mut embedder = Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key,
            model: model.to_string(),
            dimension: 0,
        };

        let probe = embedder
            .request(&["probe".to_string()])
            .await
            .map_err(|e| EmbeddingError::Init(format!("probe request to {} failed: {e}", embedder.endpoint)))?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(EmbeddingError::Init("probe returned an empty vector".to_string()));
        }
        embedder.dimension = dimension;

        Ok(embedder)
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Decode(e.to_string()))?;

        order_rows(body.data, texts.len())
    }
}

/// Puts response rows back into request order and checks there is one per input.
fn order_rows(mut rows: Vec<EmbeddingRow>, expected: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if rows.len() != expected {
        return Err(EmbeddingError::BatchSize {
            expected,
            actual: rows.len(),
        });
    }
    rows.sort_by_key(|r| r.index);
    if rows.iter().enumerate().any(|(i, r)| r.index != i) {
        return Err(EmbeddingError::Decode("response indices do not cover the batch".to_string()));
    }
    Ok(rows.into_iter().map(|r| r.embedding).collect())
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedder {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Blank texts are never sent (OpenAI-compatible endpoints reject empty
    /// input); they get a zero vector, which scores 0 against anything.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = vec![vec![0.0; self.dimension]; texts.len()];

        let (positions, present): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| (i, text.clone()))
            .unzip();
        if present.is_empty() {
            return Ok(vectors);
        }

        let embedded = self.request(&present).await?;
        if let Some(bad) = embedded.iter().find(|v| v.len() != self.dimension) {
            return Err(EmbeddingError::Dimension {
                expected: self.dimension,
                actual: bad.len(),
            });
        }
        for (position, vector) in positions.into_iter().zip(embedded) {
            vectors[position] = vector;
        }

        debug!(
            "Embedded batch of {} ({} blank) via {}",
            texts.len(),
            texts.len() - present.len(),
            self.model
        );
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::{json, Value};

    use super::*;

    fn row(index: usize, value: f32) -> EmbeddingRow {
        EmbeddingRow {
            index,
            embedding: vec![value, value],
        }
    }

    #[test]
    fn test_order_rows_restores_request_order() {
        let rows = vec![row(2, 3.0), row(0, 1.0), row(1, 2.0)];
        let ordered = order_rows(rows, 3).unwrap();
        assert_eq!(ordered[0][0], 1.0);
        assert_eq!(ordered[1][0], 2.0);
        assert_eq!(ordered[2][0], 3.0);
    }

    #[test]
    fn test_order_rows_rejects_short_batch() {
        let err = order_rows(vec![row(0, 1.0)], 2).unwrap_err();
        assert!(matches!(err, EmbeddingError::BatchSize { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_order_rows_rejects_duplicate_indices() {
        let err = order_rows(vec![row(0, 1.0), row(0, 2.0)], 2).unwrap_err();
        assert!(matches!(err, EmbeddingError::Decode(_)));
    }

    #[test]
    fn test_response_deserializes() {
        let json = r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,0.2]}],"model":"m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
    }

    fn rows_body(vectors: &[Vec<f32>]) -> String {
        let data: Vec<_> = vectors
            .iter()
            .enumerate()
            .map(|(index, embedding)| json!({"object": "embedding", "index": index, "embedding": embedding}))
            .collect();
        json!({"object": "list", "data": data, "model": "test-embed"}).to_string()
    }

    async fn mock_input(
        server: &mut mockito::ServerGuard,
        input: Value,
        status: usize,
        body: String,
    ) -> mockito::Mock {
        server
            .mock("POST", "/v1/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({ "input": input })))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    async fn connected(server: &mut mockito::ServerGuard) -> RemoteEmbedder {
        let _probe = mock_input(server, json!(["probe"]), 200, rows_body(&[vec![0.0, 0.0, 1.0]])).await;
        RemoteEmbedder::connect(&format!("{}/v1", server.url()), "sk-test".to_string(), "test-embed")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_learns_dimension_from_probe() {
        let mut server = mockito::Server::new_async().await;
        let embedder = connected(&mut server).await;
        assert_eq!(embedder.dimension(), 3);
        assert_eq!(embedder.name(), "remote");
    }

    #[tokio::test]
    async fn test_wrong_dimension_in_batch_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let embedder = connected(&mut server).await;
        let _batch = mock_input(&mut server, json!(["rust"]), 200, rows_body(&[vec![1.0, 0.0]])).await;

        let err = embedder.embed(&["rust".to_string()]).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Dimension { expected: 3, actual: 2 }));
    }

    #[tokio::test]
    async fn test_error_status_carries_api_message() {
        let mut server = mockito::Server::new_async().await;
        let embedder = connected(&mut server).await;
        let _batch = mock_input(
            &mut server,
            json!(["rust"]),
            401,
            json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}})
                .to_string(),
        )
        .await;

        let err = embedder.embed(&["rust".to_string()]).await.unwrap_err();
        match err {
            EmbeddingError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_texts_are_not_sent_and_embed_as_zero() {
        let mut server = mockito::Server::new_async().await;
        let embedder = connected(&mut server).await;
        let batch = mock_input(&mut server, json!(["rust"]), 200, rows_body(&[vec![1.0, 0.0, 0.0]])).await;

        let texts = vec![String::new(), "rust".to_string(), "  ".to_string()];
        let vectors = embedder.embed(&texts).await.unwrap();

        batch.assert_async().await;
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vec![0.0; 3]);
        assert_eq!(vectors[1], vec![1.0, 0.0, 0.0]);
        assert_eq!(vectors[2], vec![0.0; 3]);
    }

    #[tokio::test]
    async fn test_all_blank_batch_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let embedder = connected(&mut server).await;
        let any_batch = server
            .mock("POST", "/v1/embeddings")
            .match_body(Matcher::PartialJson(json!({"input": [""]})))
            .expect(0)
            .create_async()
            .await;

        let vectors = embedder.embed(&[String::new()]).await.unwrap();

        any_batch.assert_async().await;
        assert_eq!(vectors, vec![vec![0.0; 3]]);
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_endpoint_is_init_error() {
        let result = RemoteEmbedder::connect("http://127.0.0.1:9/v1", "key".to_string(), "m").await;
        assert!(matches!(result, Err(EmbeddingError::Init(_))));
    }
}
