//! A scripted oracle for testing reconciliation ordering.
//!
//! Lookups are surfaced to the test over a channel; the test decides both
//! the content and the *order* of the replies. This is what makes the
//! last-request-wins property testable deterministically: hold the first
//! lookup's reply, answer the second, then release the first.

use tokio::sync::{mpsc, oneshot};

use async_trait::async_trait;

use super::{OracleError, StockOracle};
use crate::model::StockQuote;

/// A lookup captured by the scripted oracle, waiting for the test to reply.
#[derive(Debug)]
pub struct OracleRequest {
    pub product_id: String,
    respond_to: oneshot::Sender<Result<StockQuote, OracleError>>,
}

impl OracleRequest {
    /// Sends the reply, completing the lookup.
    pub fn reply(self, result: Result<StockQuote, OracleError>) {
        let _ = self.respond_to.send(result);
    }
}

/// Test-side handle receiving lookups in arrival order.
pub struct OracleHandle {
    receiver: mpsc::Receiver<OracleRequest>,
}

impl OracleHandle {
    /// Waits for the next lookup. Returns `None` once the oracle is
    /// dropped.
    pub async fn next_request(&mut self) -> Option<OracleRequest> {
        self.receiver.recv().await
    }
}

/// Oracle half handed to the system under test.
pub struct ScriptedOracle {
    sender: mpsc::Sender<OracleRequest>,
}

/// Creates a scripted oracle and its test-side handle.
pub fn scripted_oracle(buffer_size: usize) -> (ScriptedOracle, OracleHandle) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ScriptedOracle { sender }, OracleHandle { receiver })
}

#[async_trait]
impl StockOracle for ScriptedOracle {
    async fn get_product(&self, product_id: &str) -> Result<StockQuote, OracleError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OracleRequest {
                product_id: product_id.to_string(),
                respond_to,
            })
            .await
            .map_err(|_| OracleError::Unavailable("oracle offline".into()))?;
        response
            .await
            .map_err(|_| OracleError::Unavailable("oracle dropped request".into()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_controls_reply_content() {
        let (oracle, mut handle) = scripted_oracle(8);

        let lookup = tokio::spawn(async move { oracle.get_product("p1").await });

        let request = handle.next_request().await.unwrap();
        assert_eq!(request.product_id, "p1");
        request.reply(Ok(StockQuote { price: 500, stock: 2 }));

        let quote = lookup.await.unwrap().unwrap();
        assert_eq!(quote, StockQuote { price: 500, stock: 2 });
    }

    #[tokio::test]
    async fn dropped_handle_reads_as_unavailable() {
        let (oracle, handle) = scripted_oracle(8);
        drop(handle);

        assert!(matches!(
            oracle.get_product("p1").await,
            Err(OracleError::Unavailable(_))
        ));
    }
}
