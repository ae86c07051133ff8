//! Wallet charge client via gRPC.

use crate::proto::{ChargeRequest, ChargeResponse, WalletServiceClient};
use async_trait::async_trait;
use redeem_config::WalletConfig;
use redeem_core::{RedeemError, RedeemResult};
use redeem_service::WalletClient;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, warn};

const SERVICE_NAME: &str = "wallet";

/// Wallet client calling the unary `Charge` method.
///
/// The channel connects lazily, so constructing the client never blocks on
/// the wallet being reachable.
#[derive(Clone)]
pub struct GrpcWalletClient {
    client: WalletServiceClient<Channel>,
}

impl GrpcWalletClient {
    /// Creates a client for the configured endpoint. Must be called within a Tokio runtime.
    pub fn connect_lazy(config: &WalletConfig) -> RedeemResult<Self> {
        let endpoint = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|e| {
                RedeemError::Configuration(format!(
                    "Invalid wallet endpoint '{}': {}",
                    config.endpoint, e
                ))
            })?
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout());

        debug!("Wallet client configured for {}", config.endpoint);
        Ok(Self::from_channel(endpoint.connect_lazy()))
    }

    /// Creates from an existing channel.
    #[must_use]
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            client: WalletServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl WalletClient for GrpcWalletClient {
    async fn charge(&self, mobile: &str, amount: i64) -> RedeemResult<()> {
        debug!("Remote Charge: {} {}", mobile, amount);

        let response = self
            .client
            .clone()
            .charge(ChargeRequest {
                mobile: mobile.to_string(),
                amount,
            })
            .await
            .map_err(map_grpc_error)?;

        check_charge(response.into_inner())
    }
}

/// Treats a response without `success` as a declined charge.
fn check_charge(response: ChargeResponse) -> RedeemResult<()> {
    if response.success {
        return Ok(());
    }

    warn!("Wallet declined charge: {}", response.message);
    let message = if response.message.is_empty() {
        "charge declined".to_string()
    } else {
        response.message
    };
    Err(RedeemError::external(SERVICE_NAME, message))
}

fn map_grpc_error(status: tonic::Status) -> RedeemError {
    RedeemError::external(
        SERVICE_NAME,
        format!("{:?}: {}", status.code(), status.message()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::wallet::wallet_service_server::{WalletService, WalletServiceServer};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio_stream::wrappers::TcpListenerStream;
    use tonic::{Request, Response, Status};

    /// Wallet that declines one mobile and credits every other.
    struct FakeWallet {
        declined: &'static str,
        credited: Arc<AtomicI64>,
    }

    #[tonic::async_trait]
    impl WalletService for FakeWallet {
        async fn charge(
            &self,
            request: Request<ChargeRequest>,
        ) -> Result<Response<ChargeResponse>, Status> {
            let request = request.into_inner();
            if request.mobile == self.declined {
                return Ok(Response::new(ChargeResponse {
                    success: false,
                    message: "wallet frozen".to_string(),
                }));
            }
            if request.amount <= 0 {
                return Err(Status::invalid_argument("amount must be positive"));
            }

            self.credited.fetch_add(request.amount, Ordering::SeqCst);
            Ok(Response::new(ChargeResponse {
                success: true,
                message: String::new(),
            }))
        }
    }

    async fn start_wallet(declined: &'static str) -> (GrpcWalletClient, Arc<AtomicI64>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let credited = Arc::new(AtomicI64::new(0));
        let service = WalletServiceServer::new(FakeWallet {
            declined,
            credited: credited.clone(),
        });

        tokio::spawn(
            tonic::transport::Server::builder()
                .add_service(service)
                .serve_with_incoming(TcpListenerStream::new(listener)),
        );

        let client = GrpcWalletClient::connect_lazy(&config(&format!("http://{addr}"))).unwrap();
        (client, credited)
    }

    fn config(endpoint: &str) -> WalletConfig {
        WalletConfig {
            endpoint: endpoint.to_string(),
            ..WalletConfig::default()
        }
    }

    #[test]
    fn test_successful_response_is_ok() {
        assert!(check_charge(ChargeResponse {
            success: true,
            message: String::new(),
        })
        .is_ok());
    }

    #[test]
    fn test_declined_response_is_external_error() {
        let err = check_charge(ChargeResponse {
            success: false,
            message: "insufficient balance".to_string(),
        })
        .unwrap_err();

        assert!(matches!(
            err,
            RedeemError::ExternalService { ref service, ref message }
                if service == "wallet" && message == "insufficient balance"
        ));
    }

    #[test]
    fn test_status_maps_to_external_error() {
        let err = map_grpc_error(tonic::Status::unavailable("connection refused"));
        assert!(matches!(err, RedeemError::ExternalService { ref message, .. }
            if message.contains("Unavailable") && message.contains("connection refused")));
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_invalid_endpoint_is_configuration_error() {
        let result = GrpcWalletClient::connect_lazy(&config("not a uri"));
        assert!(matches!(result, Err(RedeemError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_charge_credits_remote_wallet() {
        let (client, credited) = start_wallet("+1000").await;

        client.charge("+1555", 1000).await.unwrap();
        client.charge("+1666", 500).await.unwrap();

        assert_eq!(credited.load(Ordering::SeqCst), 1500);
    }

    #[tokio::test]
    async fn test_remote_decline_is_external_error() {
        let (client, credited) = start_wallet("+1000").await;

        let err = client.charge("+1000", 1000).await.unwrap_err();

        assert!(matches!(err, RedeemError::ExternalService { ref message, .. }
            if message == "wallet frozen"));
        assert_eq!(credited.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_status_is_external_error() {
        let (client, _) = start_wallet("+1000").await;

        let err = client.charge("+1555", 0).await.unwrap_err();

        assert!(matches!(err, RedeemError::ExternalService { ref message, .. }
            if message.contains("InvalidArgument")));
    }

    #[tokio::test]
    async fn test_unreachable_wallet_is_external_error() {
        let mut config = config("http://127.0.0.1:1");
        config.connect_timeout_secs = 1;
        let client = GrpcWalletClient::connect_lazy(&config).unwrap();

        let err = client.charge("+1555", 1000).await.unwrap_err();
        assert!(matches!(err, RedeemError::ExternalService { .. }));
    }
}
