//! Types generated from `proto/wallet.proto`.

pub mod wallet {
    tonic::include_proto!("wallet");
}

pub use wallet::wallet_service_client::WalletServiceClient;
pub use wallet::{ChargeRequest, ChargeResponse};

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_charge_request_wire_format() {
        let request = ChargeRequest {
            mobile: "+1555".to_string(),
            amount: 1000,
        };

        let bytes = request.encode_to_vec();
        assert_eq!(
            bytes,
            vec![0x0a, 0x05, b'+', b'1', b'5', b'5', b'5', 0x10, 0xe8, 0x07]
        );
        assert_eq!(ChargeRequest::decode(bytes.as_slice()).unwrap(), request);
    }

    #[test]
    fn test_charge_response_defaults_to_failure() {
        let response = ChargeResponse::decode(&[][..]).unwrap();
        assert!(!response.success);
        assert!(response.message.is_empty());
    }
}
