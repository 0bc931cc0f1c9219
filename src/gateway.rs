pub mod factory;
pub mod mock;
pub mod payments;
pub mod sandbox;

#[derive(Debug, PartialEq)]
pub(crate) enum PaymentGatewayVia {
    Sandbox,
    Mock,
}

#[cfg(test)]
mod tests {
    use crate::gateway::PaymentGatewayVia;

    #[tokio::test]
    async fn test_should_create_gateway_via() {
        let _ = PaymentGatewayVia::Sandbox;
        let _ = PaymentGatewayVia::Mock;
    }
}
