use crate::gateway::mock::processor::MockPaymentGateway;
use crate::gateway::payments::PaymentGateway;
use crate::gateway::PaymentGatewayVia;
use crate::gateway::sandbox::processor::SandboxPaymentGateway;

pub(crate) async fn create_payment_gateway(via: PaymentGatewayVia) -> Box<dyn PaymentGateway> {
    match via {
        PaymentGatewayVia::Sandbox => {
            Box::new(SandboxPaymentGateway::new())
        }
        PaymentGatewayVia::Mock => {
            Box::new(MockPaymentGateway::approving())
        }
    }
}
