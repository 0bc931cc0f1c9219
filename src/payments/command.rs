pub mod pay_fee_cmd;
pub mod refund_cmd;
