pub mod borrow_book_cmd;
pub mod late_fee_cmd;
pub mod patron_status_cmd;
pub mod return_book_cmd;
