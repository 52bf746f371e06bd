pub mod checkout_session;
pub mod price;
pub mod product;
pub mod relevant_event;
pub mod stripe_event;
pub mod subscription;
