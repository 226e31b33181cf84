//! A trait object field resolved through an interface alias

use std::sync::Arc;

use ioc_core::container::ClassRef;
use ioc_core::{injectable, IocContainer};

pub trait Gateway: Send + Sync {
    fn provider(&self) -> &'static str;
}

#[injectable]
pub struct StripeGateway;

impl Gateway for StripeGateway {
    fn provider(&self) -> &'static str {
        "stripe"
    }
}

#[injectable]
pub struct Checkout {
    #[inject(alias = "payments")]
    gateway: Arc<dyn Gateway>,
    #[inject(default)]
    attempts: u32,
}

fn main() {
    let mut container = IocContainer::new();
    container
        .register_aliased_as::<StripeGateway, dyn Gateway>("payments", |g| g as Arc<dyn Gateway>)
        .unwrap();
    container.register(ClassRef::of::<Checkout>()).unwrap();

    let checkout = container.resolve::<Checkout>().unwrap();
    assert_eq!(checkout.gateway.provider(), "stripe");
    assert_eq!(checkout.attempts, 0);
}
