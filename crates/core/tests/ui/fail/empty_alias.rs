//! An empty alias could never be looked up

use ioc_core::injectable;

#[injectable]
pub struct Clock {
    #[inject(alias = "")]
    source: std::sync::Arc<u8>,
}

fn main() {}
