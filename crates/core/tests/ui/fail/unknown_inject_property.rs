use ioc_core::injectable;

#[injectable]
pub struct Clock {
    #[inject(skip)]
    source: std::sync::Arc<u8>,
}

fn main() {}
