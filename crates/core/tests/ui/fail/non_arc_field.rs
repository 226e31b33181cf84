//! Dependencies have to be shared through Arc

use ioc_core::injectable;

#[injectable]
pub struct Counter {
    count: u32,
}

fn main() {}
