use ioc_core::injectable;

#[injectable(name = "")]
pub struct Clock;

fn main() {}
