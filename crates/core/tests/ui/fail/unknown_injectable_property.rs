use ioc_core::injectable;

#[injectable(label = "clock")]
pub struct Clock;

fn main() {}
