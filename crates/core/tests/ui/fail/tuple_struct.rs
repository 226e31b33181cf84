//! Tuple struct fields have no names to inject into

use ioc_core::injectable;

#[injectable]
pub struct Point(u32);

fn main() {}
