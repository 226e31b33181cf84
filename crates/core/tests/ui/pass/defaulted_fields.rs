use ioc_core::injectable;

#[injectable]
pub struct Settings {
    #[inject(default)]
    retries: u32,
    #[inject(default)]
    verbose: bool,
}

#[injectable]
pub struct Empty {}

fn main() {
    use ioc_core::container::Injectable;

    assert_eq!(Settings::descriptor().arity(), 0);
    assert_eq!(Empty::descriptor().name(), "Empty");
}
