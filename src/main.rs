fn main() {
    std::process::exit(battery_health_lib::run())
}
