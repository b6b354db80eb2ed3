fn main() {
    pakk::run_cli();
}
