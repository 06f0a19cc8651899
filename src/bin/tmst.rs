fn main() {
    tmst::cli::run();
}
