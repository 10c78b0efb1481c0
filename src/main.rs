use camd::cli;

fn main() {
    cli::run();
}
