use {
    advent::{solutions, Args},
    clap::Parser,
};

fn main() {
    solutions().run(&Args::parse());
}
