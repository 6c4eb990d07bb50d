use sweep::{ExitStatus, sweep_main};

fn main() -> ExitStatus {
    sweep_main(|args| args)
}
