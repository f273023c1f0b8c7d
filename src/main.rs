use evcount::init::run;

pub fn main() -> std::process::ExitCode {
    run()
}
