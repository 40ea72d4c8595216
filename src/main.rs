mod cli;
mod common;

fn main() -> anyhow::Result<std::process::ExitCode> {
    cli::run()
}
