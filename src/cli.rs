use {
    crate::common::{debug_println, indented_println, DEBUG},
    clap::{Parser, Subcommand},
    demo::{Execute, Program},
    heap::{Allocator, FailingAllocator, SystemAllocator, TrackingAllocator},
    std::{process::ExitCode, sync::atomic::Ordering},
};

#[derive(Debug, Parser)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the program [default]
    Run {
        #[command(flatten)]
        run_options: RunOptions,
    },
    /// Print the program's step listing
    Show,
}

#[derive(Debug, Default, Parser)]
struct RunOptions {
    /// Make every allocation fail
    #[arg(long)]
    fail_alloc: bool,

    /// Print the final state after execution
    #[arg(long)]
    print_state: bool,
}

pub(crate) fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    DEBUG.store(cli.debug, Ordering::Relaxed);
    let program = Program::hello();
    debug_println!("program:");
    for (index, step) in program.steps.iter().enumerate() {
        indented_println!(1, "{index}: {step}");
    }
    let run_options = match cli.command {
        Some(Command::Show) => {
            print!("{program}");
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Run { run_options }) => run_options,
        None => RunOptions::default(),
    };
    let inner: &dyn Allocator = if run_options.fail_alloc {
        &FailingAllocator
    } else {
        &SystemAllocator
    };
    let allocator = TrackingAllocator::new(inner);
    let final_state = program.execute(&allocator, &mut std::io::stdout().lock())?;
    debug_println!(
        "allocations: {}, failures: {}, releases: {}",
        allocator.allocations(),
        allocator.failures(),
        allocator.releases()
    );
    if let Some(e) = &final_state.alloc_error {
        debug_println!("{e}");
    }
    debug_println!("{final_state:#?}");
    if run_options.print_state {
        println!("final state:\n{final_state}");
    }
    Ok(ExitCode::from(final_state.status.exit_code()))
}
