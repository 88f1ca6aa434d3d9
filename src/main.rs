use get_item_time::{run, Outcome};
use std::{
    env,
    io::{self, Write},
    process::ExitCode,
};

fn main() -> ExitCode {
    env_logger::init();
    let stdout = io::stdout();
    let stderr = io::stderr();
    match run(env::args_os(), stdout.lock(), stderr.lock()) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            let _ = writeln!(io::stderr(), "{e:#}");
            Outcome::WriteFailed.into()
        }
    }
}
