use std::{ffi::OsString, io::Write, process::ExitCode};

use display_error_chain::DisplayErrorChain;
use gemini_prompt::{BoxError, Config, GeminiGenerator, Prompt, PromptRunner};
use tracing_subscriber::EnvFilter;

/// Runs one prompt; `args` are the command-line arguments after the program name.
///
/// Every argument is prompt text, including `--` and words starting with `-`.
async fn do_main(
    args: impl IntoIterator<Item = OsString>,
    lookup: impl Fn(&str) -> Option<String>,
    out: &mut impl Write,
) -> Result<(), BoxError> {
    let config = Config::from_lookup(lookup)?;
    let prompt = Prompt::from_os_args(args);

    let runner = PromptRunner::new(GeminiGenerator::new(config.base_url), config.model);
    runner.run(config.credential.as_ref(), &prompt, out).await?;

    Ok(())
}

/// Writes the error chain of a failed run to `err_out` and picks the exit status.
fn report(result: Result<(), BoxError>, err_out: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            let formatted = DisplayErrorChain::new(err.as_ref()).to_string();
            // nothing more can be done if stderr is gone
            let _ = writeln!(err_out, "{formatted}");
            1
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // stderr carries only the error report unless RUST_LOG asks for more
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = do_main(
        std::env::args_os().skip(1),
        |name| std::env::var(name).ok(),
        &mut std::io::stdout().lock(),
    )
    .await;

    ExitCode::from(report(result, &mut std::io::stderr().lock()))
}
